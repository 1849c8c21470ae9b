pub mod error;
pub mod models;
pub mod platforms;
pub mod repositories;
pub mod services;

pub use error::Error;
