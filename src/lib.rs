pub mod config;
pub mod error;
pub mod generation;
pub mod providers;
pub mod server;
pub mod transformations;
pub mod uploads;

pub use error::{Error, Result};
