pub mod config;
pub mod error;
pub mod features;
pub mod ml;
pub mod store;
pub mod text;

pub use config::Config;
pub use error::{AppError, Result};
