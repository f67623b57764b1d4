pub mod config;
pub mod error;
pub mod record;

pub use config::{ConfigOverrides, Secret, SecretPrompter, SetupConfig};
pub use error::AppError;
