pub mod app_conf;
pub mod company_conf;
pub mod minio_conf;
pub mod mongo_conf;

pub use app_conf::{AppConfig, StoreBackend};
pub use company_conf::CompanyConfig;
pub use minio_conf::MinioConfig;
pub use mongo_conf::MongoConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
