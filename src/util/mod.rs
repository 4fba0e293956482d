pub mod error;
pub mod logger;
pub mod minio;
pub mod object_store;
