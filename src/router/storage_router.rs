use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::handler::storage_handler::{
    delete_file_handler, download_file_handler, get_file_handler, list_files_handler, object_handler,
    update_file_handler, upload_file_handler,
};
use crate::service::storage_service::StorageServiceImpl;

/// Upload ceiling for a single multipart request.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn storage_router(service: Arc<StorageServiceImpl>) -> Router {
    Router::new()
        .route("/storage", get(list_files_handler).post(upload_file_handler))
        .route(
            "/storage/{id}",
            get(get_file_handler).put(update_file_handler).delete(delete_file_handler),
        )
        .route("/storage/{id}/download", get(download_file_handler))
        .route("/files/{*key}", get(object_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(service)
}
