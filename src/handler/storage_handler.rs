use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::BytesMut;
use tracing::{debug, error, info};

use crate::dto::storage_dto::{parse_tags, StorageListParams, UpdateStorageRequest, UploadedFile};
use crate::handler::parse_object_id;
use crate::service::storage_service::{StorageService, StorageServiceImpl};
use crate::util::error::HandlerError;

/// Multipart upload: one `file` part plus optional `name` and `tags`
/// (comma separated) text parts.
pub async fn upload_file_handler(
    State(service): State<Arc<StorageServiceImpl>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[upload_file_handler] Handler called");
    let mut file: Option<UploadedFile> = None;
    let mut name: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        error!("[upload_file_handler] Error getting next field: {}", e);
        HandlerError::bad_request(format!("Failed to get next field: {}", e))
    })? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        debug!("[upload_file_handler] Processing field: {}", field_name);
        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().map(|s| s.to_string()).unwrap_or_else(|| "upload".to_string());
                let content_type = field.content_type().map(|s| s.to_string()).unwrap_or_default();
                let mut buf = BytesMut::new();
                while let Some(chunk) = field.chunk().await.map_err(|e| {
                    error!("[upload_file_handler] Error reading file chunk: {}", e);
                    HandlerError::bad_request(format!("Failed to read file chunk: {}", e))
                })? {
                    buf.extend_from_slice(&chunk);
                }
                info!("[upload_file_handler] Received file: {} ({} bytes)", filename, buf.len());
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    content: buf.to_vec(),
                });
            }
            "name" | "tags" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| HandlerError::bad_request(format!("Failed to read {}: {}", field_name, e)))?;
                if field_name == "name" {
                    name = Some(text);
                } else {
                    tags = parse_tags(&text);
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| HandlerError::validation("No file uploaded"))?;
    let stored = service
        .upload_file(file, name, tags)
        .await
        .map_err(|e| HandlerError::from_service(e, "upload file"))?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_files_handler(
    State(service): State<Arc<StorageServiceImpl>>,
    Query(params): Query<StorageListParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let files = service
        .list_files(params)
        .await
        .map_err(|e| HandlerError::from_service(e, "list files"))?;
    Ok(Json(files))
}

pub async fn get_file_handler(
    State(service): State<Arc<StorageServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "file")?;
    let file = service
        .get_file(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "get file"))?;
    Ok(Json(file))
}

pub async fn update_file_handler(
    State(service): State<Arc<StorageServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateStorageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "file")?;
    let file = service
        .update_file(id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "update file"))?;
    Ok(Json(file))
}

pub async fn delete_file_handler(
    State(service): State<Arc<StorageServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "file")?;
    service
        .delete_file(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "delete file"))?;
    Ok(StatusCode::NO_CONTENT)
}

fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| if (c.is_ascii_graphic() && c != '"') || c == ' ' { c } else { '_' })
        .collect()
}

pub async fn download_file_handler(
    State(service): State<Arc<StorageServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "file")?;
    let (file, data) = service
        .download_file(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "download file"))?;
    let content_type = file
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok((
        [
            (header::CONTENT_TYPE, header_safe(&content_type)),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", header_safe(&file.name)),
            ),
        ],
        data,
    ))
}

/// Serves object bytes by key; backs the links of the in-memory object store.
pub async fn object_handler(
    State(service): State<Arc<StorageServiceImpl>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let data = service
        .fetch_object(&key)
        .await
        .map_err(|e| HandlerError::from_service(e, "fetch file"))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe() {
        assert_eq!(header_safe("Floor plan \"v2\".pdf"), "Floor plan _v2_.pdf");
        assert_eq!(header_safe("café.jpg"), "caf_.jpg");
    }
}
