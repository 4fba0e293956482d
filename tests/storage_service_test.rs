mod common;

use bson::doc;
use common::setup;
use planner_crm_backend::dto::storage_dto::{StorageListParams, UpdateStorageRequest, UploadedFile};
use planner_crm_backend::model::storage::{StorageStatus, StorageType};
use planner_crm_backend::service::storage_service::StorageService;
use planner_crm_backend::util::error::ServiceError;

fn pdf(name: &str) -> UploadedFile {
    UploadedFile {
        filename: name.to_string(),
        content_type: "application/pdf".to_string(),
        content: b"%PDF-1.4 contract".to_vec(),
    }
}

#[tokio::test]
async fn test_upload_stores_object_and_metadata() {
    let app = setup();
    let file = app
        .services
        .storage_service
        .upload_file(pdf("Venue Contract.pdf"), None, vec!["venue".to_string()])
        .await
        .unwrap();

    assert_eq!(file.name, "Venue Contract.pdf");
    assert_eq!(file.file_type, StorageType::Document);
    assert_eq!(file.size, 17);
    assert_eq!(file.status, StorageStatus::Active);
    assert!(file.object_key.starts_with("storage/"));
    assert!(file.object_key.ends_with(".pdf"));
    assert_eq!(file.url, format!("/files/{}", file.object_key));
    assert_eq!(app.objects.len().await, 1);

    let (record, bytes) = app
        .services
        .storage_service
        .download_file(file.id.unwrap())
        .await
        .unwrap();
    assert_eq!(record.id, file.id);
    assert_eq!(&bytes[..], b"%PDF-1.4 contract");
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let app = setup();
    let empty = UploadedFile {
        filename: "empty.txt".to_string(),
        content_type: "text/plain".to_string(),
        content: Vec::new(),
    };
    let result = app.services.storage_service.upload_file(empty, None, vec![]).await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    assert!(app.objects.is_empty().await);
    assert_eq!(app.stores.storage.count(doc! {}).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_filters_by_tag_and_status() {
    let app = setup();
    let service = &app.services.storage_service;
    let contract = service
        .upload_file(pdf("contract.pdf"), Some("Contract".to_string()), vec!["venue".to_string(), "signed".to_string()])
        .await
        .unwrap();
    service
        .upload_file(pdf("menu.pdf"), None, vec!["catering".to_string()])
        .await
        .unwrap();

    let venue = service
        .list_files(StorageListParams {
            tag: Some("venue".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(venue.len(), 1);
    assert_eq!(venue[0].name, "Contract");

    service
        .update_file(
            contract.id.unwrap(),
            UpdateStorageRequest {
                status: Some("archived".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let archived = service
        .list_files(StorageListParams {
            status: Some("archived".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].tags, vec!["venue", "signed"]);

    let all = service.list_files(StorageListParams::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_update_replaces_name_and_tags() {
    let app = setup();
    let service = &app.services.storage_service;
    let file = service.upload_file(pdf("plan.pdf"), None, vec![]).await.unwrap();

    let updated = service
        .update_file(
            file.id.unwrap(),
            UpdateStorageRequest {
                name: Some("Floor plan".to_string()),
                tags: Some(vec![" layout ".to_string(), "".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Floor plan");
    assert_eq!(updated.tags, vec!["layout"]);
    assert_eq!(updated.object_key, file.object_key);

    let bad = service
        .update_file(
            file.id.unwrap(),
            UpdateStorageRequest {
                status: Some("shredded".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_delete_removes_object_then_record() {
    let app = setup();
    let service = &app.services.storage_service;
    let file = service.upload_file(pdf("contract.pdf"), None, vec![]).await.unwrap();
    assert_eq!(app.objects.len().await, 1);

    service.delete_file(file.id.unwrap()).await.unwrap();

    assert!(app.objects.is_empty().await);
    assert!(matches!(
        service.get_file(file.id.unwrap()).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_fetch_object_only_serves_storage_keys() {
    let app = setup();
    let service = &app.services.storage_service;
    let file = service.upload_file(pdf("contract.pdf"), None, vec![]).await.unwrap();

    let bytes = service.fetch_object(&file.object_key).await.unwrap();
    assert_eq!(bytes.len(), 17);
    assert!(service.fetch_object("other/secret.txt").await.is_err());
}
