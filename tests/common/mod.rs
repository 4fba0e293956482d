#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use planner_crm_backend::app::app::Services;
use planner_crm_backend::config::CompanyConfig;
use planner_crm_backend::dto::lead_dto::LeadRequest;
use planner_crm_backend::dto::quotation_dto::QuotationRequest;
use planner_crm_backend::model::quotation::{Category, LineItem};
use planner_crm_backend::repository::Stores;
use planner_crm_backend::util::object_store::InMemoryObjectStore;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub stores: Stores,
    pub objects: Arc<InMemoryObjectStore>,
    pub services: Services,
}

pub fn company() -> CompanyConfig {
    CompanyConfig {
        name: "Golden Hour Events".to_string(),
        address: Some("12 Harbour Road".to_string()),
        email: Some("hello@goldenhour.test".to_string()),
        phone: None,
    }
}

pub fn setup() -> TestApp {
    let stores = Stores::in_memory();
    let objects = Arc::new(InMemoryObjectStore::new());
    let services = Services::new(&stores, objects.clone(), company());
    TestApp { stores, objects, services }
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.services.router()
    }
}

pub fn lead_request(name: &str, email: &str) -> LeadRequest {
    LeadRequest {
        full_name: name.to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}

pub fn item(particulars: &str, amount: f64, quantity: i64) -> LineItem {
    LineItem {
        particulars: particulars.to_string(),
        amount,
        quantity,
        remarks: None,
        total: 0.0,
    }
}

pub fn category(name: &str, items: Vec<LineItem>) -> Category {
    Category {
        category_name: name.to_string(),
        items,
    }
}

pub fn quotation_request(title: &str, lead: Option<String>, categories: Vec<Category>, fee: f64) -> QuotationRequest {
    QuotationRequest {
        title: title.to_string(),
        lead,
        quotation_date: Some("2024-08-01".to_string()),
        agency_fee_percent: fee,
        categories,
        ..Default::default()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

/// Hex id of a record serialized as JSON (`{"_id": {"$oid": "..."}}`).
pub fn oid(value: &Value) -> String {
    value["_id"]["$oid"].as_str().unwrap().to_string()
}
