mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use bson::doc;
use common::{empty_request, json_request, oid, send, setup};
use serde_json::{json, Value};

fn parse(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = setup();
    let (status, body) = send(&app.router(), empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_create_lead_without_email_writes_nothing() {
    let app = setup();
    let router = app.router();
    let (status, body) = send(&router, json_request("POST", "/leads", &json!({ "fullName": "Ana Lopez" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["error"], "Validation");

    let (status, body) = send(&router, empty_request("GET", "/leads?view=all")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!([]));
    assert_eq!(app.stores.leads.count(doc! {}).await.unwrap(), 0);
}

#[tokio::test]
async fn test_lead_roundtrip_through_the_api() {
    let app = setup();
    let router = app.router();
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/leads",
            &json!({
                "fullName": "Ana Lopez",
                "email": "ana@example.com",
                "checkInDate": "2024-08-15",
                "services": ["Venue", "Catering"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let lead = parse(&body);
    assert_eq!(lead["status"], "opportunity");
    assert!(lead["leadId"].as_str().unwrap().starts_with("LEAD-"));
    let id = oid(&lead);

    let (status, _) = send(
        &router,
        json_request("PUT", &format!("/leads/{}/status", id), &json!({ "status": "in-progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        json_request("POST", &format!("/leads/{}/notes", id), &json!({ "content": "Called back" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, empty_request("GET", &format!("/leads/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    let detail = parse(&body);
    assert_eq!(detail["lead"]["status"], "in-progress");
    assert_eq!(detail["notes"].as_array().unwrap().len(), 1);

    let (status, _) = send(&router, empty_request("DELETE", &format!("/leads/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&router, empty_request("GET", &format!("/leads/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_intake_form_redirects_to_new_lead() {
    let app = setup();
    let request = Request::builder()
        .method("POST")
        .uri("/leads/intake")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "fullName=Ana+Lopez&email=ana%40example.com&services=Venue&services=Flowers",
        ))
        .unwrap();
    let response = {
        use tower::ServiceExt;
        app.router().oneshot(request).await.unwrap()
    };
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/leads/"));

    let (status, body) = send(&app.router(), empty_request("GET", &location)).await;
    assert_eq!(status, StatusCode::OK);
    let detail = parse(&body);
    assert_eq!(detail["lead"]["fullName"], "Ana Lopez");
    assert_eq!(detail["lead"]["services"], json!(["Venue", "Flowers"]));
}

#[tokio::test]
async fn test_duplicate_employee_email_is_409() {
    let app = setup();
    let router = app.router();
    let employee = json!({ "name": "Maya Chen", "email": "maya@example.com" });
    let (status, _) = send(&router, json_request("POST", "/employees", &employee)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, json_request("POST", "/employees", &employee)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error = parse(&body);
    assert_eq!(error["error"], "Conflict");
    assert_eq!(error["message"], "Failed to create employee");
    assert_eq!(app.stores.employees.count(doc! {}).await.unwrap(), 1);
}

#[tokio::test]
async fn test_malformed_and_unknown_ids() {
    let app = setup();
    let router = app.router();
    let (status, body) = send(&router, empty_request("GET", "/quotations/not-an-id")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["error"], "BadRequest");

    let unknown = bson::oid::ObjectId::new().to_hex();
    let (status, body) = send(&router, empty_request("GET", &format!("/quotations/{}", unknown))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body)["error"], "NotFound");
}

#[tokio::test]
async fn test_quotation_preview_create_and_print() {
    let app = setup();
    let router = app.router();
    let draft = json!({
        "title": "Wedding package",
        "quotationDate": "2024-08-01",
        "agencyFeePercent": 12,
        "categories": [
            { "categoryName": "Venue", "items": [ { "particulars": "Hall hire", "amount": 1000, "quantity": 2 } ] }
        ]
    });

    let (status, body) = send(&router, json_request("POST", "/quotations/preview", &draft)).await;
    assert_eq!(status, StatusCode::OK);
    let preview = parse(&body);
    assert_eq!(preview["subTotal"], 2000.0);
    assert_eq!(preview["agencyFees"], 240.0);
    assert_eq!(preview["grandTotal"], 2240.0);
    assert_eq!(app.stores.quotations.count(doc! {}).await.unwrap(), 0);

    let (status, body) = send(&router, json_request("POST", "/quotations", &draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    let quotation = parse(&body);
    assert_eq!(quotation["grandTotal"], 2240.0);
    let id = oid(&quotation);

    let request = empty_request("GET", &format!("/quotations/{}/print", id));
    let response = {
        use tower::ServiceExt;
        router.clone().oneshot(request).await.unwrap()
    };
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = {
        use http_body_util::BodyExt;
        response.into_body().collect().await.unwrap().to_bytes()
    };
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Hall hire"));
    assert!(html.contains("2,240.00"));
    assert!(html.contains("No lead assigned"));

    let (status, body) = send(&router, empty_request("POST", &format!("/quotations/{}/duplicate", id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(parse(&body)["title"], "Wedding package (Copy)");
}

#[tokio::test]
async fn test_quotation_with_fee_over_100_is_rejected() {
    let app = setup();
    let (status, _) = send(
        &app.router(),
        json_request("POST", "/quotations", &json!({ "title": "Too much", "agencyFeePercent": 101 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stores.quotations.count(doc! {}).await.unwrap(), 0);
}

#[tokio::test]
async fn test_multipart_upload_and_download() {
    let app = setup();
    let router = app.router();
    let boundary = "plannerboundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"tags\"\r\n\r\n\
         venue, contract\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"contract.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         signed on the dotted line\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/storage")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let file = parse(&body);
    assert_eq!(file["name"], "contract.txt");
    assert_eq!(file["fileType"], "document");
    assert_eq!(file["tags"], json!(["venue", "contract"]));
    let id = oid(&file);

    let (status, body) = send(&router, empty_request("GET", &format!("/storage/{}/download", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"signed on the dotted line");

    let url = file["url"].as_str().unwrap().to_string();
    let (status, body) = send(&router, empty_request("GET", &url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"signed on the dotted line");

    let (status, _) = send(&router, empty_request("DELETE", &format!("/storage/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn test_calendar_and_dashboard_endpoints() {
    let app = setup();
    let router = app.router();
    send(
        &router,
        json_request(
            "POST",
            "/leads",
            &json!({ "fullName": "Ana Lopez", "email": "ana@example.com", "status": "won", "checkInDate": "2024-08-15" }),
        ),
    )
    .await;

    let (status, body) = send(&router, empty_request("GET", "/calendar?view=week&date=2024-08-15")).await;
    assert_eq!(status, StatusCode::OK);
    let calendar = parse(&body);
    assert_eq!(calendar["start"], "2024-08-11");
    assert_eq!(calendar["days"].as_array().unwrap().len(), 7);
    assert_eq!(calendar["days"][4]["entries"][0]["fullName"], "Ana Lopez");

    let (status, body) = send(&router, empty_request("GET", "/calendar?date=15-08-2024")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", String::from_utf8_lossy(&body));

    let (status, body) = send(&router, empty_request("GET", "/calendar?view=week&date=9999-12-31")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", String::from_utf8_lossy(&body));

    let (status, body) = send(&router, empty_request("GET", "/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    let summary = parse(&body);
    assert_eq!(summary["totalLeads"], 1);
    assert_eq!(summary["leadsByStatus"]["won"], 1);
}
