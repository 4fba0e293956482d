mod common;

use bson::doc;
use common::{lead_request, setup};
use planner_crm_backend::dto::employee_dto::{EmployeeListParams, EmployeeRequest};
use planner_crm_backend::model::employee::EmployeeStatus;
use planner_crm_backend::service::employee_service::EmployeeService;
use planner_crm_backend::service::lead_service::LeadService;
use planner_crm_backend::util::error::ServiceError;

fn employee_request(name: &str, email: &str) -> EmployeeRequest {
    EmployeeRequest {
        name: name.to_string(),
        email: email.to_string(),
        role: Some("Coordinator".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_normalizes_email_and_defaults_status() {
    let app = setup();
    let employee = app
        .services
        .employee_service
        .create_employee(employee_request("Maya Chen", "  Maya@Example.com "))
        .await
        .unwrap();
    assert_eq!(employee.email, "maya@example.com");
    assert_eq!(employee.status, EmployeeStatus::Active);
    assert!(employee.created_at.is_some());
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let app = setup();
    let service = &app.services.employee_service;
    service
        .create_employee(employee_request("Maya Chen", "maya@example.com"))
        .await
        .unwrap();

    let result = service
        .create_employee(employee_request("Maya C.", "MAYA@example.com"))
        .await;

    assert!(matches!(result, Err(ServiceError::Conflict(_))));
    assert_eq!(app.stores.employees.count(doc! {}).await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = setup();
    let result = app
        .services
        .employee_service
        .create_employee(employee_request("Maya Chen", "not-an-email"))
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = setup();
    let service = &app.services.employee_service;
    service
        .create_employee(employee_request("Maya Chen", "maya@example.com"))
        .await
        .unwrap();
    let mut retired = employee_request("Tom Reyes", "tom@example.com");
    retired.status = Some("inactive".to_string());
    service.create_employee(retired).await.unwrap();

    let inactive = service
        .list_employees(EmployeeListParams {
            status: Some("inactive".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].name, "Tom Reyes");

    let everyone = service.list_employees(EmployeeListParams::default()).await.unwrap();
    assert_eq!(everyone.len(), 2);
}

#[tokio::test]
async fn test_update_keeps_status_when_omitted() {
    let app = setup();
    let service = &app.services.employee_service;
    let mut request = employee_request("Tom Reyes", "tom@example.com");
    request.status = Some("inactive".to_string());
    let created = service.create_employee(request).await.unwrap();

    let updated = service
        .update_employee(created.id.unwrap(), employee_request("Tom Reyes", "tom.reyes@example.com"))
        .await
        .unwrap();
    assert_eq!(updated.email, "tom.reyes@example.com");
    assert_eq!(updated.status, EmployeeStatus::Inactive);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_delete_unassigns_leads() {
    let app = setup();
    let employee = app
        .services
        .employee_service
        .create_employee(employee_request("Maya Chen", "maya@example.com"))
        .await
        .unwrap();
    let employee_id = employee.id.unwrap();
    let lead = app
        .services
        .lead_service
        .create_lead(lead_request("Ana Lopez", "ana@example.com"))
        .await
        .unwrap();
    let lead_id = lead.id.unwrap();
    let assigned = app
        .services
        .lead_service
        .assign_employee(lead_id, Some(employee_id))
        .await
        .unwrap();
    assert_eq!(assigned.assigned_employee, Some(employee_id));

    app.services.employee_service.delete_employee(employee_id).await.unwrap();

    let lead = app.services.lead_service.get_lead(lead_id).await.unwrap();
    assert_eq!(lead.assigned_employee, None);
    assert!(matches!(
        app.services.employee_service.get_employee(employee_id).await,
        Err(ServiceError::NotFound(_))
    ));
}
