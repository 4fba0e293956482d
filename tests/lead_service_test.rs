mod common;

use bson::doc;
use common::{category, item, lead_request, quotation_request, setup};
use planner_crm_backend::dto::employee_dto::EmployeeRequest;
use planner_crm_backend::dto::form_field_dto::FormFieldRequest;
use planner_crm_backend::dto::lead_dto::LeadListParams;
use planner_crm_backend::dto::note_dto::AddNoteRequest;
use planner_crm_backend::model::form_field::FieldType;
use planner_crm_backend::model::lead::LeadStatus;
use planner_crm_backend::service::employee_service::EmployeeService;
use planner_crm_backend::service::form_field_service::FormFieldService;
use planner_crm_backend::service::lead_service::LeadService;
use planner_crm_backend::service::note_service::NoteService;
use planner_crm_backend::service::quotation_service::QuotationService;
use planner_crm_backend::util::error::ServiceError;
use planner_crm_backend::view::quotation_print::{render_quotation, NO_LEAD};

#[tokio::test]
async fn test_missing_email_is_rejected_before_any_write() {
    let app = setup();
    let request = lead_request("Ana Lopez", "");
    let result = app.services.lead_service.create_lead(request).await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    assert_eq!(app.stores.leads.count(doc! {}).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_generates_lead_id_and_defaults() {
    let app = setup();
    let mut request = lead_request("Ana Lopez", "ana@example.com");
    request.check_in_date = Some("2024-08-15".to_string());
    request.services = vec!["catering".to_string(), " ".to_string()];
    let lead = app.services.lead_service.create_lead(request).await.unwrap();

    assert!(lead.id.is_some());
    assert!(lead.lead_id.starts_with("LEAD-"));
    assert_eq!(lead.status, LeadStatus::Opportunity);
    assert_eq!(lead.services, vec!["catering"]);
    assert_eq!(lead.check_in_date.map(|d| d.to_string()), Some("2024-08-15".to_string()));
    assert!(lead.created_at.is_some());
}

#[tokio::test]
async fn test_bad_status_and_dates_are_rejected() {
    let app = setup();
    let mut request = lead_request("Ana Lopez", "ana@example.com");
    request.status = Some("archived".to_string());
    assert!(app.services.lead_service.create_lead(request).await.is_err());

    let mut request = lead_request("Ana Lopez", "ana@example.com");
    request.check_in_date = Some("2024-08-15".to_string());
    request.check_out_date = Some("2024-08-10".to_string());
    assert!(app.services.lead_service.create_lead(request).await.is_err());

    assert_eq!(app.stores.leads.count(doc! {}).await.unwrap(), 0);
}

#[tokio::test]
async fn test_custom_questions_are_enforced() {
    let app = setup();
    app.services
        .form_field_service
        .create_field(FormFieldRequest {
            label: "Guest count".to_string(),
            field_type: FieldType::Number,
            required: true,
            options: vec![],
            sort_order: None,
        })
        .await
        .unwrap();
    app.services
        .form_field_service
        .create_field(FormFieldRequest {
            label: "Venue style".to_string(),
            field_type: FieldType::Select,
            required: false,
            options: vec!["Garden".to_string(), "Ballroom".to_string()],
            sort_order: None,
        })
        .await
        .unwrap();

    let missing = lead_request("Ana Lopez", "ana@example.com");
    assert!(matches!(
        app.services.lead_service.create_lead(missing).await,
        Err(ServiceError::InvalidInput(msg)) if msg.contains("Guest count")
    ));

    let mut bad_option = lead_request("Ana Lopez", "ana@example.com");
    bad_option.custom_answers.insert("Guest count".to_string(), "120".to_string());
    bad_option.custom_answers.insert("Venue style".to_string(), "Beach".to_string());
    assert!(app.services.lead_service.create_lead(bad_option).await.is_err());
    assert_eq!(app.stores.leads.count(doc! {}).await.unwrap(), 0);

    let mut ok = lead_request("Ana Lopez", "ana@example.com");
    ok.custom_answers.insert("Guest count".to_string(), "120".to_string());
    ok.custom_answers.insert("Venue style".to_string(), "Garden".to_string());
    let lead = app.services.lead_service.create_lead(ok).await.unwrap();
    assert_eq!(lead.custom_answers.len(), 2);
}

#[tokio::test]
async fn test_default_list_hides_inactive_statuses() {
    let app = setup();
    let service = &app.services.lead_service;
    let won = service.create_lead(lead_request("Won Lead", "won@example.com")).await.unwrap();
    service.update_lead_status(won.id.unwrap(), "won").await.unwrap();
    let lost = service.create_lead(lead_request("Lost Lead", "lost@example.com")).await.unwrap();
    service.update_lead_status(lost.id.unwrap(), "lost").await.unwrap();

    let default = service.list_leads(LeadListParams::default()).await.unwrap();
    assert_eq!(default.len(), 1);
    assert_eq!(default[0].full_name, "Won Lead");

    let all = service
        .list_leads(LeadListParams {
            view: Some("all".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let only_lost = service
        .list_leads(LeadListParams {
            status: Some("lost".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(only_lost.len(), 1);
    assert_eq!(only_lost[0].status, LeadStatus::Lost);
}

#[tokio::test]
async fn test_assigning_unknown_employee_fails() {
    let app = setup();
    let lead = app
        .services
        .lead_service
        .create_lead(lead_request("Ana Lopez", "ana@example.com"))
        .await
        .unwrap();
    let result = app
        .services
        .lead_service
        .assign_employee(lead.id.unwrap(), Some(bson::oid::ObjectId::new()))
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_edit_keeps_assignment_and_custom_answers() {
    let app = setup();
    app.services
        .form_field_service
        .create_field(FormFieldRequest {
            label: "Guest count".to_string(),
            field_type: FieldType::Number,
            required: true,
            options: vec![],
            sort_order: None,
        })
        .await
        .unwrap();
    let employee = app
        .services
        .employee_service
        .create_employee(EmployeeRequest {
            name: "Maya Chen".to_string(),
            email: "maya@example.com".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let service = &app.services.lead_service;
    let mut request = lead_request("Ana Lopez", "ana@example.com");
    request.custom_answers.insert("Guest count".to_string(), "120".to_string());
    let lead = service.create_lead(request).await.unwrap();
    let id = lead.id.unwrap();
    service.assign_employee(id, employee.id).await.unwrap();

    let mut edit = lead_request("Ana Lopez-Reyes", "ana@example.com");
    edit.notes = Some("prefers evening calls".to_string());
    let edited = service.update_lead(id, edit).await.unwrap();
    assert_eq!(edited.full_name, "Ana Lopez-Reyes");
    assert_eq!(edited.assigned_employee, employee.id);
    assert_eq!(edited.custom_answers.get("Guest count").map(String::as_str), Some("120"));

    let unassigned = service.assign_employee(id, None).await.unwrap();
    assert!(unassigned.assigned_employee.is_none());
    assert!(service.get_lead(id).await.unwrap().assigned_employee.is_none());
}

#[tokio::test]
async fn test_detail_lists_pinned_notes_first() {
    let app = setup();
    let lead = app
        .services
        .lead_service
        .create_lead(lead_request("Ana Lopez", "ana@example.com"))
        .await
        .unwrap();
    let lead_id = lead.id.unwrap();
    let notes = &app.services.note_service;
    notes
        .add_note(lead_id, AddNoteRequest { content: "first call".to_string(), created_by: None, pinned: true })
        .await
        .unwrap();
    notes
        .add_note(lead_id, AddNoteRequest { content: "sent brochure".to_string(), created_by: None, pinned: false })
        .await
        .unwrap();

    let detail = app.services.lead_service.get_lead_detail(lead_id).await.unwrap();
    assert_eq!(detail.notes.len(), 2);
    assert!(detail.notes[0].pinned);
    assert!(detail.assigned_employee.is_none());
}

#[tokio::test]
async fn test_delete_lead_removes_notes_and_detaches_quotations() {
    let app = setup();
    let lead = app
        .services
        .lead_service
        .create_lead(lead_request("Ana Lopez", "ana@example.com"))
        .await
        .unwrap();
    let lead_id = lead.id.unwrap();
    app.services
        .note_service
        .add_note(lead_id, AddNoteRequest { content: "call back".to_string(), created_by: None, pinned: false })
        .await
        .unwrap();
    let quotation = app
        .services
        .quotation_service
        .create_quotation(quotation_request(
            "Wedding package",
            Some(lead_id.to_hex()),
            vec![category("Venue", vec![item("Hall hire", 1000.0, 2)])],
            12.0,
        ))
        .await
        .unwrap();

    app.services.lead_service.delete_lead(lead_id).await.unwrap();

    assert_eq!(app.stores.leads.count(doc! {}).await.unwrap(), 0);
    assert_eq!(app.stores.notes.count(doc! {}).await.unwrap(), 0);
    let orphan = app
        .services
        .quotation_service
        .get_quotation(quotation.id.unwrap())
        .await
        .unwrap();
    assert_eq!(orphan.lead, None);
    assert_eq!(orphan.grand_total, 2240.0);

    let print = app
        .services
        .quotation_service
        .print_quotation(quotation.id.unwrap())
        .await
        .unwrap();
    let html = render_quotation(&print).unwrap();
    assert!(html.contains(NO_LEAD));

    assert!(matches!(
        app.services.lead_service.get_lead(lead_id).await,
        Err(ServiceError::NotFound(_))
    ));
}
