//! Runs against a live MongoDB (`MONGO_URI`/`MONGO_DATABASE`, or localhost):
//! `cargo test --test mongo_store_test -- --ignored`

use bson::{doc, Bson};
use planner_crm_backend::config::mongo_conf::MongoConfig;
use planner_crm_backend::model::employee::{Employee, EmployeeStatus};
use planner_crm_backend::model::lead::{Lead, LeadStatus};
use planner_crm_backend::repository::mongo_store::connect;
use planner_crm_backend::repository::record_store::{ListQuery, RecordStore};
use planner_crm_backend::repository::repository_error::RepositoryError;
use planner_crm_backend::repository::Stores;

async fn setup() -> Stores {
    let _ = dotenv::dotenv();
    let config = MongoConfig::from_env().unwrap_or_else(|_| MongoConfig::from_test_env());
    let db = connect(&config).await.expect("Failed to connect to MongoDB");
    Stores::mongo(&db).await.expect("Failed to prepare collections")
}

fn employee(email: &str) -> Employee {
    Employee {
        id: None,
        name: "Maya Chen".to_string(),
        email: email.to_string(),
        phone: None,
        role: Some("Coordinator".to_string()),
        department: None,
        status: EmployeeStatus::Active,
        notes: None,
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
#[ignore]
async fn test_lead_workflow() {
    let stores = setup().await;
    let lead_code = format!("LEAD-T{}", &bson::oid::ObjectId::new().to_hex()[17..]);
    let lead = Lead {
        id: None,
        lead_id: lead_code.clone(),
        full_name: "Ana Lopez".to_string(),
        email: "ana@example.com".to_string(),
        phone: Some("+1 555 0100".to_string()),
        status: LeadStatus::Won,
        check_in_date: "2031-08-15".parse().ok(),
        check_out_date: None,
        notes: None,
        services: vec!["Venue".to_string()],
        assigned_employee: None,
        custom_answers: Default::default(),
        created_at: None,
        updated_at: None,
    };

    let created = stores.leads.create(lead).await.expect("Failed to insert lead");
    let id = created.id.expect("id assigned");

    let in_august = stores
        .leads
        .find(
            doc! { "leadId": lead_code.as_str(), "checkInDate": { "$gte": "2031-08-01", "$lte": "2031-08-31" } },
            ListQuery::all(),
        )
        .await
        .expect("Failed to query leads");
    assert_eq!(in_august.len(), 1);

    let touched = stores
        .leads
        .update_many(doc! { "leadId": lead_code.as_str() }, doc! { "assignedEmployee": Bson::Null, "status": "lost" })
        .await
        .expect("Failed to update leads");
    assert_eq!(touched, 1);
    let fetched = stores.leads.get_by_id(id).await.expect("Failed to fetch lead");
    assert_eq!(fetched.status, LeadStatus::Lost);

    stores.leads.delete(id).await.expect("Failed to delete lead");
    assert!(stores.leads.get_by_id(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore]
async fn test_employee_email_is_unique() {
    let stores = setup().await;
    let email = format!("maya+{}@example.com", bson::oid::ObjectId::new().to_hex());
    let first = stores.employees.create(employee(&email)).await.expect("Failed to insert employee");

    let second = stores.employees.create(employee(&email)).await;
    assert!(matches!(second, Err(RepositoryError::AlreadyExists(_))));

    assert_eq!(stores.employees.count(doc! { "email": email.as_str() }).await.unwrap(), 1);

    stores.employees.delete(first.id.unwrap()).await.expect("Failed to delete employee");
}
