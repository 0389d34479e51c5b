//! API integration tests
//!
//! Need a running server and database. Tokens are signed with `JWT_SECRET`
//! (or the development default), the way the identity provider signs them.

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use cfs_tracker::models::user::{TokenClaims, UserMetadata};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn token_for(role: &str) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let id = Uuid::new_v4();
    TokenClaims {
        sub: id,
        email: Some(format!("{}-{}@example.org", role, id.simple())),
        user_type: None,
        user_metadata: Some(UserMetadata {
            user_type: Some(role.to_string()),
            name: Some(format!("Test {}", role)),
        }),
        aud: None,
        exp: Utc::now().timestamp() + 3600,
        iat: Some(Utc::now().timestamp()),
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

async fn create_donation(client: &Client, quantity: i64, computer_type: &str) -> Value {
    let response = client
        .post(format!("{}/donations", BASE_URL))
        .json(&json!({
            "donor_name": "Integration Donor",
            "email": "donor@example.org",
            "phone": "+254700000001",
            "address": "Kilimani, Nairobi",
            "computer_type": computer_type,
            "quantity": quantity,
            "condition_status": "working"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

async fn set_donation_status(client: &Client, admin: &str, id: i64, status: &str) -> reqwest::Response {
    client
        .patch(format!("{}/donations/{}/status", BASE_URL, id))
        .bearer_auth(admin)
        .json(&json!({ "status": status }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let response = Client::new()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_anonymous_donation_is_pending() {
    let client = Client::new();
    let donation = create_donation(&client, 3, "laptop").await;

    assert_eq!(donation["status"], "pending");
    assert_eq!(donation["quantity"], 3);
    assert!(donation["user_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_invalid_donation_is_rejected() {
    let response = Client::new()
        .post(format!("{}/donations", BASE_URL))
        .json(&json!({
            "donor_name": "",
            "email": "not-an-email",
            "phone": "0700",
            "address": "Nairobi",
            "computer_type": "desktop",
            "quantity": 0,
            "condition_status": "working"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_admin_routes_require_admin() {
    let client = Client::new();

    let response = client
        .get(format!("{}/donations", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .get(format!("{}/donations", BASE_URL))
        .bearer_auth(token_for("donor"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_me_resolves_role_from_metadata() {
    let response = Client::new()
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(token_for("school"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["role"], "school");
}

#[tokio::test]
#[ignore]
async fn test_unknown_status_is_rejected() {
    let client = Client::new();
    let admin = token_for("admin");
    let donation = create_donation(&client, 1, "desktop").await;
    let id = donation["id"].as_i64().unwrap();

    let response = set_donation_status(&client, &admin, id, "archived").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/donations/{}", BASE_URL, id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
#[ignore]
async fn test_donation_to_school_workflow() {
    let client = Client::new();
    let admin = token_for("admin");
    let school = token_for("school");

    let donation = create_donation(&client, 2, "mixed").await;
    let donation_id = donation["id"].as_i64().unwrap();

    // Twice: the second call must not create another batch
    for _ in 0..2 {
        let response = set_donation_status(&client, &admin, donation_id, "processing").await;
        assert!(response.status().is_success());
    }

    let inventory: Vec<Value> = client
        .get(format!("{}/inventory?status=received", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let units: Vec<&Value> = inventory
        .iter()
        .filter(|unit| unit["donation_id"].as_i64() == Some(donation_id))
        .collect();
    assert_eq!(units.len(), 2);
    for unit in &units {
        assert_eq!(unit["computer_type"], "desktop");
        assert_eq!(unit["condition_received"], "working");
    }

    let request: Value = client
        .post(format!("{}/schools/requests", BASE_URL))
        .bearer_auth(&school)
        .json(&json!({
            "school_name": "Integration Primary",
            "contact_person": "Head Teacher",
            "email": "head@integration.ac.ke",
            "phone": "+254711000000",
            "location": "Nakuru",
            "computer_type": "any",
            "quantity": 2,
            "reason_for_request": "No computers for 400 pupils"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let request_id = request["id"].as_i64().unwrap();

    let response = client
        .patch(format!("{}/schools/requests/{}/status", BASE_URL, request_id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "approved", "admin_comment": "Delivery next month" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .patch(format!("{}/schools/requests/{}/status", BASE_URL, request_id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "fulfilled" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut statuses = Vec::new();
    for unit in &units {
        let body: Value = client
            .post(format!("{}/inventory/fulfill", BASE_URL))
            .bearer_auth(&admin)
            .json(&json!({
                "requestId": request_id,
                "inventoryItemIds": [unit["id"]]
            }))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        statuses.push(body["request_status"].as_str().unwrap().to_string());
    }
    assert_eq!(statuses, vec!["approved", "fulfilled"]);
}

#[tokio::test]
#[ignore]
async fn test_fulfill_unknown_item_is_not_found() {
    let client = Client::new();
    let response = client
        .post(format!("{}/inventory/fulfill", BASE_URL))
        .bearer_auth(token_for("admin"))
        .json(&json!({ "requestId": 1, "inventoryItemIds": [i64::MAX] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_impact_report_is_public() {
    let response = Client::new()
        .get(format!("{}/stats/impact-report", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_computers_donated"].is_number());
}
