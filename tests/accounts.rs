#[macro_use]
mod common;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use serde_json::{Value, json};

use common::request;
use hrm_conges::auth::jwt::verify_token;
use hrm_conges::config::HrNotifyPolicy;
use hrm_conges::model::role::Role;
use hrm_conges::store::{MemoryStore, Stores};

fn registration(email: &str) -> Value {
    json!({
        "first_name": "Marie",
        "last_name": "Curie",
        "email": email,
        "password": "polonium-84",
        "confirm_password": "polonium-84"
    })
}

#[actix_web::test]
async fn register_then_login_issues_working_tokens() {
    let stores = Stores::memory(MemoryStore::new());
    let app = app!(common::config(HrNotifyPolicy::First), stores.clone());

    let resp = test::call_service(
        &app,
        request(Method::POST, "/auth/register", None)
            .set_json(registration("Marie.Curie@Example.org"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let claims = verify_token(body["token"].as_str().unwrap(), common::SECRET).unwrap();
    assert_eq!(claims.role, Role::Employee);
    assert_eq!(claims.sub, "marie.curie@example.org");
    assert_eq!(claims.name.as_deref(), Some("Marie Curie"));
    assert!(claims.employee_id.is_some());

    let resp = test::call_service(
        &app,
        request(Method::POST, "/auth/login", None)
            .set_json(json!({ "email": "MARIE.CURIE@example.org", "password": "polonium-84" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();

    let resp = test::call_service(&app, request(Method::GET, "/api/leave", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn duplicate_emails_conflict() {
    let stores = Stores::memory(MemoryStore::new());
    let app = app!(common::config(HrNotifyPolicy::First), stores);

    let first = test::call_service(
        &app,
        request(Method::POST, "/auth/register", None)
            .set_json(registration("pierre@example.org"))
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let again = test::call_service(
        &app,
        request(Method::POST, "/auth/register", None)
            .set_json(registration(" Pierre@example.org "))
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(again).await;
    assert_eq!(body["error"], "Email already exists");
}

#[actix_web::test]
async fn registration_validates_its_fields() {
    let stores = Stores::memory(MemoryStore::new());
    let app = app!(common::config(HrNotifyPolicy::First), stores);

    let mut mismatch = registration("irene@example.org");
    mismatch["confirm_password"] = json!("something-else");
    let resp = test::call_service(
        &app,
        request(Method::POST, "/auth/register", None).set_json(mismatch).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut long_name = registration("irene@example.org");
    long_name["first_name"] = json!("I".repeat(101));
    let resp = test::call_service(
        &app,
        request(Method::POST, "/auth/register", None).set_json(long_name).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "first_name must be at most 100 characters");

    let mut missing = registration("irene@example.org");
    missing["last_name"] = json!("");
    let resp = test::call_service(
        &app,
        request(Method::POST, "/auth/register", None).set_json(missing).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn bad_credentials_get_the_same_generic_answer() {
    let stores = Stores::memory(MemoryStore::new());
    let app = app!(common::config(HrNotifyPolicy::First), stores);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/auth/register", None)
            .set_json(registration("eve@example.org"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let wrong_password = test::call_service(
        &app,
        request(Method::POST, "/auth/login", None)
            .set_json(json!({ "email": "eve@example.org", "password": "guess" }))
            .to_request(),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(wrong_password).await;

    let unknown = test::call_service(
        &app,
        request(Method::POST, "/auth/login", None)
            .set_json(json!({ "email": "nobody@example.org", "password": "guess" }))
            .to_request(),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown: Value = test::read_body_json(unknown).await;
    assert_eq!(wrong_password, unknown);

    let empty = test::call_service(
        &app,
        request(Method::POST, "/auth/login", None)
            .set_json(json!({ "email": "eve@example.org" }))
            .to_request(),
    )
    .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}
