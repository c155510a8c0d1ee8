#[macro_use]
mod common;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use serde_json::{Value, json};

use common::{Fixture, june, request};

/// Posts one attendance record and returns the response status.
macro_rules! record {
    ($app:expr, $token:expr, $body:expr) => {{
        test::call_service(
            &$app,
            request(Method::POST, "/api/attendance", Some($token))
                .set_json($body)
                .to_request(),
        )
        .await
        .status()
    }};
}

#[actix_web::test]
async fn attendance_is_recorded_once_per_day() {
    let fx = Fixture::new();
    let app = app!(fx.config.clone(), fx.stores.clone());
    let token = fx.employee.token.as_str();

    let status = record!(app, token, json!({
        "date": june(3), "status": "Present", "arrival": "08:30:00", "departure": "17:00:00"
    }));
    assert_eq!(status, StatusCode::CREATED);

    let status = record!(app, token, json!({ "date": june(3), "status": "Absent" }));
    assert_eq!(status, StatusCode::CONFLICT);

    let status = record!(app, token, json!({ "date": june(4), "status": "Absent", "arrival": "09:00:00" }));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = record!(app, token, json!({ "date": june(4), "status": "OnHoliday" }));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = record!(app, token, json!({ "date": june(4), "status": "AbsentSansJustification" }));
    assert_eq!(status, StatusCode::CREATED);

    let own: Value = test::read_body_json(
        test::call_service(&app, request(Method::GET, "/api/attendance", Some(token)).to_request()).await,
    )
    .await;
    let dates: Vec<&str> = own["data"].as_array().unwrap().iter().map(|a| a["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2024-06-04", "2024-06-03"]);
}

#[actix_web::test]
async fn attendance_overview_is_hr_only_and_recording_needs_a_profile() {
    let fx = Fixture::new();
    let app = app!(fx.config.clone(), fx.stores.clone());

    let status = record!(app, &fx.employee.token, json!({ "date": june(3), "status": "Present" }));
    assert_eq!(status, StatusCode::CREATED);

    let resp = test::call_service(&app, request(Method::GET, "/api/attendance/all", Some(&fx.employee.token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, request(Method::GET, "/api/attendance/all", Some(&fx.hr.token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let admin = common::actor(&fx.store, "root@example.org", hrm_conges::model::role::Role::Admin, None);
    let status = record!(app, &admin.token, json!({ "date": june(3), "status": "Present" }));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/payroll", Some(&admin.token))
            .set_json(json!({ "month": june(1), "base_salary": 2000.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Employee not found");
}

#[actix_web::test]
async fn hr_records_for_staff_and_settles_payroll() {
    let fx = Fixture::new();
    let app = app!(fx.config.clone(), fx.stores.clone());
    let ada = fx.employee.employee_id.unwrap();
    let alan = fx.other.employee_id.unwrap();

    let status = record!(app, &fx.hr.token, json!({ "employee_id": ada, "date": june(3), "status": "Present" }));
    assert_eq!(status, StatusCode::CREATED);
    let status = record!(app, &fx.employee.token, json!({ "employee_id": ada, "date": june(4), "status": "Present" }));
    assert_eq!(status, StatusCode::CREATED);
    let status = record!(app, &fx.employee.token, json!({ "employee_id": alan, "date": june(4), "status": "Present" }));
    assert_eq!(status, StatusCode::FORBIDDEN);
    let status = record!(app, &fx.hr.token, json!({ "employee_id": 9999, "date": june(4), "status": "Present" }));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let own: Value = test::read_body_json(
        test::call_service(&app, request(Method::GET, "/api/attendance", Some(&fx.employee.token)).to_request()).await,
    )
    .await;
    assert_eq!(own["data"].as_array().unwrap().len(), 2);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/payroll", Some(&fx.employee.token))
            .set_json(json!({ "employee_id": alan, "month": june(1), "base_salary": 3000.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/payroll", Some(&fx.hr.token))
            .set_json(json!({ "employee_id": ada, "month": june(1), "base_salary": 3000.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let payroll: Value = test::read_body_json(resp).await;
    assert_eq!(payroll["employee_id"], ada);
    assert_eq!(payroll["status"], "Pending");
    assert!(payroll["paid_on"].is_null());
    // two present days: 3000 * 0.05 * 2
    assert!((payroll["bonus"].as_f64().unwrap() - 300.0).abs() < 1e-6);
    let uri = format!("/api/payroll/{}/paid", payroll["id"].as_u64().unwrap());

    let resp = test::call_service(
        &app,
        request(Method::PATCH, &uri, Some(&fx.employee.token))
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        request(Method::PATCH, &uri, Some(&fx.hr.token))
            .set_json(json!({ "paid_on": "2024-07-05" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let paid: Value = test::read_body_json(resp).await;
    assert_eq!(paid["status"], "Paid");
    assert_eq!(paid["paid_on"], "2024-07-05");

    let resp = test::call_service(
        &app,
        request(Method::PATCH, &uri, Some(&fx.hr.token))
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        request(Method::PATCH, "/api/payroll/9999/paid", Some(&fx.hr.token))
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let own: Value = test::read_body_json(
        test::call_service(&app, request(Method::GET, "/api/payroll", Some(&fx.employee.token)).to_request()).await,
    )
    .await;
    assert_eq!(own["data"][0]["status"], "Paid");
}

#[actix_web::test]
async fn payroll_bonus_follows_the_month_attendance() {
    let fx = Fixture::new();
    let app = app!(fx.config.clone(), fx.stores.clone());
    let token = fx.employee.token.as_str();

    for day in 1..=10 {
        assert_eq!(record!(app, token, json!({ "date": june(day), "status": "Present" })), StatusCode::CREATED);
    }
    for day in 11..=15 {
        assert_eq!(record!(app, token, json!({ "date": june(day), "status": "Absent" })), StatusCode::CREATED);
    }
    // outside the paid month
    assert_eq!(record!(app, token, json!({ "date": "2024-07-01", "status": "Present" })), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/payroll", Some(token))
            .set_json(json!({ "month": june(15), "base_salary": 3000.0, "deductions": 100.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;

    // June has 30 days: 3000 * 0.05 * 10 - 3000 * 0.02 * 5
    let bonus = body["bonus"].as_f64().unwrap();
    assert!((bonus - 1200.0).abs() < 1e-6, "bonus was {bonus}");
    let net = body["net_salary"].as_f64().unwrap();
    assert!((net - 4100.0).abs() < 1e-6, "net was {net}");
    assert_eq!(body["month"], "2024-06-01");
    assert_eq!(body["status"], "Pending");

    let own: Value = test::read_body_json(
        test::call_service(&app, request(Method::GET, "/api/payroll", Some(token)).to_request()).await,
    )
    .await;
    assert_eq!(own["data"].as_array().unwrap().len(), 1);

    let resp = test::call_service(&app, request(Method::GET, "/api/payroll/all", Some(token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = test::call_service(&app, request(Method::GET, "/api/payroll/all", Some(&fx.hr.token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn payroll_rejects_non_positive_salaries_and_only_absences_earn_nothing() {
    let fx = Fixture::new();
    let app = app!(fx.config.clone(), fx.stores.clone());
    let token = fx.other.token.as_str();

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/payroll", Some(token))
            .set_json(json!({ "month": june(1), "base_salary": 0.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/payroll", Some(token))
            .set_json(json!({ "base_salary": 2000.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for day in 1..=30 {
        assert_eq!(record!(app, token, json!({ "date": june(day), "status": "AbsentSansJustification" })), StatusCode::CREATED);
    }
    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/payroll", Some(token))
            .set_json(json!({ "month": june(1), "base_salary": 2000.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["bonus"].as_f64().unwrap(), 0.0);
    assert_eq!(body["net_salary"].as_f64().unwrap(), 2000.0);
}

#[actix_web::test]
async fn inbox_is_private_and_read_flags_stick() {
    let fx = Fixture::new();
    let app = app!(fx.config.clone(), fx.stores.clone());

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/notifications", Some(&fx.employee.token))
            .set_json(json!({ "recipient_id": fx.other.user_id, "message": "hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/notifications", Some(&fx.hr.token))
            .set_json(json!({ "recipient_id": fx.employee.user_id, "message": "Payslips are out", "link": "/dashboard" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_u64().unwrap();
    assert_eq!(created["read"], false);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/notifications", Some(&fx.hr.token))
            .set_json(json!({ "recipient_id": fx.employee.user_id, "message": "  " }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        request(Method::POST, "/api/notifications", Some(&fx.hr.token))
            .set_json(json!({ "recipient_id": fx.employee.user_id, "message": "hi", "link": format!("/{}", "a".repeat(255)) }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/notifications/{id}/read");
    let resp = test::call_service(&app, request(Method::PATCH, &uri, Some(&fx.other.token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    for _ in 0..2 {
        let resp = test::call_service(&app, request(Method::PATCH, &uri, Some(&fx.employee.token)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["read"], true);
    }

    let inbox: Value = test::read_body_json(
        test::call_service(&app, request(Method::GET, "/api/notifications", Some(&fx.employee.token)).to_request()).await,
    )
    .await;
    assert_eq!(inbox["data"].as_array().unwrap().len(), 1);
    assert_eq!(inbox["data"][0]["link"], "/dashboard");

    let other: Value = test::read_body_json(
        test::call_service(&app, request(Method::GET, "/api/notifications", Some(&fx.other.token)).to_request()).await,
    )
    .await;
    assert_eq!(other["data"], json!([]));

    let resp = test::call_service(&app, request(Method::GET, "/api/notifications/all", Some(&fx.other.token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = test::call_service(&app, request(Method::GET, "/api/notifications/all", Some(&fx.hr.token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
