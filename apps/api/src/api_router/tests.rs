use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use schooldesk_application::IdentityTokenIssuer;
use schooldesk_core::{RoleClaims, TenantId, UserRole};
use schooldesk_infrastructure::{InMemorySchoolStore, JwtIdentityCodec};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;
use crate::api_config::{ApiCommand, ApiConfig, NoticeDrafterConfig, StorageConfig};
use crate::api_services::{Repositories, build_app_state, build_token_codec};

const FRONTEND_URL: &str = "http://localhost:3000";

fn config() -> ApiConfig {
    ApiConfig {
        command: ApiCommand::Serve,
        storage: StorageConfig::Memory,
        frontend_url: FRONTEND_URL.to_owned(),
        api_host: "127.0.0.1".to_owned(),
        api_port: 3001,
        jwt_secret: "router-test-signing-secret-with-length".to_owned(),
        token_ttl_hours: 1,
        notice_drafter: NoticeDrafterConfig::Template,
    }
}

fn router() -> Router {
    let repositories = Repositories::backed_by(Arc::new(InMemorySchoolStore::new()));
    let state = build_app_state(repositories, &config())
        .unwrap_or_else(|error| panic!("state should build: {error}"));

    build_router(state, FRONTEND_URL).unwrap_or_else(|error| panic!("router should build: {error}"))
}

fn token_for(role: UserRole, school_id: Option<TenantId>) -> String {
    let codec: JwtIdentityCodec =
        build_token_codec(&config()).unwrap_or_else(|error| panic!("codec: {error}"));
    codec
        .issue(&RoleClaims::new("subject-1", role, school_id, true))
        .unwrap_or_default()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    builder
        .body(body)
        .unwrap_or_else(|error| panic!("request should build: {error}"))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|error| panic!("router is infallible: {error}"));
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(&router(), request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn dashboard_routes_require_a_token() {
    let (status, body) = send(
        &router(),
        request("GET", "/api/dashboard/schools", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().is_some_and(|message| message.starts_with("unauthorized")));
}

#[tokio::test]
async fn tampered_tokens_are_unauthorized() {
    let (status, _) = send(
        &router(),
        request("GET", "/api/dashboard/me", Some("not-a-jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn teachers_may_not_open_school_management() {
    let token = token_for(UserRole::Teacher, Some(TenantId::new()));
    let (status, _) = send(
        &router(),
        request("GET", "/api/dashboard/schools", Some(token.as_str()), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn me_lists_the_pages_of_the_role() {
    let token = token_for(UserRole::Student, Some(TenantId::new()));
    let (status, body) = send(
        &router(),
        request("GET", "/api/dashboard/me", Some(token.as_str()), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "student");
    assert_eq!(
        body["navigation"],
        json!([
            "/dashboard/notices",
            "/dashboard/my-result",
            "/dashboard/my-payments",
            "/dashboard"
        ])
    );
}

#[tokio::test]
async fn access_check_reports_the_admitted_roles() {
    let token = token_for(UserRole::Admin, Some(TenantId::new()));
    let (status, body) = send(
        &router(),
        request(
            "GET",
            "/api/dashboard/access?path=/dashboard/result-entry",
            Some(token.as_str()),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorized"], false);
    assert_eq!(body["allowed_roles"], json!(["teacher"]));
}

#[tokio::test]
async fn master_provisions_a_school_and_its_admin_enrols_a_student() {
    let router = router();
    let master = token_for(UserRole::Master, None);
    let expiry = Utc::now() + Duration::days(30);

    let (status, school) = send(
        &router,
        request(
            "POST",
            "/api/dashboard/schools",
            Some(master.as_str()),
            Some(json!({
                "name": "Green Valley School",
                "address": null,
                "max_students": 1,
                "max_teachers": 1,
                "expiry": expiry.to_rfc3339(),
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(school["code"].as_str().is_some_and(|code| code.starts_with("SCH-")));

    let school_id = school["id"]
        .as_str()
        .and_then(|value| value.parse::<TenantId>().ok())
        .unwrap_or_else(|| panic!("school id should parse"));
    let admin = token_for(UserRole::Admin, Some(school_id));
    let student = json!({
        "name": "Nadia Rahman",
        "class": "Class 1",
        "roll": 7,
        "shift": "Morning",
        "session": 2025,
    });

    let (status, enrolled) = send(
        &router,
        request(
            "POST",
            "/api/dashboard/students",
            Some(admin.as_str()),
            Some(student.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(enrolled["login_code"].as_str().is_some_and(|code| code.starts_with("STU-")));

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/api/dashboard/students",
            Some(admin.as_str()),
            Some(student),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn teachers_preview_gpa_without_saving() {
    let token = token_for(UserRole::Teacher, Some(TenantId::new()));
    let (status, body) = send(
        &router(),
        request(
            "POST",
            "/api/dashboard/result-entry/preview",
            Some(token.as_str()),
            Some(json!({
                "subjects": [
                    { "name": "Mathematics", "mark": 85 },
                    { "name": "English", "mark": 72 },
                ]
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gpa"], "4.50");
    assert_eq!(body["failed"], false);
    assert_eq!(body["subjects"][0]["letter"], "A+");
}
