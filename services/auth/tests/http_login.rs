//! Integration tests for the HTTP login backend against a stub API

use std::sync::Arc;

use auth::{
    HttpLoginBackend, LoginBackend, LoginCredentials, LoginError, LoginService, Role,
    SessionStore, login::DEFAULT_LOGIN_ERROR,
};
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use common::MemoryStorage;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Stand-in for the backend's employee login endpoint
async fn stub_login(Json(body): Json<Value>) -> impl IntoResponse {
    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("admin"), Some("admin-pass")) => (
            StatusCode::OK,
            Json(json!({
                "statusCode": 200,
                "data": {
                    "emp_id": "A1",
                    "emp_name": "Owner",
                    "emp_contact": "9000000000",
                    "username": "admin",
                    "isAdmin": true,
                    "created_at": "2024-06-01T00:00:00.000Z"
                },
                "message": "Login successful"
            })),
        )
            .into_response(),
        (Some("ravi"), Some("ravi-pass")) => Json(json!({
            "statusCode": 200,
            "data": {"emp_id": "E1", "emp_name": "Ravi", "isAdmin": false}
        }))
        .into_response(),
        (Some("broken"), _) => Json(json!({"statusCode": 200, "data": {"emp_name": "?"}}))
            .into_response(),
        (Some("pending"), _) => {
            Json(json!({"statusCode": 202, "message": "Account pending approval"}))
                .into_response()
        }
        (Some("silent"), _) => (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"statusCode": 401, "message": "Invalid username or password"})),
        )
            .into_response(),
    }
}

async fn spawn_backend() -> String {
    let app = Router::new().route("/api/employee/login", post(stub_login));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_admin_credentials_yield_admin_principal() {
    let backend = HttpLoginBackend::new(reqwest::Client::new(), spawn_backend().await);

    let principal = backend
        .authenticate(&LoginCredentials::new("admin", "admin-pass"))
        .await
        .unwrap();

    assert_eq!(principal.id, "A1");
    assert_eq!(principal.role, Role::Admin);
    assert_eq!(principal.extra["emp_contact"], "9000000000");
}

#[tokio::test]
async fn test_rejection_surfaces_backend_message() {
    let backend = HttpLoginBackend::new(reqwest::Client::new(), spawn_backend().await);

    let err = backend
        .authenticate(&LoginCredentials::new("ravi", "nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoginError::Rejected(ref m) if m == "Invalid username or password"));
}

#[tokio::test]
async fn test_non_200_status_code_is_rejected() {
    let backend = HttpLoginBackend::new(reqwest::Client::new(), spawn_backend().await);

    let err = backend
        .authenticate(&LoginCredentials::new("pending", "whatever"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Account pending approval");
}

#[tokio::test]
async fn test_unparseable_error_body_uses_default_message() {
    let backend = HttpLoginBackend::new(reqwest::Client::new(), spawn_backend().await);

    let err = backend
        .authenticate(&LoginCredentials::new("silent", "whatever"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), DEFAULT_LOGIN_ERROR);
}

#[tokio::test]
async fn test_principal_without_id_is_malformed() {
    let backend = HttpLoginBackend::new(reqwest::Client::new(), spawn_backend().await);

    let err = backend
        .authenticate(&LoginCredentials::new("broken", "whatever"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoginError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    // Bind and drop a listener so the port is very likely closed
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let backend = HttpLoginBackend::new(reqwest::Client::new(), format!("http://{}", addr));

    let err = backend
        .authenticate(&LoginCredentials::new("ravi", "ravi-pass"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoginError::Transport(_)));
}

#[tokio::test]
async fn test_service_stores_session_from_backend() {
    let backend = Arc::new(HttpLoginBackend::new(
        reqwest::Client::new(),
        spawn_backend().await,
    ));
    let store = SessionStore::new(Arc::new(MemoryStorage::new()));
    let service = LoginService::new(backend, store.clone());

    let outcome = service
        .login(&LoginCredentials::new("ravi", "ravi-pass"))
        .await
        .unwrap();

    assert_eq!(outcome.landing, "/employee/opening-details");
    assert_eq!(store.signed_in().map(|p| p.id), Some("E1".to_string()));

    service.logout().unwrap();
    assert_eq!(store.signed_in(), None);
}
