//! 错误响应包络测试
//!
//! 校验 AppError 渲染出的 HTTP 响应:状态码、JSON 包络、
//! 业务失败时的供应商响应透传。

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use kyx_service::error::AppError;
use serde_json::{json, Value};

async fn render(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_forbidden_envelope() {
    let (status, body) = render(AppError::forbidden("Permission not granted.")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], 403);
    assert_eq!(body["error"]["message"], "Access denied. Permission not granted.");
    assert!(body["error"]["request_id"].is_string());
    assert!(body["error"].get("provider_response").is_none());
}

#[tokio::test]
async fn test_not_found_envelope() {
    let (status, body) = render(AppError::not_found("User")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Resource not found: User");
}

#[tokio::test]
async fn test_provider_business_echoes_payload() {
    let payload = json!({"error": "dob is malformed", "code": "E_VALIDATION"});
    let (status, body) = render(AppError::ProviderBusiness {
        status: 400,
        payload: payload.clone(),
    })
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["provider_response"], payload);
    assert_eq!(body["error"]["message"], "Verification provider returned status 400");
}

#[tokio::test]
async fn test_database_error_hides_details() {
    let (status, body) = render(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Database error occurred");
}
