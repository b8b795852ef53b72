//! 服务目录的 HTTP 处理器
//! 响应一律走 ServiceResponse,端点凭据不回显

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::service::{ServiceResponse, UpdateServiceRequest},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出服务
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "read-service")
        .await?;

    let repo = crate::repository::ServiceRepository::new(state.db.clone());
    let services = repo.list().await?;

    let responses: Vec<ServiceResponse> = services.into_iter().map(|s| s.into()).collect();

    Ok(Json(json!({
        "services": responses,
        "count": responses.len()
    })))
}

/// 获取服务详情
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "read-service")
        .await?;

    let repo = crate::repository::ServiceRepository::new(state.db.clone());
    let service = repo.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Service"))?;

    Ok(Json(ServiceResponse::from(service)))
}

/// 更新服务(含按环境的端点凭据)
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "update-service")
        .await?;

    req.validate()?;

    let repo = crate::repository::ServiceRepository::new(state.db.clone());
    let service = repo
        .update(id, &req, auth_context.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    Ok(Json(json!({
        "message": "Service updated successfully",
        "service": ServiceResponse::from(service)
    })))
}
