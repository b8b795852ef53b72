//! 权限目录的 HTTP 处理器
//! 权限目录为全局资源,不做属主范围过滤

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::role::*,
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

/// 列出权限
pub async fn list_permissions(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "read-permission")
        .await?;

    let repo = crate::repository::PermissionRepository::new(state.db.clone());
    let permissions = repo.list().await?;

    Ok(Json(json!({
        "permissions": permissions,
        "count": permissions.len()
    })))
}

/// 创建权限,slug 由名称派生
pub async fn create_permission(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreatePermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "create-permission")
        .await?;

    req.validate()?;

    let repo = crate::repository::PermissionRepository::new(state.db.clone());
    let permission = repo.create(&req).await?;

    Ok(Json(json!({
        "message": "Permission created successfully",
        "permission": permission
    })))
}

/// 获取权限详情
pub async fn get_permission(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "read-permission")
        .await?;

    let repo = crate::repository::PermissionRepository::new(state.db.clone());
    let permission = repo.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Permission"))?;

    Ok(Json(permission))
}

/// 更新权限
pub async fn update_permission(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "update-permission")
        .await?;

    req.validate()?;

    let repo = crate::repository::PermissionRepository::new(state.db.clone());
    let permission = repo.update(id, &req).await?.ok_or_else(|| AppError::not_found("Permission"))?;

    Ok(Json(json!({
        "message": "Permission updated successfully",
        "permission": permission
    })))
}
