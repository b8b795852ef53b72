//! 角色管理的 HTTP 处理器

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

/// 列出角色
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let scope = state
        .permission_service
        .require(&auth_context, "read-role")
        .await?;

    let repo = crate::repository::RoleRepository::new(state.db.clone());
    let roles = repo.list(&scope).await?;

    Ok(Json(json!({
        "roles": roles,
        "count": roles.len()
    })))
}

/// 创建角色,slug 由名称派生
pub async fn create_role(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "create-role")
        .await?;

    req.validate()?;

    let repo = crate::repository::RoleRepository::new(state.db.clone());
    let role = repo.create(&req, auth_context.user_id).await?;

    Ok(Json(json!({
        "message": "Role created successfully",
        "role": role
    })))
}

/// 获取角色详情(含权限明细)
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let scope = state
        .permission_service
        .require(&auth_context, "read-role")
        .await?;

    let repo = crate::repository::RoleRepository::new(state.db.clone());
    let role = repo
        .find_by_id(id, &scope)
        .await?
        .ok_or_else(|| AppError::not_found("Role"))?;

    let permissions = repo.get_role_permissions(id).await?;

    Ok(Json(json!({
        "role": role,
        "permissions": permissions
    })))
}

/// 更新角色,权限集整体替换
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let scope = state
        .permission_service
        .require(&auth_context, "update-role")
        .await?;

    req.validate()?;

    let repo = crate::repository::RoleRepository::new(state.db.clone());
    let role = repo
        .update(id, &req, auth_context.user_id, &scope)
        .await?
        .ok_or_else(|| AppError::not_found("Role"))?;

    Ok(Json(json!({
        "message": "Role updated successfully",
        "role": role
    })))
}
