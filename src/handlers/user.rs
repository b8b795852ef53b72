//! 用户管理的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    auth::password::PasswordHasher,
    error::AppError,
    middleware::AppState,
    models::user::*,
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

/// 列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    // 检查权限
    let scope = state
        .permission_service
        .require(&auth_context, "read-user")
        .await?;

    let repo = crate::repository::UserRepository::new(state.db.clone());
    let users = repo.list(&scope).await?;

    let user_responses: Vec<UserResponse> = users.into_iter().map(|u| u.into()).collect();

    Ok(Json(json!({
        "users": user_responses,
        "count": user_responses.len()
    })))
}

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 检查权限
    state
        .permission_service
        .require(&auth_context, "create-user")
        .await?;

    req.validate()?;

    // 验证密码策略
    PasswordHasher::validate_password_policy(&req.password, &state.config)?;

    // 哈希密码
    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash(&req.password)?;

    let repo = crate::repository::UserRepository::new(state.db.clone());
    let user = repo
        .create(&req, &password_hash, Some(auth_context.user_id))
        .await?;

    Ok(Json(json!({
        "message": "User created successfully",
        "user": UserResponse::from(user)
    })))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // 检查权限
    let scope = state
        .permission_service
        .require(&auth_context, "read-user")
        .await?;

    let repo = crate::repository::UserRepository::new(state.db.clone());
    // 范围之外的记录一律按不存在处理
    let user = repo
        .find_by_id(id, &scope)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(UserResponse::from(user)))
}

/// 更新用户
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 检查权限
    let scope = state
        .permission_service
        .require(&auth_context, "update-user")
        .await?;

    req.validate()?;

    let repo = crate::repository::UserRepository::new(state.db.clone());
    let user = repo
        .update(id, &req, auth_context.user_id, &scope)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(json!({
        "message": "User updated successfully",
        "user": UserResponse::from(user)
    })))
}
