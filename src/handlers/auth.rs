//! 认证相关的 HTTP 处理器

use crate::{
    auth::{middleware::AuthContext, scope::AccessScope},
    error::AppError,
    middleware::AppState,
    models::user::{LoginRequest, UserResponse},
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

/// 登录,签发访问令牌
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let response = state.auth_service.login(req).await?;
    Ok(Json(response))
}

/// 登出。访问令牌是无状态的,到期自动失效;这里记录事件并提示客户端丢弃令牌
pub async fn logout(auth_context: AuthContext) -> Result<impl IntoResponse, AppError> {
    tracing::info!(user_id = %auth_context.user_id, "user logged out");

    Ok(Json(serde_json::json!({
        "message": "Logout Successfully."
    })))
}

/// 当前登录用户详情
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(auth_context.user_id, &AccessScope::Unrestricted)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(UserResponse::from(user)))
}
