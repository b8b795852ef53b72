//! JWT 认证中间件
//! 验证 Bearer 令牌并把解析出的主体挂到请求扩展上

use crate::{auth::jwt::JwtService, error::AppError};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 已认证主体
/// 由认证中间件写入请求扩展，处理器通过提取器获取
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub role_id: Uuid,
    pub subscribe_services: Vec<String>,
}

/// JWT 认证中间件
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers())
        .ok_or_else(|| AppError::authentication("Authorization token is missing"))?;

    let claims = jwt_service.validate_access_token(&token)?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
    let role_id = Uuid::parse_str(&claims.role_id).map_err(|_| AppError::Unauthorized)?;

    req.extensions_mut().insert(AuthContext {
        user_id,
        email: claims.email,
        role_id,
        subscribe_services: claims.subscribe_services,
    });

    Ok(next.run(req).await)
}

/// 从 Authorization 头提取 Bearer 令牌
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;

    if let Some(token) = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer ")) {
        Some(token.to_string())
    } else {
        // 兼容不带 Bearer 前缀的旧客户端
        Some(value.to_string())
    }
}

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
