//! AML 查询代理的 HTTP 处理器
//!
//! 权限槛之外还要求账号订阅了 aml 服务;端点凭据按请求的环境
//! 从服务目录取,未配置时直接 400,不发起外呼。

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::aml::{AmlOrganizationRequest, AmlPersonRequest},
};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 个人 AML 查询
pub async fn person_info(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<AmlPersonRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "create-aml-request")
        .await?;

    ensure_subscribed(&auth_context)?;
    req.validate()?;

    let env_type = req.env_type;
    let endpoint = crate::repository::ServiceRepository::new(state.db.clone())
        .endpoint_for("aml", env_type)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("AML service is not configured properly.".to_string())
        })?;

    let data = state
        .aml_service
        .request_info(
            env_type,
            &endpoint,
            req.into_payload(),
            auth_context.user_id,
            "person_info",
        )
        .await?;

    Ok(Json(json!({
        "message": "AML request processed successfully.",
        "data": data
    })))
}

/// 企业 AML 查询
pub async fn organization_info(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<AmlOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require(&auth_context, "create-aml-request")
        .await?;

    ensure_subscribed(&auth_context)?;
    req.validate()?;

    let env_type = req.env_type;
    let endpoint = crate::repository::ServiceRepository::new(state.db.clone())
        .endpoint_for("aml", env_type)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("AML service is not configured properly.".to_string())
        })?;

    let data = state
        .aml_service
        .request_info(
            env_type,
            &endpoint,
            req.into_payload(),
            auth_context.user_id,
            "organization_info",
        )
        .await?;

    Ok(Json(json!({
        "message": "AML request processed successfully.",
        "data": data
    })))
}

fn ensure_subscribed(auth_context: &AuthContext) -> Result<(), AppError> {
    if !auth_context
        .subscribe_services
        .iter()
        .any(|s| s == "aml")
    {
        return Err(AppError::Forbidden(
            "AML service is not subscribed.".to_string(),
        ));
    }
    Ok(())
}
