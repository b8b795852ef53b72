//! 请求日志查询的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::request_log::RequestLogFilters,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 列表查询参数:过滤条件 + 分页
#[derive(Debug, Deserialize)]
pub struct RequestLogQuery {
    pub service: Option<String>,
    pub env_type: Option<String>,
    pub main_status: Option<String>,
    pub request_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// 列出请求日志(属主范围内)
pub async fn list_request_logs(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<RequestLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let scope = state
        .permission_service
        .require(&auth_context, "read-request-log")
        .await?;

    let filters = RequestLogFilters {
        service: query.service,
        env_type: query.env_type,
        main_status: query.main_status,
        request_id: query.request_id,
        start_time: query.start_time,
        end_time: query.end_time,
    };

    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let repo = crate::repository::RequestLogRepository::new(state.db.clone());
    let logs = repo.list(&scope, &filters, limit, offset).await?;

    Ok(Json(json!({
        "request_logs": logs,
        "count": logs.len()
    })))
}

/// 获取单条请求日志
pub async fn get_request_log(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let scope = state
        .permission_service
        .require(&auth_context, "read-request-log")
        .await?;

    let repo = crate::repository::RequestLogRepository::new(state.db.clone());
    let log = repo
        .find_by_id(id, &scope)
        .await?
        .ok_or_else(|| AppError::not_found("Request log"))?;

    Ok(Json(log))
}
