//! 健康检查处理器
//! 提供 /health 与 /ready 端点

use crate::middleware::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// 存活探针响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// 就绪探针响应
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<HealthCheck>,
}

/// 健康检查项
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 存活探针:进程在即健康
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 就绪探针:检查数据库连通性
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadinessResponse> {
    let db_check = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => HealthCheck {
            name: "database".to_string(),
            status: "ok".to_string(),
            message: None,
        },
        Err(e) => HealthCheck {
            name: "database".to_string(),
            status: "failed".to_string(),
            message: Some(e.to_string()),
        },
    };

    let ready = db_check.status == "ok";
    Json(ReadinessResponse {
        ready,
        checks: vec![db_check],
    })
}
