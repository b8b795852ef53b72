//! Request log repository (请求日志数据访问)
//!
//! 写路径（审计记录器使用）通过 RequestLogStore trait 暴露，
//! 便于在不连数据库的测试里替换为内存实现。

use crate::{
    auth::scope::AccessScope,
    error::AppError,
    models::request_log::{NewRequestLog, RequestLog, RequestLogFilters, ResolvedLog},
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// 审计台账的写入口
#[async_trait]
pub trait RequestLogStore: Send + Sync {
    /// 外呼前同步写入 Created 记录
    async fn create(&self, log: &NewRequestLog) -> Result<Uuid, AppError>;

    /// 调用落定后恰好一次的更新
    async fn resolve(&self, id: Uuid, resolved: &ResolvedLog) -> Result<(), AppError>;
}

/// Postgres 实现
pub struct PgRequestLogStore {
    db: PgPool,
}

impl PgRequestLogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RequestLogStore for PgRequestLogStore {
    async fn create(&self, log: &NewRequestLog) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO request_logs (
                request_id, user_id, service, env_type,
                country_source, request_type, request, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&log.request_id)
        .bind(log.user_id)
        .bind(&log.service)
        .bind(log.env_type.as_str())
        .bind(&log.country_source)
        .bind(&log.request_type)
        .bind(&log.request)
        .bind(log.created_by)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::AuditPersistence(e.to_string()))?;

        Ok(id)
    }

    async fn resolve(&self, id: Uuid, resolved: &ResolvedLog) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE request_logs SET
                trans_id = $2,
                main_status = $3,
                sub_status = $4,
                response = $5,
                response_at = $6,
                updated_at = NOW()
            WHERE id = $1 AND response_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&resolved.trans_id)
        .bind(resolved.main_status.as_str())
        .bind(resolved.sub_status.as_str())
        .bind(&resolved.response)
        .bind(resolved.response_at)
        .execute(&self.db)
        .await
        .map_err(|e| AppError::AuditPersistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::AuditPersistence(format!(
                "request log {} missing or already resolved",
                id
            )));
        }

        Ok(())
    }
}

/// 浏览查询（管理端 request-logs 接口使用）
pub struct RequestLogRepository {
    db: PgPool,
}

impl RequestLogRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按属主范围和过滤条件列出请求日志
    pub async fn list(
        &self,
        scope: &AccessScope,
        filters: &RequestLogFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RequestLog>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM request_logs WHERE 1 = 1");

        if let Some(creator) = scope.creator() {
            builder.push(" AND created_by = ").push_bind(creator);
        }
        if let Some(service) = &filters.service {
            builder.push(" AND service = ").push_bind(service);
        }
        if let Some(env_type) = &filters.env_type {
            builder.push(" AND env_type = ").push_bind(env_type);
        }
        if let Some(main_status) = &filters.main_status {
            builder.push(" AND main_status = ").push_bind(main_status);
        }
        if let Some(request_id) = &filters.request_id {
            builder.push(" AND request_id = ").push_bind(request_id);
        }
        if let Some(start) = filters.start_time {
            builder.push(" AND request_at >= ").push_bind(start);
        }
        if let Some(end) = filters.end_time {
            builder.push(" AND request_at <= ").push_bind(end);
        }

        builder
            .push(" ORDER BY request_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let logs = builder
            .build_query_as::<RequestLog>()
            .fetch_all(&self.db)
            .await?;

        Ok(logs)
    }

    /// 按 id 查找（应用属主范围）
    pub async fn find_by_id(
        &self,
        id: Uuid,
        scope: &AccessScope,
    ) -> Result<Option<RequestLog>, AppError> {
        let log = match scope.creator() {
            Some(creator) => {
                sqlx::query_as::<_, RequestLog>(
                    "SELECT * FROM request_logs WHERE id = $1 AND created_by = $2",
                )
                .bind(id)
                .bind(creator)
                .fetch_optional(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, RequestLog>("SELECT * FROM request_logs WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await?
            }
        };

        Ok(log)
    }
}
