//! Service catalogue repository (服务目录数据访问)

use crate::{
    error::AppError,
    models::request_log::EnvType,
    models::service::{ProviderEndpoint, Service, UpdateServiceRequest},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ServiceRepository {
    db: PgPool,
}

impl ServiceRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 服务目录列表（目录是全局的，不做属主范围限制）
    pub async fn list(&self) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(services)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(service)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.db)
            .await?;

        Ok(service)
    }

    /// 更新服务（名称、状态、各环境端点凭据）
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateServiceRequest,
        updated_by: Uuid,
    ) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                tokens = COALESCE($4, tokens),
                updated_by = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(req.status)
        .bind(&req.tokens)
        .bind(updated_by)
        .fetch_optional(&self.db)
        .await?;

        Ok(service)
    }

    /// 取某服务在指定环境的端点凭据
    /// 服务不存在、未启用或该环境未配置时返回 None
    pub async fn endpoint_for(
        &self,
        slug: &str,
        env: EnvType,
    ) -> Result<Option<ProviderEndpoint>, AppError> {
        let Some(service) = self.find_by_slug(slug).await? else {
            return Ok(None);
        };

        if service.status != 1 {
            return Ok(None);
        }

        let endpoint = service
            .tokens
            .as_ref()
            .and_then(|tokens| tokens.get(env.as_str()))
            .and_then(|entry| serde_json::from_value::<ProviderEndpoint>(entry.clone()).ok());

        Ok(endpoint)
    }
}
