//! Permission repository (权限目录数据访问)

use crate::{
    error::AppError,
    models::role::{slugify, CreatePermissionRequest, Permission, UpdatePermissionRequest},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PermissionRepository {
    db: PgPool,
}

impl PermissionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建权限
    pub async fn create(&self, req: &CreatePermissionRequest) -> Result<Permission, AppError> {
        let permission = sqlx::query_as::<_, Permission>(
            r#"
            INSERT INTO permissions (name, slug, module)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(slugify(&req.name))
        .bind(&req.module)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            super::map_unique_violation(e, "A permission with this name already exists.")
        })?;

        Ok(permission)
    }

    /// 权限目录全量列表（按模块分组展示用，不做属主范围限制）
    pub async fn list(&self) -> Result<Vec<Permission>, AppError> {
        let permissions =
            sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY module, slug")
                .fetch_all(&self.db)
                .await?;

        Ok(permissions)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Permission>, AppError> {
        let permission = sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(permission)
    }

    /// 管理性编辑；slug 随名称重派生
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdatePermissionRequest,
    ) -> Result<Option<Permission>, AppError> {
        let slug = req.name.as_deref().map(slugify);
        let permission = sqlx::query_as::<_, Permission>(
            r#"
            UPDATE permissions SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                module = COALESCE($4, module),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(slug)
        .bind(&req.module)
        .fetch_optional(&self.db)
        .await?;

        Ok(permission)
    }
}
