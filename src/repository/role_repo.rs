//! Role repository (角色数据访问)

use crate::{
    auth::scope::AccessScope,
    error::AppError,
    models::role::{slugify, CreateRoleRequest, Permission, Role, RoleWithPermissions, UpdateRoleRequest},
};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct RoleRepository {
    db: PgPool,
}

impl RoleRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建角色及其权限集合
    pub async fn create(&self, req: &CreateRoleRequest, created_by: Uuid) -> Result<Role, AppError> {
        let mut tx = self.db.begin().await?;

        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name, slug, description, status, editable, created_by)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(slugify(&req.name))
        .bind(&req.description)
        .bind(req.status)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| super::map_unique_violation(e, "A role with this name already exists."))?;

        for permission_id in &req.permissions {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(role.id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(role)
    }

    /// 按属主范围列出角色
    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<Role>, AppError> {
        let roles = match scope.creator() {
            Some(creator) => {
                sqlx::query_as::<_, Role>(
                    "SELECT * FROM roles WHERE created_by = $1 ORDER BY created_at DESC",
                )
                .bind(creator)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY created_at DESC")
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(roles)
    }

    /// 按 id 查找角色（应用属主范围；范围外的 id 表现为不存在）
    pub async fn find_by_id(&self, id: Uuid, scope: &AccessScope) -> Result<Option<Role>, AppError> {
        let role = match scope.creator() {
            Some(creator) => {
                sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1 AND created_by = $2")
                    .bind(id)
                    .bind(creator)
                    .fetch_optional(&self.db)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await?
            }
        };

        Ok(role)
    }

    /// 更新角色；权限集合整体替换
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateRoleRequest,
        updated_by: Uuid,
        scope: &AccessScope,
    ) -> Result<Option<Role>, AppError> {
        // 先在范围内确认存在，避免 403/404 区分泄露
        let Some(existing) = self.find_by_id(id, scope).await? else {
            return Ok(None);
        };

        if !existing.editable {
            return Err(AppError::BadRequest("This role cannot be edited".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let slug = req.name.as_deref().map(slugify);
        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                updated_by = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(slug)
        .bind(&req.description)
        .bind(req.status)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(permissions) = &req.permissions {
            sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for permission_id in permissions {
                sqlx::query(
                    "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)
                     ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(role))
    }

    /// 获取角色的权限明细
    pub async fn get_role_permissions(&self, role_id: Uuid) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.*
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.module, p.slug
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.db)
        .await?;

        Ok(permissions)
    }

    /// 授权引擎使用：一次联查加载角色与其权限 slug 集合
    /// 角色不存在时返回 None（配置错误，由引擎映射为拒绝）
    pub async fn find_with_permissions(
        &self,
        role_id: Uuid,
    ) -> Result<Option<RoleWithPermissions>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.slug, p.slug AS permission_slug
            FROM roles r
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE r.id = $1
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.db)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let mut role = RoleWithPermissions {
            id: first.get("id"),
            slug: first.get("slug"),
            permission_slugs: Vec::with_capacity(rows.len()),
        };

        for row in &rows {
            if let Some(slug) = row.get::<Option<String>, _>("permission_slug") {
                role.permission_slugs.push(slug);
            }
        }

        Ok(Some(role))
    }
}
