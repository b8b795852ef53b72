//! User repository (用户数据访问)

use crate::{
    auth::scope::AccessScope,
    error::AppError,
    models::user::{CreateUserRequest, UpdateUserRequest, User},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建用户；password_hash 已由服务层算好
    pub async fn create(
        &self,
        req: &CreateUserRequest,
        password_hash: &str,
        created_by: Option<Uuid>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                first_name, last_name, email, phone, password_hash,
                role_id, parent_id, subscribe_services, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(password_hash)
        .bind(req.role_id)
        .bind(req.parent_id)
        .bind(&req.subscribe_services)
        .bind(created_by)
        .fetch_one(&self.db)
        .await
        .map_err(|e| super::map_unique_violation(e, "A user with this email already exists."))?;

        Ok(user)
    }

    /// 按属主范围列出用户
    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<User>, AppError> {
        let users = match scope.creator() {
            Some(creator) => {
                sqlx::query_as::<_, User>(
                    "SELECT * FROM users WHERE created_by = $1 ORDER BY created_at DESC",
                )
                .bind(creator)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(users)
    }

    /// 按 id 查找（应用属主范围）
    pub async fn find_by_id(&self, id: Uuid, scope: &AccessScope) -> Result<Option<User>, AppError> {
        let user = match scope.creator() {
            Some(creator) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND created_by = $2")
                    .bind(id)
                    .bind(creator)
                    .fetch_optional(&self.db)
                    .await?
            }
            None => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await?
            }
        };

        Ok(user)
    }

    /// 登录与主体解析使用，不做范围限制
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 更新用户
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateUserRequest,
        updated_by: Uuid,
        scope: &AccessScope,
    ) -> Result<Option<User>, AppError> {
        let Some(_) = self.find_by_id(id, scope).await? else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                status = COALESCE($5, status),
                role_id = COALESCE($6, role_id),
                subscribe_services = COALESCE($7, subscribe_services),
                updated_by = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone)
        .bind(req.status)
        .bind(req.role_id)
        .bind(&req.subscribe_services)
        .bind(updated_by)
        .fetch_one(&self.db)
        .await?;

        Ok(Some(user))
    }
}
