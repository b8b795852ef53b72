//! 启动期数据引导
//!
//! 幂等地补齐权限目录、super-admin 角色、初始管理员账号与 AML 服务条目。
//! 已存在的记录一律跳过,不做覆盖。

use crate::{
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::role::SUPER_ADMIN_SLUG,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use uuid::Uuid;

/// 权限目录: (name, slug, module)
const PERMISSION_CATALOGUE: &[(&str, &str, &str)] = &[
    ("Create User", "create-user", "users"),
    ("Read User", "read-user", "users"),
    ("Update User", "update-user", "users"),
    ("Create Role", "create-role", "roles"),
    ("Read Role", "read-role", "roles"),
    ("Update Role", "update-role", "roles"),
    ("Create Permission", "create-permission", "permissions"),
    ("Read Permission", "read-permission", "permissions"),
    ("Update Permission", "update-permission", "permissions"),
    ("Read Service", "read-service", "services"),
    ("Update Service", "update-service", "services"),
    ("Read Request Log", "read-request-log", "request-logs"),
    ("Create AML Request", "create-aml-request", "aml"),
];

/// 运行全部引导步骤,顺序固定:权限 → 角色 → 管理员 → 服务目录
pub async fn run(db: &PgPool, config: &AppConfig) -> Result<(), AppError> {
    seed_permissions(db).await?;
    let role_id = seed_super_admin_role(db).await?;
    seed_admin_user(db, config, role_id).await?;
    seed_aml_service(db).await?;

    tracing::info!("Bootstrap seeding completed");
    Ok(())
}

async fn seed_permissions(db: &PgPool) -> Result<(), AppError> {
    for (name, slug, module) in PERMISSION_CATALOGUE {
        sqlx::query(
            "INSERT INTO permissions (id, name, slug, module) VALUES ($1, $2, $3, $4)
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(module)
        .execute(db)
        .await?;
    }

    Ok(())
}

/// super-admin 角色:不可编辑,且无需挂接任何权限(授权判定短路)
async fn seed_super_admin_role(db: &PgPool) -> Result<Uuid, AppError> {
    if let Some(id) = sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE slug = $1")
        .bind(SUPER_ADMIN_SLUG)
        .fetch_optional(db)
        .await?
    {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO roles (id, name, slug, status, editable) VALUES ($1, $2, $3, TRUE, FALSE)",
    )
    .bind(id)
    .bind("Super Admin")
    .bind(SUPER_ADMIN_SLUG)
    .execute(db)
    .await?;

    tracing::info!(role_id = %id, "Seeded super-admin role");
    Ok(id)
}

async fn seed_admin_user(db: &PgPool, config: &AppConfig, role_id: Uuid) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(&config.bootstrap.admin_email)
        .fetch_optional(db)
        .await?;

    if exists.is_some() {
        return Ok(());
    }

    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash(config.bootstrap.admin_password.expose_secret())?;

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, first_name, last_name, email, password_hash, status, role_id, subscribe_services, created_by)
         VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $1)",
    )
    .bind(id)
    .bind("Super")
    .bind("Admin")
    .bind(&config.bootstrap.admin_email)
    .bind(&password_hash)
    .bind(role_id)
    .bind(vec!["aml".to_string()])
    .execute(db)
    .await?;

    tracing::info!(user_id = %id, email = %config.bootstrap.admin_email, "Seeded admin user");
    Ok(())
}

/// AML 服务条目:凭据留空,由运维通过服务目录接口补全
async fn seed_aml_service(db: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO services (id, name, slug, prefix, status) VALUES ($1, $2, $3, $4, 1)
         ON CONFLICT (slug) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind("AML Screening")
    .bind("aml")
    .bind("aml")
    .execute(db)
    .await?;

    Ok(())
}
