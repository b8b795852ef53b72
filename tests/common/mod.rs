//! 测试公共模块
//! 提供测试配置、数据库初始化和数据夹具

use kyx_service::{
    config::{
        AppConfig, BootstrapConfig, DatabaseConfig, LoggingConfig, ProviderConfig, SecurityConfig,
        ServerConfig,
    },
    db,
    models::role::slugify,
};
use secrecy::Secret;
use sqlx::PgPool;
use uuid::Uuid;

/// 创建测试配置。依赖数据库的测试由 TEST_DATABASE_URL 驱动，
/// 未设置时返回 None，调用方跳过该测试。
pub fn create_test_config() -> Option<AppConfig> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    Some(AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Secret::new(database_url),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new("test-secret-key-for-testing-only-min-32-chars".to_string()),
            access_token_exp_secs: 300, // 5分钟用于测试
            password_min_length: 8,
            password_require_uppercase: true,
            password_require_digit: true,
        },
        provider: ProviderConfig {
            request_timeout_secs: 5,
        },
        bootstrap: BootstrapConfig {
            admin_email: "admin@test.local".to_string(),
            admin_password: Secret::new("TestAdmin123".to_string()),
        },
    })
}

/// 初始化测试数据库
pub async fn setup_test_db(config: &AppConfig) -> PgPool {
    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    // 运行迁移
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // 清理测试数据（如果有）
    sqlx::query(
        "TRUNCATE TABLE request_logs, role_permissions, users, services, roles, permissions CASCADE",
    )
    .execute(&pool)
    .await
    .ok(); // 允许失败（表可能还不存在）

    pool
}

/// 创建测试角色
pub async fn create_test_role(pool: &PgPool, name: &str, created_by: Option<Uuid>) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO roles (name, slug, status, editable, created_by)
        VALUES ($1, $2, TRUE, TRUE, $3)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(slugify(name))
    .bind(created_by)
    .fetch_one(pool)
    .await
    .expect("Failed to create test role")
}

/// 创建测试用户
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    role_id: Uuid,
    created_by: Option<Uuid>,
) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (first_name, last_name, email, password_hash, role_id, created_by)
        VALUES ('Test', 'User', $1, 'not-a-real-hash', $2, $3)
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(role_id)
    .bind(created_by)
    .fetch_one(pool)
    .await
    .expect("Failed to create test user")
}
