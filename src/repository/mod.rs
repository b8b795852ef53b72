//! 数据访问层
//! 所有 SQL 都在这里；列表和按 id 查询统一接受 AccessScope

pub mod permission_repo;
pub mod request_log_repo;
pub mod role_repo;
pub mod service_repo;
pub mod user_repo;

/// 唯一约束冲突归为调用方错误,其余数据库错误原样上抛
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> crate::error::AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            crate::error::AppError::BadRequest(message.to_string())
        }
        _ => crate::error::AppError::Database(err),
    }
}

pub use permission_repo::PermissionRepository;
pub use request_log_repo::{PgRequestLogStore, RequestLogRepository, RequestLogStore};
pub use role_repo::RoleRepository;
pub use service_repo::ServiceRepository;
pub use user_repo::UserRepository;
