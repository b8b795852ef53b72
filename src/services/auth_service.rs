//! 认证服务
//! 邮箱 + 密码登录，签发访问令牌

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::user::{LoginRequest, LoginResponse},
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    password_hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            db,
            jwt_service,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// 登录
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let repo = UserRepository::new(self.db.clone());

        let Some(user) = repo.find_by_email(&req.email).await? else {
            // 统一返回认证失败，不暴露账号是否存在
            return Err(AppError::Unauthorized);
        };

        if !user.status {
            tracing::warn!(user_id = %user.id, "Login attempt on disabled account");
            return Err(AppError::Unauthorized);
        }

        self.password_hasher.verify(&req.password, &user.password_hash)?;

        let access_token = self.jwt_service.generate_access_token(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            access_token,
            expires_in: self.jwt_service.access_token_exp_secs(),
            user: user.into(),
        })
    }
}
