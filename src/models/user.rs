//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub status: bool,
    pub role_id: Uuid,
    /// Sub-account hierarchy
    pub parent_id: Option<Uuid>,
    /// Provider keys this account may call, e.g. "aml"
    pub subscribe_services: Vec<String>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role_id: Uuid,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub subscribe_services: Vec<String>,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<bool>,
    pub role_id: Option<Uuid>,
    pub subscribe_services: Option<Vec<String>>,
}

/// User response (without sensitive data)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub status: bool,
    pub role_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub subscribe_services: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            status: user.status,
            role_id: user.role_id,
            parent_id: user.parent_id,
            subscribe_services: user.subscribe_services,
            created_at: user.created_at,
        }
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}
