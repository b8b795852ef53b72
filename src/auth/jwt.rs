//! JWT token generation and validation

use crate::{config::AppConfig, error::AppError, models::user::User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Email
    pub email: String,

    /// Role reference
    pub role_id: String,

    /// Subscribed provider keys
    pub subscribe_services: Vec<String>,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_exp_secs: config.security.access_token_exp_secs,
        })
    }

    /// Seconds until a freshly issued token expires
    pub fn access_token_exp_secs(&self) -> u64 {
        self.access_token_exp_secs
    }

    /// Generate access token for a user
    pub fn generate_access_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.access_token_exp_secs as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role_id: user.role_id.to_string(),
            subscribe_services: user.subscribe_services.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::Internal(format!("Failed to encode access token: {}", e))
        })
    }

    /// Validate and decode token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        Ok(decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AppError::Unauthorized
            })?
            .claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BootstrapConfig, DatabaseConfig, LoggingConfig, ProviderConfig, SecurityConfig,
        ServerConfig,
    };
    use secrecy::Secret;

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
                access_token_exp_secs: 900,
                password_min_length: 8,
                password_require_uppercase: true,
                password_require_digit: true,
            },
            provider: ProviderConfig {
                request_timeout_secs: 30,
            },
            bootstrap: BootstrapConfig {
                admin_email: "admin@localhost".to_string(),
                admin_password: Secret::new("ChangeMe-Admin-1!".to_string()),
            },
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            email: "test@example.com".to_string(),
            phone: None,
            password_hash: "x".to_string(),
            status: true,
            role_id: Uuid::new_v4(),
            parent_id: None,
            subscribe_services: vec!["aml".to_string()],
            created_by: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let user = test_user();

        let token = service.generate_access_token(&user).unwrap();

        let claims = service.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role_id, user.role_id.to_string());
        assert!(claims.subscribe_services.contains(&"aml".to_string()));
    }

    #[test]
    fn test_invalid_token_fails() {
        let service = JwtService::from_config(&test_config()).unwrap();
        assert!(service.validate_access_token("invalid_token").is_err());
    }

    #[test]
    fn test_token_from_other_secret_fails() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let mut other_config = test_config();
        other_config.security.jwt_secret =
            Secret::new("another_secret_key_32_characters_ok!".to_string());
        let other = JwtService::from_config(&other_config).unwrap();

        let token = other.generate_access_token(&test_user()).unwrap();
        assert!(service.validate_access_token(&token).is_err());
    }
}
