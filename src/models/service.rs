//! Verification service catalogue models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Subscribable verification service
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub prefix: String,
    /// 0 - Inactive, 1 - Active
    pub status: i16,
    /// Per-environment endpoint credentials:
    /// {"sandbox": {"url": ..., "token": ...}, "production": {...}}
    pub tokens: Option<serde_json::Value>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Service response; endpoint credentials are never echoed back
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub prefix: String,
    pub status: i16,
    pub created_at: DateTime<Utc>,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            slug: service.slug,
            prefix: service.prefix,
            status: service.status,
            created_at: service.created_at,
        }
    }
}

/// Endpoint credentials for one environment of a service
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEndpoint {
    pub url: String,
    pub token: String,
}

/// Update service request (endpoint credentials per environment)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub status: Option<i16>,
    pub tokens: Option<serde_json::Value>,
}
