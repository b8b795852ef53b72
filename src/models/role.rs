//! Role and permission domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Slug of the privileged role. Bypasses permission checks and ownership
/// scoping; seeded as non-editable.
pub const SUPER_ADMIN_SLUG: &str = "super-admin";

/// Permission catalogue entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Free-text category, used for UI grouping only
    pub module: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: bool,
    /// Seed roles such as super-admin are not editable through the normal
    /// update path
    pub editable: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role resolved together with its permission slugs, the shape the
/// authorization engine evaluates
#[derive(Debug, Clone)]
pub struct RoleWithPermissions {
    pub id: Uuid,
    pub slug: String,
    pub permission_slugs: Vec<String>,
}

/// Create role request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: bool,
    #[serde(default)]
    pub permissions: Vec<Uuid>,
}

fn default_status() -> bool {
    true
}

/// Update role request; slug is re-derived when the name changes
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub permissions: Option<Vec<Uuid>>,
}

/// Create permission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePermissionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub module: String,
}

/// Update permission request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePermissionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub module: Option<String>,
}

/// Derive a machine slug from a human-readable name: lowercase, runs of
/// non-alphanumerics collapse to a single '-'
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
