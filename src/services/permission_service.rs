//! 授权引擎
//!
//! 每个受保护的路由静态声明一个权限 slug，处理器入口处调用
//! `require` 一次。决策本身是纯函数，角色加载是一次联查。

use crate::{
    auth::{middleware::AuthContext, scope::AccessScope},
    error::AppError,
    models::role::{RoleWithPermissions, SUPER_ADMIN_SLUG},
    repository::RoleRepository,
};
use sqlx::PgPool;

/// 授权决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// 拒绝原因；只回传决策，不回传调用方请求的权限集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NoRoleFound,
    PermissionNotGranted,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::NoRoleFound => "No role found.",
            DenyReason::PermissionNotGranted => "Permission not granted.",
        }
    }
}

/// 纯决策函数
///
/// 分支顺序固定：角色缺失优先；特权角色短路在任何权限集合检查之前，
/// 特权角色即使权限集合为空或异常也不会被拒绝。
pub fn decide(role: Option<&RoleWithPermissions>, required_slug: &str) -> Decision {
    let Some(role) = role else {
        return Decision::Deny(DenyReason::NoRoleFound);
    };

    if role.slug == SUPER_ADMIN_SLUG {
        return Decision::Allow;
    }

    if role.permission_slugs.iter().any(|slug| slug == required_slug) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::PermissionNotGranted)
    }
}

/// 授权服务
pub struct PermissionService {
    db: PgPool,
}

impl PermissionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 授权门禁：加载主体的角色及权限集合并做决策
    ///
    /// 通过时返回由同一次加载派生的属主范围，供后续查询使用。
    /// 存储故障以内部错误冒出，不折叠成拒绝。
    pub async fn require(
        &self,
        auth: &AuthContext,
        required_slug: &str,
    ) -> Result<AccessScope, AppError> {
        let repo = RoleRepository::new(self.db.clone());
        let role = repo.find_with_permissions(auth.role_id).await?;

        match decide(role.as_ref(), required_slug) {
            Decision::Allow => {
                // role 在 Allow 时必然存在
                let slug = role.map(|r| r.slug).unwrap_or_default();
                Ok(AccessScope::for_principal(auth.user_id, &slug))
            }
            Decision::Deny(reason) => {
                tracing::warn!(
                    user_id = %auth.user_id,
                    required = %required_slug,
                    reason = reason.as_str(),
                    "Authorization denied"
                );
                Err(AppError::forbidden(reason.as_str()))
            }
        }
    }

}
