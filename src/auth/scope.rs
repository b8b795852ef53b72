//! Ownership scoping rule
//!
//! A single shared store acts as a logical multi-tenant hierarchy: every
//! owned row carries a `created_by` reference, and non-privileged principals
//! only see rows they created. One scoping function, applied by every
//! repository on both list and get-by-id paths, so a foreign id behaves as
//! "not found" rather than "forbidden".

use crate::models::role::SUPER_ADMIN_SLUG;
use uuid::Uuid;

/// Visibility restriction derived from the requesting principal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Privileged role: global visibility
    Unrestricted,
    /// Only rows with `created_by` equal to the principal's id
    CreatedBy(Uuid),
}

impl AccessScope {
    /// Derive the scope for a principal. Pure; no lookups.
    pub fn for_principal(user_id: Uuid, role_slug: &str) -> Self {
        if role_slug == SUPER_ADMIN_SLUG {
            AccessScope::Unrestricted
        } else {
            AccessScope::CreatedBy(user_id)
        }
    }

    /// The creator id rows must match, if restricted
    pub fn creator(&self) -> Option<Uuid> {
        match self {
            AccessScope::Unrestricted => None,
            AccessScope::CreatedBy(id) => Some(*id),
        }
    }

    /// Whether a row with the given `created_by` is visible under this scope
    pub fn allows(&self, created_by: Option<Uuid>) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::CreatedBy(id) => created_by == Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_is_unrestricted() {
        let id = Uuid::new_v4();
        assert_eq!(AccessScope::for_principal(id, "super-admin"), AccessScope::Unrestricted);
        assert_eq!(AccessScope::for_principal(id, "super-admin").creator(), None);
    }

    #[test]
    fn test_other_roles_are_restricted_to_creator() {
        let id = Uuid::new_v4();
        let scope = AccessScope::for_principal(id, "compliance-officer");
        assert_eq!(scope, AccessScope::CreatedBy(id));
        assert_eq!(scope.creator(), Some(id));
    }

    #[test]
    fn test_allows_matches_creator_only() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let scope = AccessScope::for_principal(me, "analyst");

        assert!(scope.allows(Some(me)));
        assert!(!scope.allows(Some(other)));
        assert!(!scope.allows(None));
        assert!(AccessScope::Unrestricted.allows(Some(other)));
        assert!(AccessScope::Unrestricted.allows(None));
    }
}
