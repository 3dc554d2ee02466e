//! Authorization context passed into every grid operation.
//!
//! Role names are only inspected once, when the context is granted. The grid
//! layer receives an [`AccessContext`] and never branches on roles itself.

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_AUTHOR: &str = "author";

/// Roles allowed to manage the category hierarchy of their tenant.
pub const CATEGORY_MANAGER_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];

/// Returns `true` if `role` may manage categories.
pub fn can_manage_categories(role: &str) -> bool {
    CATEGORY_MANAGER_ROLES.contains(&role)
}

/// A resolved, already-checked permission to act within one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessContext {
    tenant_id: DbId,
    acting_user_id: DbId,
}

impl AccessContext {
    /// Grant access after the caller's identity and role have been verified.
    pub fn grant(tenant_id: DbId, acting_user_id: DbId) -> Self {
        Self {
            tenant_id,
            acting_user_id,
        }
    }

    pub fn tenant_id(&self) -> DbId {
        self.tenant_id
    }

    pub fn acting_user_id(&self) -> DbId {
        self.acting_user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_roles() {
        assert!(can_manage_categories("admin"));
        assert!(can_manage_categories("manager"));
        assert!(!can_manage_categories("author"));
        assert!(!can_manage_categories("Manager"));
        assert!(!can_manage_categories(""));
    }

    #[test]
    fn context_accessors() {
        let ctx = AccessContext::grant(7, 42);
        assert_eq!(ctx.tenant_id(), 7);
        assert_eq!(ctx.acting_user_id(), 42);
    }
}
