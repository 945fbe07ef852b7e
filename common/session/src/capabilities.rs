use crate::error::{SessionError, SessionResult};
use crate::roles::Role;

/// Coarse action checks for callers that need "may this role do X"
/// rather than a route decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateUsers,
    ManageInventory,
    ViewAnalytics,
    ProcessTransactions,
}

// Simple mapping: which roles are allowed each capability.
fn allowed_roles(cap: Capability) -> &'static [Role] {
    use Capability::*;
    use Role::*;
    match cap {
        CreateUsers => &[SuperAdmin, StoreAdmin, StoreManager, BranchManager],
        ManageInventory => &[SuperAdmin, StoreAdmin, StoreManager, BranchManager],
        ViewAnalytics => &[SuperAdmin, StoreAdmin, StoreManager, BranchManager],
        ProcessTransactions => &[
            SuperAdmin,
            StoreAdmin,
            StoreManager,
            BranchManager,
            BranchCashier,
        ],
    }
}

pub fn role_can(role: &Role, cap: Capability) -> bool {
    allowed_roles(cap).iter().any(|allowed| allowed == role)
}

pub fn ensure_capability(role: &Role, cap: Capability) -> SessionResult<()> {
    if role_can(role, cap) {
        Ok(())
    } else {
        Err(SessionError::MissingCapability(cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cashier_processes_transactions_but_manages_nothing() {
        assert!(role_can(&Role::BranchCashier, Capability::ProcessTransactions));
        assert!(!role_can(&Role::BranchCashier, Capability::CreateUsers));
        assert!(!role_can(&Role::BranchCashier, Capability::ManageInventory));
        assert!(!role_can(&Role::BranchCashier, Capability::ViewAnalytics));
    }

    #[test]
    fn plain_user_has_no_capabilities() {
        for cap in [
            Capability::CreateUsers,
            Capability::ManageInventory,
            Capability::ViewAnalytics,
            Capability::ProcessTransactions,
        ] {
            assert!(!role_can(&Role::User, cap), "User unexpectedly has {cap:?}");
        }
    }

    #[test]
    fn super_admin_has_all() {
        for cap in [
            Capability::CreateUsers,
            Capability::ManageInventory,
            Capability::ViewAnalytics,
            Capability::ProcessTransactions,
        ] {
            assert!(ensure_capability(&Role::SuperAdmin, cap).is_ok());
        }
    }

    #[test]
    fn unknown_roles_are_denied() {
        let role = Role::Unknown("ROLE_AUDITOR".to_string());
        let err = ensure_capability(&role, Capability::ViewAnalytics).expect_err("should deny");
        assert!(matches!(
            err,
            SessionError::MissingCapability(Capability::ViewAnalytics)
        ));
    }
}
