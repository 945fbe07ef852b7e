use serde::{Deserialize, Serialize};

/// Exactly one role per session; the permission table keys off it.
///
/// Unrecognised wire values land in `Unknown`, which the permission
/// table maps to nothing, so such sessions are denied by default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    SuperAdmin,
    StoreAdmin,
    StoreManager,
    BranchManager,
    BranchCashier,
    Unknown(String),
}

impl Role {
    /// Accepts the backend's `ROLE_`-prefixed spelling as well as bare
    /// names. `ROLE_CASHIER` is a legacy alias for the branch cashier.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.strip_prefix("ROLE_").unwrap_or(trimmed) {
            "USER" => Role::User,
            "SUPER_ADMIN" => Role::SuperAdmin,
            "STORE_ADMIN" => Role::StoreAdmin,
            "STORE_MANAGER" => Role::StoreManager,
            "BRANCH_MANAGER" => Role::BranchManager,
            "BRANCH_CASHIER" | "CASHIER" => Role::BranchCashier,
            _ => Role::Unknown(trimmed.to_string()),
        }
    }

    /// Canonical wire form, matching what the issuing backend embeds.
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "ROLE_USER",
            Role::SuperAdmin => "ROLE_SUPER_ADMIN",
            Role::StoreAdmin => "ROLE_STORE_ADMIN",
            Role::StoreManager => "ROLE_STORE_MANAGER",
            Role::BranchManager => "ROLE_BRANCH_MANAGER",
            Role::BranchCashier => "ROLE_BRANCH_CASHIER",
            Role::Unknown(raw) => raw,
        }
    }

    /// Numeric hierarchy used by navigation; higher ranks see more of
    /// the tree. Not consulted for route decisions.
    pub fn rank(&self) -> u8 {
        match self {
            Role::SuperAdmin => 6,
            Role::StoreAdmin => 5,
            Role::StoreManager => 4,
            Role::BranchManager => 3,
            Role::BranchCashier => 2,
            Role::User => 1,
            Role::Unknown(_) => 0,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Role::User => "User",
            Role::SuperAdmin => "Super Admin",
            Role::StoreAdmin => "Store Admin",
            Role::StoreManager => "Store Manager",
            Role::BranchManager => "Branch Manager",
            Role::BranchCashier => "Cashier",
            Role::Unknown(raw) => raw,
        }
    }
}
