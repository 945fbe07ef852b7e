use crate::roles::Role;

/// The one canonical role -> path-prefix table. The request gate, any
/// layout guard, and navigation menus all consult this module; nothing
/// else may carry its own copy.
pub fn allowed_prefixes(role: &Role) -> &'static [&'static str] {
    match role {
        Role::User => &["/user/profile"],
        Role::SuperAdmin => &[
            "/admin",
            "/store/admin",
            "/store/cashier",
            "/store/branches",
            "/branch-manager",
            "/store-manager",
            "/cashier/dashboard",
            "/user/profile",
        ],
        Role::StoreAdmin => &[
            "/store/admin",
            "/store/cashier",
            "/store/branches",
            "/branch-manager",
            "/store-manager",
            "/cashier/dashboard",
            "/user/profile",
        ],
        Role::StoreManager => &[
            "/store-manager",
            "/store/branches",
            "/branch-manager",
            "/store/cashier",
            "/cashier/dashboard",
            "/user/profile",
        ],
        Role::BranchManager => &[
            "/branch-manager",
            "/store/cashier",
            "/cashier/dashboard",
            "/user/profile",
        ],
        Role::BranchCashier => &["/cashier/dashboard", "/store/cashier", "/user/profile"],
        Role::Unknown(_) => &[],
    }
}

/// Routes that never require a token: the home page, the auth pages
/// (login, sign-up, password reset), the tenant-creation page, the
/// theme preview, and the token-debug page.
pub const PUBLIC_PREFIXES: &[&str] = &[
    "/",
    "/auth",
    "/create-store",
    "/theme-selector",
    "/test-jwt",
];

/// Routes that require a token but no role check: the tenant-creation
/// submission route.
pub const SEMI_PUBLIC_PREFIXES: &[&str] = &["/onboarding"];

/// Home route per role; used when navigation needs somewhere to send a
/// fresh session.
pub fn default_route(role: &Role) -> &'static str {
    match role {
        Role::User => "/user/profile",
        Role::SuperAdmin => "/admin/dashboard",
        Role::StoreAdmin => "/store/admin",
        Role::StoreManager => "/store-manager",
        Role::BranchManager => "/branch-manager",
        Role::BranchCashier => "/cashier/dashboard",
        Role::Unknown(_) => "/",
    }
}

/// Pure, deterministic route check. Unknown roles get nothing.
pub fn is_allowed(role: &Role, path: &str) -> bool {
    let path = normalize(path);
    allowed_prefixes(role)
        .iter()
        .any(|prefix| prefix_matches(prefix, path))
}

pub fn is_public(path: &str) -> bool {
    let path = normalize(path);
    PUBLIC_PREFIXES
        .iter()
        .any(|prefix| prefix_matches(prefix, path))
}

pub fn is_semi_public(path: &str) -> bool {
    let path = normalize(path);
    SEMI_PUBLIC_PREFIXES
        .iter()
        .any(|prefix| prefix_matches(prefix, path))
}

/// A trailing slash is not a different route.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Prefix match on path-segment boundaries: `/store/cashier` covers
/// `/store/cashier/refunds/new` but not `/store/cashiers`. The bare
/// `/` prefix only matches the home page itself.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_ROLES: &[Role] = &[
        Role::User,
        Role::SuperAdmin,
        Role::StoreAdmin,
        Role::StoreManager,
        Role::BranchManager,
        Role::BranchCashier,
    ];

    #[test]
    fn every_known_role_has_a_reachable_home() {
        for role in KNOWN_ROLES {
            assert!(
                !allowed_prefixes(role).is_empty(),
                "{role:?} has no route entries"
            );
            assert!(
                is_allowed(role, default_route(role)),
                "{role:?} cannot reach its own default route"
            );
        }
    }

    #[test]
    fn lookup_is_deterministic_and_pure() {
        let first = is_allowed(&Role::BranchCashier, "/store/cashier/refunds/new");
        let second = is_allowed(&Role::BranchCashier, "/store/cashier/refunds/new");
        assert_eq!(first, second);
        assert!(first);
    }

    #[test]
    fn cashier_reaches_cashier_area_but_not_store_admin() {
        assert!(is_allowed(&Role::BranchCashier, "/store/cashier/refunds/new"));
        assert!(is_allowed(&Role::BranchCashier, "/cashier/dashboard"));
        assert!(!is_allowed(&Role::BranchCashier, "/store/admin"));
        assert!(!is_allowed(&Role::BranchCashier, "/store/branches"));
    }

    #[test]
    fn plain_user_is_confined_to_profile() {
        assert!(is_allowed(&Role::User, "/user/profile"));
        assert!(is_allowed(&Role::User, "/user/profile/settings"));
        assert!(!is_allowed(&Role::User, "/store/admin"));
        assert!(!is_allowed(&Role::User, "/cashier/dashboard"));
    }

    #[test]
    fn unknown_role_is_denied_everywhere() {
        let role = Role::Unknown("ROLE_INTERN".to_string());
        assert!(!is_allowed(&role, "/user/profile"));
        assert!(!is_allowed(&role, "/store/cashier"));
    }

    #[test]
    fn matching_is_boundary_aware() {
        assert!(is_allowed(&Role::BranchCashier, "/store/cashier"));
        assert!(!is_allowed(&Role::BranchCashier, "/store/cashiers"));
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        assert!(is_allowed(&Role::BranchCashier, "/store/cashier/"));
        assert!(is_public("/auth/login/"));
    }

    #[test]
    fn public_set_matches_exact_and_nested() {
        assert!(is_public("/"));
        assert!(is_public("/auth/login"));
        assert!(is_public("/auth/reset-password"));
        assert!(is_public("/create-store"));
        assert!(is_public("/test-jwt"));
        assert!(!is_public("/store/admin"));
        // The bare home prefix must not swallow everything.
        assert!(!is_public("/storefront"));
    }

    #[test]
    fn onboarding_submission_is_semi_public_only() {
        assert!(is_semi_public("/onboarding"));
        assert!(!is_semi_public("/onboard"));
        assert!(!is_public("/onboarding"));
    }
}
