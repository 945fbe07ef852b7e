pub mod bridge;
pub mod capabilities;
pub mod claims;
pub mod decision;
pub mod error;
pub mod permissions;
pub mod roles;
pub mod token;

pub use bridge::{BridgeSignal, DEFAULT_BRIDGE_TTL_SECONDS};
pub use capabilities::{ensure_capability, role_can, Capability};
pub use claims::Claims;
pub use decision::{evaluate, AccessRequest, Decision, SessionContext};
pub use error::{SessionError, SessionResult};
pub use permissions::{default_route, is_allowed, is_public, is_semi_public};
pub use roles::Role;
pub use token::decode_claims;
