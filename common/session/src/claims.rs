use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::roles::Role;

/// Application-focused view of a decoded token payload.
///
/// Extraction only: nothing here proves the token was signed by the
/// backend. Immutable once decoded; a new token must be issued to
/// change claims.
#[derive(Debug, Clone)]
pub struct Claims {
    pub subject: Uuid,
    pub role: Role,
    pub store_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    /// The full decoded payload; unknown fields ride along uninterpreted.
    pub raw: serde_json::Value,
}

impl Claims {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Store-scoped roles need a store claim and branch-scoped roles a
    /// branch claim before their dashboards are fully usable.
    pub fn needs_onboarding(&self) -> bool {
        match self.role {
            Role::StoreAdmin | Role::StoreManager => self.store_id.is_none(),
            Role::BranchManager | Role::BranchCashier => self.branch_id.is_none(),
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    sub: String,
    #[serde(default)]
    authorities: Option<AuthoritiesRepr>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default, rename = "storeId")]
    store_id: Option<String>,
    #[serde(default, rename = "branchId")]
    branch_id: Option<String>,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
}

/// The backend emits either a single authority string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthoritiesRepr {
    Single(String),
    Many(Vec<String>),
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = SessionError;

    fn try_from(value: ClaimsRepr) -> SessionResult<Self> {
        let subject = Uuid::parse_str(&value.sub)
            .map_err(|_| SessionError::InvalidClaim("sub", value.sub.clone()))?;

        // `authorities` wins over `role`, mirroring the issuing backend.
        let role_text = match value.authorities {
            Some(AuthoritiesRepr::Single(item)) => Some(item),
            Some(AuthoritiesRepr::Many(items)) => items.into_iter().next(),
            None => None,
        }
        .or(value.role)
        .ok_or(SessionError::InvalidClaim("role", "<missing>".to_string()))?;
        let role = Role::parse(&role_text);

        let store_id = parse_optional_id("storeId", value.store_id)?;
        let branch_id = parse_optional_id("branchId", value.branch_id)?;

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| SessionError::InvalidClaim("exp", value.exp.to_string()))?;

        let issued_at = match value.iat {
            Some(iat) => Some(
                Utc.timestamp_opt(iat, 0)
                    .single()
                    .ok_or_else(|| SessionError::InvalidClaim("iat", iat.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            subject,
            role,
            store_id,
            branch_id,
            expires_at,
            issued_at,
            raw: serde_json::Value::Null,
        })
    }
}

impl TryFrom<serde_json::Value> for Claims {
    type Error = SessionError;

    fn try_from(value: serde_json::Value) -> SessionResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value.clone())
            .map_err(|err| SessionError::PayloadJson(err.to_string()))?;
        let mut claims = Claims::try_from(repr)?;
        claims.raw = value;
        Ok(claims)
    }
}

fn parse_optional_id(
    claim: &'static str,
    value: Option<String>,
) -> SessionResult<Option<Uuid>> {
    match value {
        Some(text) if !text.trim().is_empty() => Uuid::parse_str(text.trim())
            .map(Some)
            .map_err(|_| SessionError::InvalidClaim(claim, text)),
        _ => Ok(None),
    }
}
