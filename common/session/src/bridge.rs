use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

/// How long the transitional signal stays valid after tenant creation.
pub const DEFAULT_BRIDGE_TTL_SECONDS: i64 = 3600;

/// Transitional marker written right after a store is created, before
/// the backend has reissued the session token with the new store id.
///
/// Lifecycle: `Absent -> Pending` on tenant creation; `Pending` resolves
/// (cookie cleared) once the token carries the store id, or expires and
/// is treated as absent. The cookie value embeds its own expiry
/// (`<store-uuid>.<unix-expiry>`) so the TTL holds even against a
/// replayed stale cookie. A malformed or expired value never elevates
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeSignal {
    Absent,
    Pending {
        store_id: Uuid,
        expires_at: DateTime<Utc>,
    },
}

impl BridgeSignal {
    /// Client half of the bridge: a fresh signal for a just-created store.
    pub fn pending(store_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        BridgeSignal::Pending {
            store_id,
            expires_at: now + ttl,
        }
    }

    /// Parse a raw cookie value. Anything that is not a well-formed,
    /// still-live signal comes back as `Absent`.
    pub fn parse(raw: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(raw) = raw else {
            return BridgeSignal::Absent;
        };
        let Some((id, exp)) = raw.trim().split_once('.') else {
            return BridgeSignal::Absent;
        };
        let Ok(store_id) = Uuid::parse_str(id) else {
            return BridgeSignal::Absent;
        };
        let Ok(exp) = exp.parse::<i64>() else {
            return BridgeSignal::Absent;
        };
        let Some(expires_at) = Utc.timestamp_opt(exp, 0).single() else {
            return BridgeSignal::Absent;
        };
        if expires_at <= now {
            return BridgeSignal::Absent;
        }
        BridgeSignal::Pending {
            store_id,
            expires_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, BridgeSignal::Pending { .. })
    }

    pub fn store_id(&self) -> Option<Uuid> {
        match self {
            BridgeSignal::Pending { store_id, .. } => Some(*store_id),
            BridgeSignal::Absent => None,
        }
    }

    /// Serialized cookie value for a pending signal.
    pub fn cookie_value(&self) -> Option<String> {
        match self {
            BridgeSignal::Pending {
                store_id,
                expires_at,
            } => Some(format!("{store_id}.{}", expires_at.timestamp())),
            BridgeSignal::Absent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().expect("ts")
    }

    #[test]
    fn round_trips_through_the_cookie_value() {
        let store = Uuid::new_v4();
        let signal = BridgeSignal::pending(store, now(), Duration::seconds(3600));
        let value = signal.cookie_value().expect("value");
        let parsed = BridgeSignal::parse(Some(&value), now());
        assert_eq!(parsed, signal);
        assert_eq!(parsed.store_id(), Some(store));
    }

    #[test]
    fn absent_when_cookie_is_missing() {
        assert_eq!(BridgeSignal::parse(None, now()), BridgeSignal::Absent);
    }

    #[test]
    fn expired_signal_is_treated_as_absent() {
        let store = Uuid::new_v4();
        let signal = BridgeSignal::pending(store, now(), Duration::seconds(3600));
        let value = signal.cookie_value().expect("value");
        let later = now() + Duration::seconds(3601);
        assert_eq!(BridgeSignal::parse(Some(&value), later), BridgeSignal::Absent);
    }

    #[test]
    fn malformed_values_never_become_pending() {
        for raw in [
            "",
            "not-a-signal",
            "not-a-uuid.1700003600",
            "00000000-0000-0000-0000-000000000001.not-a-timestamp",
            "00000000-0000-0000-0000-000000000001",
        ] {
            assert_eq!(
                BridgeSignal::parse(Some(raw), now()),
                BridgeSignal::Absent,
                "{raw:?} should parse as absent"
            );
        }
    }
}
