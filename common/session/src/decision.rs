use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::bridge::BridgeSignal;
use crate::claims::Claims;
use crate::error::SessionError;
use crate::permissions;
use crate::roles::Role;
use crate::token;

/// Everything the resolver needs from one incoming request.
#[derive(Debug, Clone)]
pub struct AccessRequest<'a> {
    pub path: &'a str,
    pub token: Option<&'a str>,
    pub bridge: BridgeSignal,
}

/// The resolved session attached to an allowed request.
///
/// `effective_role` is what permission checks used; it differs from
/// `claims.role` only while the bridge elevation is active.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub claims: Claims,
    pub effective_role: Role,
    pub effective_store_id: Option<Uuid>,
    pub elevated: bool,
}

/// What the caller must do with the request.
#[derive(Debug, Clone)]
pub enum Decision {
    /// Let the request through. `resolve_bridge` instructs the caller to
    /// clear the signal cookie on the way out.
    Allow {
        session: Option<SessionContext>,
        resolve_bridge: bool,
    },
    /// Send to the login page; `purge_token` also clears the stored token.
    RedirectToLogin { purge_token: bool },
    /// Authenticated but not authorized for this path. Deliberately not
    /// the login page: the session is valid, the route is not theirs.
    RedirectToNotFound,
}

/// Single entry point for every request to a non-public path. Pure
/// computation over request-scoped data; the only mutation it ever asks
/// for is expressed in the returned decision. Fails closed: anything
/// ambiguous ends in a login redirect.
pub fn evaluate(request: &AccessRequest<'_>, now: DateTime<Utc>) -> Decision {
    let path = request.path;

    if permissions::is_public(path) {
        return Decision::Allow {
            session: None,
            resolve_bridge: false,
        };
    }

    let Some(raw_token) = request.token else {
        debug!(path, "no session token, redirecting to login");
        return Decision::RedirectToLogin { purge_token: false };
    };

    let claims = match token::decode_claims(raw_token) {
        Ok(claims) => claims,
        Err(err) => {
            warn!(path, error = %err, "undecodable session token, forcing re-auth");
            return Decision::RedirectToLogin { purge_token: true };
        }
    };

    // The signal carries its own expiry; an expired one is absent even
    // if the cookie outlived it.
    let bridge = match &request.bridge {
        BridgeSignal::Pending { expires_at, .. } if *expires_at <= now => &BridgeSignal::Absent,
        other => other,
    };

    let mut effective_role = claims.role.clone();
    let mut effective_store_id = claims.store_id;
    let mut elevated = false;
    let mut resolve_bridge = false;

    match (bridge, claims.store_id) {
        (BridgeSignal::Pending { store_id, .. }, None) => {
            effective_store_id = Some(*store_id);
            // Time-boxed trust extension for a fresh tenant owner whose
            // token has not caught up yet. Only the baseline role is
            // ever elevated.
            if claims.role == Role::User {
                effective_role = Role::StoreAdmin;
                elevated = true;
                debug!(path, store_id = %store_id, "bridge pending, elevating USER to STORE_ADMIN");
            }
        }
        (BridgeSignal::Pending { .. }, Some(_)) => {
            // Token caught up; the signal is no longer authoritative.
            resolve_bridge = true;
        }
        (BridgeSignal::Absent, _) => {}
    }

    let session = SessionContext {
        claims,
        effective_role,
        effective_store_id,
        elevated,
    };

    if permissions::is_semi_public(path) {
        return Decision::Allow {
            session: Some(session),
            resolve_bridge,
        };
    }

    if !permissions::is_allowed(&session.effective_role, path) {
        debug!(
            path,
            role = session.effective_role.as_str(),
            "role lacks route permission"
        );
        return Decision::RedirectToNotFound;
    }

    Decision::Allow {
        session: Some(session),
        resolve_bridge,
    }
}

/// Pulls the session the gate middleware resolved for this request.
#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or(SessionError::MissingContext)
    }
}
