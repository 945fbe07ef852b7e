use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use common_session::{decode_claims, BridgeSignal, SessionContext};

use crate::app::AppState;
use crate::cookies;
use crate::gate::cookie_value;

/// Headers the upstream copies onto the proxied request after a
/// successful gate verdict.
pub const EFFECTIVE_ROLE_HEADER: &str = "x-effective-role";
pub const STORE_ID_HEADER: &str = "x-store-id";
pub const BRANCH_ID_HEADER: &str = "x-branch-id";
pub const ROLE_ELEVATED_HEADER: &str = "x-role-elevated";

pub async fn health() -> &'static str {
    "ok"
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "unable to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Forward-auth verdict for everything that cleared the gate. Public
/// paths come through with no session and get a bare 200; everything
/// else carries the effective-session headers.
pub async fn gate_verdict(session: Option<SessionContext>) -> Response {
    let mut response = StatusCode::OK.into_response();
    if let Some(session) = &session {
        set_header(
            &mut response,
            EFFECTIVE_ROLE_HEADER,
            session.effective_role.as_str(),
        );
        if let Some(store_id) = session.effective_store_id {
            set_header(&mut response, STORE_ID_HEADER, &store_id.to_string());
        }
        if let Some(branch_id) = session.claims.branch_id {
            set_header(&mut response, BRANCH_ID_HEADER, &branch_id.to_string());
        }
        if session.elevated {
            set_header(&mut response, ROLE_ELEVATED_HEADER, "true");
        }
    }
    response
}

#[derive(Serialize)]
pub struct TokenDebug {
    pub token_present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_onboarding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub bridge: BridgeDebug,
}

#[derive(Serialize)]
pub struct BridgeDebug {
    pub pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Token-debug view: the decoded (unverified) claims and the current
/// bridge signal, for poking at a session while a store is onboarding.
/// The claims shown here prove nothing about who signed them.
pub async fn debug_token(State(state): State<AppState>, headers: HeaderMap) -> Json<TokenDebug> {
    let now = Utc::now();
    let token = cookie_value(&headers, &state.config.token_cookie_name);
    let bridge = BridgeSignal::parse(
        cookie_value(&headers, &state.config.bridge_cookie_name),
        now,
    );

    let mut debug = TokenDebug {
        token_present: token.is_some(),
        role: None,
        role_display: None,
        expired: None,
        needs_onboarding: None,
        claims: None,
        error: None,
        bridge: BridgeDebug {
            pending: bridge.is_pending(),
            store_id: bridge.store_id(),
            expires_at: match &bridge {
                BridgeSignal::Pending { expires_at, .. } => Some(*expires_at),
                BridgeSignal::Absent => None,
            },
        },
    };

    if let Some(token) = token {
        match decode_claims(token) {
            Ok(claims) => {
                debug.role = Some(claims.role.as_str().to_string());
                debug.role_display = Some(claims.role.display_name().to_string());
                debug.expired = Some(claims.is_expired(now));
                debug.needs_onboarding = Some(claims.needs_onboarding());
                debug.claims = Some(claims.raw);
            }
            Err(err) => debug.error = Some(err.to_string()),
        }
    }

    Json(debug)
}

#[derive(Deserialize)]
pub struct OnboardingRequest {
    #[serde(rename = "storeId")]
    pub store_id: Uuid,
}

#[derive(Serialize)]
pub struct OnboardingResponse {
    #[serde(rename = "storeId")]
    pub store_id: Uuid,
    #[serde(rename = "bridgeExpiresAt")]
    pub bridge_expires_at: DateTime<Utc>,
}

/// Client half of the session bridge: once the backend confirms the new
/// store, hand the browser the transitional signal instead of blocking
/// until the token is reissued. Any authenticated role may call this;
/// the resolver decides later whether elevation applies.
pub async fn complete_onboarding(
    State(state): State<AppState>,
    session: SessionContext,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Response, StatusCode> {
    let now = Utc::now();
    let expires_at = now + Duration::seconds(state.config.bridge_ttl_seconds);
    let signal = BridgeSignal::Pending {
        store_id: payload.store_id,
        expires_at,
    };
    let cookie =
        cookies::bridge_cookie(&state.config, &signal).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    info!(
        subject = %session.claims.subject,
        store_id = %payload.store_id,
        "issued transitional store signal"
    );

    let body = OnboardingResponse {
        store_id: payload.store_id,
        bridge_expires_at: expires_at,
    };
    let mut response = (StatusCode::OK, Json(body)).into_response();
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(err) => {
            warn!(error = %err, "failed to encode bridge cookie");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
    Ok(response)
}

fn set_header(response: &mut Response, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(name), value);
        }
        Err(err) => warn!(header = name, error = %err, "failed to encode header value"),
    }
}
