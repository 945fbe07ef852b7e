use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use tracing::warn;

use common_session::{evaluate, AccessRequest, BridgeSignal, Decision};

use crate::app::AppState;
use crate::cookies;

/// Runs the resolver on every request that reaches the gated router and
/// turns its decision into a response: pass-through with the resolved
/// session attached, a login redirect (optionally purging the token
/// cookie), or a not-found redirect. The only state it touches is the
/// instruction it attaches to the outgoing response.
pub async fn gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let now = Utc::now();
    let token =
        cookie_value(request.headers(), &state.config.token_cookie_name).map(str::to_owned);
    let bridge = BridgeSignal::parse(
        cookie_value(request.headers(), &state.config.bridge_cookie_name),
        now,
    );

    let access = AccessRequest {
        path: &path,
        token: token.as_deref(),
        bridge,
    };

    match evaluate(&access, now) {
        Decision::Allow {
            session,
            resolve_bridge,
        } => {
            state.metrics.decision("allow");
            if let Some(session) = session {
                if session.elevated {
                    state.metrics.bridge_event("elevated");
                }
                request.extensions_mut().insert(session);
            }
            let mut response = next.run(request).await;
            // Don't stomp a signal the handler just reissued.
            if resolve_bridge && !sets_cookie(&response, &state.config.bridge_cookie_name) {
                state.metrics.bridge_event("resolved");
                append_set_cookie(&mut response, &cookies::clear_bridge_cookie(&state.config));
            }
            response
        }
        Decision::RedirectToLogin { purge_token } => {
            state.metrics.decision("login_redirect");
            let mut response = Redirect::temporary(&state.config.login_path).into_response();
            if purge_token {
                append_set_cookie(&mut response, &cookies::clear_token_cookie(&state.config));
            }
            response
        }
        Decision::RedirectToNotFound => {
            state.metrics.decision("not_found_redirect");
            Redirect::temporary(&state.config.not_found_path).into_response()
        }
    }
}

pub(crate) fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    response.headers().get_all(SET_COOKIE).iter().any(|value| {
        value.to_str().is_ok_and(|raw| {
            raw.strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('='))
        })
    })
}

fn append_set_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(err) => warn!(error = %err, "failed to encode Set-Cookie header"),
    }
}
