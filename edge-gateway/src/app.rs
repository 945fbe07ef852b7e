use std::sync::Arc;

use axum::extract::FromRef;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::config::GatewayConfig;
use crate::gate::gate;
use crate::handlers::{
    complete_onboarding, debug_token, gate_verdict, health, metrics_endpoint,
};
use crate::metrics::GatewayMetrics;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub metrics: Arc<GatewayMetrics>,
}

impl FromRef<AppState> for Arc<GatewayConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<GatewayMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

/// Infra routes stay outside the gate; every other path flows through
/// it, with the fallback answering for the whole navigation tree.
pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/test-jwt", get(debug_token))
        .route("/onboarding", post(complete_onboarding))
        .fallback(gate_verdict)
        .layer(middleware::from_fn_with_state(state.clone(), gate));

    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .merge(gated)
        .with_state(state)
}
