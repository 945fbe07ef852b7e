use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    decisions: IntCounterVec,
    bridge_events: IntCounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let decisions = IntCounterVec::new(
            Opts::new(
                "gateway_access_decisions_total",
                "Count of access decisions grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(decisions.clone()))?;

        let bridge_events = IntCounterVec::new(
            Opts::new(
                "gateway_bridge_events_total",
                "Count of transitional store-bridge events",
            ),
            &["event"],
        )?;
        registry.register(Box::new(bridge_events.clone()))?;

        Ok(Self {
            registry,
            decisions,
            bridge_events,
        })
    }

    pub fn decision(&self, outcome: &str) {
        self.decisions.with_label_values(&[outcome]).inc();
    }

    pub fn bridge_event(&self, event: &str) {
        self.bridge_events.with_label_values(&[event]).inc();
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
