use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::error::GatewayError;
use super::types::{WebhookRequest, WebhookResponse};
use super::upstream::UpstreamClient;
use crate::config::GatewayConfig;
use crate::devlog::DevLog;
use crate::mock::{self, MockState};

#[derive(Clone)]
pub struct GatewayState {
    config: Arc<GatewayConfig>,
    upstream: Option<UpstreamClient>,
    mock: Option<Arc<Mutex<MockState>>>,
    dev_log: DevLog,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let upstream = match config.upstream_url.as_deref() {
            Some(url) => Some(UpstreamClient::new(url)?),
            None => None,
        };
        let mock = config
            .mock_api
            .then(|| Arc::new(Mutex::new(MockState::default())));
        let dev_log = DevLog::new(config.dev_log);
        Ok(Self {
            config: Arc::new(config),
            upstream,
            mock,
            dev_log,
        })
    }

    pub fn dev_log(&self) -> &DevLog {
        &self.dev_log
    }
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/webhook", post(handle_webhook))
        .route("/api/health", get(handle_health))
        .route("/api/dev/logs", get(list_dev_logs).delete(clear_dev_logs))
        .with_state(state)
}

async fn handle_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if state.upstream.is_none() && state.mock.is_none() {
        error!("N8N_WEBHOOK_URL is not configured");
        return GatewayError::Config.into_response();
    }

    let Some(authorization) = headers.get(AUTHORIZATION).cloned() else {
        return GatewayError::Unauthorized.into_response();
    };

    let request: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "rejecting unparseable webhook body");
            return GatewayError::BadRequest.into_response();
        }
    };
    let event_name = request
        .get("eventName")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    if let Some(mock) = state.mock.as_ref() {
        return answer_from_mock(&state, mock, &event_name, request);
    }

    let Some(upstream) = state.upstream.as_ref() else {
        return GatewayError::Config.into_response();
    };
    debug!(event = %event_name, upstream = %upstream.url(), "forwarding webhook event");
    match upstream.forward(body, &authorization).await {
        Ok(bytes) => {
            if state.dev_log.is_enabled() {
                let response = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
                state.dev_log.record(&event_name, request, response);
            }
            (StatusCode::OK, [(CONTENT_TYPE, "application/json")], bytes).into_response()
        }
        Err(e) => {
            warn!(event = %event_name, code = e.code(), "webhook forward failed");
            record_failure(&state, &event_name, request, &e);
            e.into_response()
        }
    }
}

fn answer_from_mock(
    state: &GatewayState,
    mock: &Mutex<MockState>,
    event_name: &str,
    request: serde_json::Value,
) -> Response {
    let envelope: WebhookRequest = match serde_json::from_value(request.clone()) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "webhook body is not a request envelope");
            return GatewayError::BadRequest.into_response();
        }
    };

    let outcome = {
        let mut guard = mock.lock();
        mock::dispatch(&mut guard, &envelope)
    };
    let Some(response) = outcome else {
        let e = GatewayError::UnknownEvent(envelope.event_name.clone());
        warn!(event = %event_name, "no mock handler for event");
        record_failure(state, event_name, request, &e);
        return e.into_response();
    };

    debug!(
        event = %event_name,
        success = response.success,
        correlation_id = %response.correlation_id,
        "mock event handled"
    );
    record_response(state, event_name, request, &response);
    (StatusCode::OK, Json(response)).into_response()
}

fn record_response(
    state: &GatewayState,
    event_name: &str,
    request: serde_json::Value,
    response: &WebhookResponse,
) {
    if !state.dev_log.is_enabled() {
        return;
    }
    let response = serde_json::to_value(response).unwrap_or(serde_json::Value::Null);
    state.dev_log.record(event_name, request, response);
}

fn record_failure(
    state: &GatewayState,
    event_name: &str,
    request: serde_json::Value,
    e: &GatewayError,
) {
    record_response(state, event_name, request, &e.envelope());
}

async fn handle_health(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "upstreamConfigured": state.config.is_upstream_configured(),
        "mockApi": state.mock.is_some(),
    }))
}

async fn list_dev_logs(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(json!({
        "enabled": state.dev_log.is_enabled(),
        "logs": state.dev_log.entries(),
    }))
}

async fn clear_dev_logs(State(state): State<GatewayState>) -> impl IntoResponse {
    state.dev_log.clear();
    info!("dev log cleared");
    StatusCode::NO_CONTENT
}
