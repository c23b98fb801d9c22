use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::notify::{Notifier, Toast};
use crate::devlog::DevLog;
use crate::session::Session;
use crate::webhook::types::WebhookRequest;

const UNKNOWN_ERROR: &str = "An unknown error occurred";

#[derive(Debug, Error)]
pub enum HookError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected {
        message: String,
        code: Option<String>,
        correlation_id: String,
    },
    #[error("unexpected data shape: {0}")]
    Data(#[from] serde_json::Error),
}

impl HookError {
    pub fn code(&self) -> Option<&str> {
        match self {
            HookError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Posts envelopes to the gateway on behalf of a signed-in session.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    endpoint: String,
    dev_log: DevLog,
}

impl WebhookClient {
    /// `endpoint` is the full URL of the gateway route, e.g.
    /// `http://127.0.0.1:9002/api/webhook`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            dev_log: DevLog::disabled(),
        }
    }

    pub fn with_dev_log(mut self, dev_log: DevLog) -> Self {
        self.dev_log = dev_log;
        self
    }

    pub fn envelope(
        session: &Session,
        event_name: &str,
        payload: serde_json::Value,
    ) -> WebhookRequest {
        WebhookRequest {
            event_name: event_name.to_string(),
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            actor: session.actor(),
            payload,
        }
    }

    /// Sends one envelope and returns its `data`.
    ///
    /// The reply is read leniently: a non-2xx status, or any body without
    /// `success: true`, is a [`HookError::Rejected`] carrying the server's
    /// `error.message` when there is one.
    pub async fn send(
        &self,
        session: &Session,
        request: &WebhookRequest,
    ) -> Result<serde_json::Value, HookError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, session.bearer())
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        let mut body: serde_json::Value =
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        if self.dev_log.is_enabled() {
            self.dev_log
                .record(&request.event_name, serde_json::to_value(request)?, body.clone());
        }

        let correlation_id = body
            .get("correlationId")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let success = body.get("success").and_then(|v| v.as_bool()) == Some(true);
        debug!(
            event = %request.event_name,
            status = status.as_u16(),
            success,
            correlation_id = %correlation_id,
            "webhook response"
        );

        if !status.is_success() || !success {
            let error = body.get("error");
            let message = error
                .and_then(|e| e.get("message"))
                .and_then(|v| v.as_str())
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_ERROR)
                .to_string();
            let code = error
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str())
                .map(|c| c.to_string());
            return Err(HookError::Rejected {
                message,
                code,
                correlation_id,
            });
        }
        Ok(body
            .get_mut("data")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null))
    }
}

type SuccessCallback<P, R> = Box<dyn Fn(&R, &P) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&HookError) + Send + Sync>;

/// Request state for one call site: `data`, `error` and `is_loading`.
///
/// Automatic hooks fire from [`WebhookHook::sync`] whenever the dependency
/// signature (event, caller identity, serialized payload) changes. Manual
/// hooks only fire from [`WebhookHook::trigger`]. Overlapping triggers are
/// not deduplicated and nothing is retried.
pub struct WebhookHook<P, R> {
    client: Arc<WebhookClient>,
    notifier: Arc<dyn Notifier>,
    event_name: String,
    payload: P,
    manual: bool,
    error_message: Option<String>,
    on_success: Option<SuccessCallback<P, R>>,
    on_error: Option<ErrorCallback>,
    data: Option<R>,
    error: Option<HookError>,
    is_loading: bool,
    last_signature: Option<String>,
}

impl<P, R> WebhookHook<P, R>
where
    P: Serialize + Clone,
    R: DeserializeOwned,
{
    pub fn new(
        client: Arc<WebhookClient>,
        notifier: Arc<dyn Notifier>,
        event_name: impl Into<String>,
        payload: P,
    ) -> Self {
        Self {
            client,
            notifier,
            event_name: event_name.into(),
            payload,
            manual: false,
            error_message: None,
            on_success: None,
            on_error: None,
            data: None,
            error: None,
            is_loading: true,
            last_signature: None,
        }
    }

    pub fn manual(mut self) -> Self {
        self.manual = true;
        self.is_loading = false;
        self
    }

    /// Toast text used instead of the server's message on failure.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn on_success(mut self, f: impl Fn(&R, &P) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&HookError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn data(&self) -> Option<&R> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&HookError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: P) {
        self.payload = payload;
    }

    fn signature(&self, session: Option<&Session>) -> String {
        let who = session.map(|s| s.identity()).unwrap_or_default();
        let payload = serde_json::to_string(&self.payload).unwrap_or_default();
        format!("{}|{}|{}", self.event_name, who, payload)
    }

    /// Fires an automatic hook if its dependencies changed since the last
    /// sync. Returns whether a call was attempted.
    pub async fn sync(&mut self, session: Option<&Session>) -> bool {
        if self.manual {
            return false;
        }
        let signature = self.signature(session);
        if self.last_signature.as_deref() == Some(signature.as_str()) {
            return false;
        }
        self.last_signature = Some(signature);
        self.trigger(session, None).await;
        true
    }

    /// Runs the call now, optionally with a payload that replaces the
    /// configured one for this invocation only. Without a session this is a
    /// no-op.
    pub async fn trigger(&mut self, session: Option<&Session>, payload: Option<P>) {
        let Some(session) = session else {
            return;
        };

        self.is_loading = true;
        self.error = None;
        self.data = None;

        let payload = payload.unwrap_or_else(|| self.payload.clone());
        match self.exchange(session, &payload).await {
            Ok(data) => {
                if let Some(cb) = self.on_success.as_ref() {
                    cb(&data, &payload);
                }
                self.data = Some(data);
            }
            Err(e) => {
                if let Some(cb) = self.on_error.as_ref() {
                    cb(&e);
                }
                let description = self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| e.to_string());
                self.notifier.notify(Toast::error(description));
                self.error = Some(e);
            }
        }
        self.is_loading = false;
    }

    async fn exchange(&self, session: &Session, payload: &P) -> Result<R, HookError> {
        let request =
            WebhookClient::envelope(session, &self.event_name, serde_json::to_value(payload)?);
        let data = self.client.send(session, &request).await?;
        Ok(serde_json::from_value(data)?)
    }
}
