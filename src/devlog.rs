use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

pub const MAX_LOG_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: String,
    pub event_name: String,
    pub request: serde_json::Value,
    pub response: serde_json::Value,
    pub status: LogStatus,
    pub correlation_id: String,
}

/// Newest-first ring of recent request/response pairs for local debugging.
///
/// A disabled log ignores writes and reads back empty. Nothing here survives
/// a restart.
#[derive(Debug, Clone, Default)]
pub struct DevLog {
    enabled: bool,
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl DevLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(
        &self,
        event_name: &str,
        request: serde_json::Value,
        response: serde_json::Value,
    ) {
        if !self.enabled {
            return;
        }
        let status = if response.get("success").and_then(|v| v.as_bool()) == Some(true) {
            LogStatus::Success
        } else {
            LogStatus::Error
        };
        let correlation_id = response
            .get("correlationId")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event_name: event_name.to_string(),
            request,
            response,
            status,
            correlation_id,
        };

        let mut entries = self.entries.lock();
        entries.push_front(entry);
        entries.truncate(MAX_LOG_ENTRIES);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        if !self.enabled {
            return Vec::new();
        }
        self.entries.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        if !self.enabled {
            return;
        }
        self.entries.lock().clear();
    }
}
