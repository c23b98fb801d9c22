use serde_json::Value;
use uuid::Uuid;

use crate::webhook::types::{WebhookRequest, WebhookResponse};

pub fn ok(data: Value) -> WebhookResponse {
    WebhookResponse::success(data, format!("mock_{}", Uuid::new_v4()))
}

pub fn err(code: &str, message: impl Into<String>) -> WebhookResponse {
    WebhookResponse::failure(code, message, format!("mock_{}", Uuid::new_v4()))
}

pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}

pub fn optional_str(req: &WebhookRequest, key: &str) -> Option<String> {
    req.payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Trimmed, non-empty string field of the payload, or a `BAD_PARAMS` envelope.
pub fn required_str(req: &WebhookRequest, key: &str) -> Result<String, WebhookResponse> {
    optional_str(req, key).ok_or_else(|| err("BAD_PARAMS", format!("missing {}", key)))
}

pub fn optional_usize(req: &WebhookRequest, key: &str) -> Option<usize> {
    req.payload
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
}

/// 1-based page slice; page 0 is treated as page 1.
pub fn page_slice<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size);
    items.iter().skip(start).take(page_size).cloned().collect()
}
