use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Teacher,
    Parent,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::Parent => "parent",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub role: UserRole,
    pub user_id: String,
}

/// Envelope posted by the client to `/api/webhook`.
///
/// `request_id` and `timestamp` are informational; nothing downstream keys
/// idempotence or ordering on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub event_name: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub timestamp: String,
    pub actor: Actor,
    #[serde(default = "empty_payload")]
    pub payload: serde_json::Value,
}

fn empty_payload() -> serde_json::Value {
    json!({})
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default)]
    pub correlation_id: String,
}

impl WebhookResponse {
    pub fn success(data: serde_json::Value, correlation_id: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            correlation_id: correlation_id.into(),
        }
    }

    pub fn failure(
        code: &str,
        message: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                message: message.into(),
                code: Some(code.to_string()),
            }),
            correlation_id: correlation_id.into(),
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.code.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_payload_defaults_to_empty_object() {
        let req: WebhookRequest = serde_json::from_value(json!({
            "eventName": "STUDENT_LIST",
            "actor": { "role": "teacher", "userId": "teacher-01" }
        }))
        .expect("parse envelope");
        assert_eq!(req.payload, json!({}));
        assert_eq!(req.actor.role, UserRole::Teacher);
        assert!(req.request_id.is_empty());
    }

    #[test]
    fn failure_envelope_omits_data() {
        let resp = WebhookResponse::failure("UNAUTHORIZED", "Unauthorized", "local-auth-error");
        let v = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(
            v,
            json!({
                "success": false,
                "error": { "message": "Unauthorized", "code": "UNAUTHORIZED" },
                "correlationId": "local-auth-error"
            })
        );
    }
}
