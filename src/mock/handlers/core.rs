use serde_json::json;

use crate::mock::helpers::ok;
use crate::mock::state::MockState;
use crate::webhook::events;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

fn handle_health_check(state: &mut MockState) -> WebhookResponse {
    ok(json!({
        "authConfigured": true,
        "webhookConfigured": true,
        "databaseConnected": true,
        "lastSuccessfulCall": state.last_successful_call.map(|t| t.to_rfc3339()),
    }))
}

pub fn try_handle(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    match req.event_name.as_str() {
        events::HEALTH_CHECK => Some(handle_health_check(state)),
        _ => None,
    }
}
