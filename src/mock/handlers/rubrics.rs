use serde_json::json;

use crate::mock::helpers::ok;
use crate::mock::state::MockState;
use crate::webhook::events;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

pub fn try_handle(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    match req.event_name.as_str() {
        events::RUBRIC_LIST => Some(ok(json!({ "rubrics": state.rubrics }))),
        _ => None,
    }
}
