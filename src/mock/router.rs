use chrono::Utc;

use super::handlers;
use super::state::MockState;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

/// Looks up the handler for `req.event_name`; `None` means no mock exists.
pub fn dispatch(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    let resp = try_families(state, req)?;
    if resp.success {
        state.last_successful_call = Some(Utc::now());
    }
    Some(resp)
}

fn try_families(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    if let Some(resp) = handlers::core::try_handle(state, req) {
        return Some(resp);
    }
    if let Some(resp) = handlers::dashboard::try_handle(state, req) {
        return Some(resp);
    }
    if let Some(resp) = handlers::students::try_handle(state, req) {
        return Some(resp);
    }
    if let Some(resp) = handlers::assessments::try_handle(state, req) {
        return Some(resp);
    }
    if let Some(resp) = handlers::reports::try_handle(state, req) {
        return Some(resp);
    }
    if let Some(resp) = handlers::parent::try_handle(state, req) {
        return Some(resp);
    }
    if let Some(resp) = handlers::rubrics::try_handle(state, req) {
        return Some(resp);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::events;
    use crate::webhook::types::{Actor, UserRole};
    use serde_json::json;

    fn req(event: &str, payload: serde_json::Value) -> WebhookRequest {
        WebhookRequest {
            event_name: event.to_string(),
            request_id: "r".to_string(),
            timestamp: String::new(),
            actor: Actor {
                role: UserRole::Teacher,
                user_id: "teacher-01".to_string(),
            },
            payload,
        }
    }

    #[test]
    fn unknown_event_is_none() {
        let mut state = MockState::default();
        assert!(dispatch(&mut state, &req("NOT_A_THING", json!({}))).is_none());
        assert!(state.last_successful_call.is_none());
    }

    #[test]
    fn every_known_event_has_a_handler() {
        let mut state = MockState::default();
        for name in events::ALL {
            assert!(
                dispatch(&mut state, &req(name, json!({}))).is_some(),
                "no handler for {}",
                name
            );
        }
    }

    #[test]
    fn success_stamps_last_call() {
        let mut state = MockState::default();
        let resp = dispatch(&mut state, &req(events::STUDENT_LIST, json!({}))).expect("handled");
        assert!(resp.success);
        assert!(state.last_successful_call.is_some());
    }
}
