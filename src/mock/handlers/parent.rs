use serde_json::json;

use crate::mock::helpers::{err, ok, required_str};
use crate::mock::state::{MockState, ReportStatus};
use crate::webhook::events;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

// Parents only ever see children linked to their user id and reports that
// were sent; anything else reads as not found.

fn handle_children(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let parent_id = &req.actor.user_id;
    let children: Vec<_> = state
        .guardians
        .iter()
        .filter(|g| &g.parent_user_id == parent_id)
        .filter_map(|g| state.student(&g.student_id))
        .map(|s| {
            let latest = state
                .reports
                .iter()
                .find(|r| r.student_id == s.id && r.status == ReportStatus::Sent);
            json!({
                "id": s.id,
                "name": s.name,
                "class": s.class_name,
                "avatarUrl": s.avatar_url,
                "latestReport": latest.map(|r| json!({
                    "id": r.id,
                    "title": r.title,
                    "sentAt": r.sent_at.map(|t| t.to_rfc3339()),
                })),
            })
        })
        .collect();
    ok(json!({ "children": children }))
}

fn handle_reports(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let child_id = match required_str(req, "childId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if !state.is_guardian_of(&req.actor.user_id, &child_id) {
        return err("NOT_FOUND", "child not found");
    }
    let reports: Vec<_> = state
        .reports
        .iter()
        .filter(|r| r.student_id == child_id && r.status == ReportStatus::Sent)
        .map(|r| r.list_item())
        .collect();
    ok(json!({ "reports": reports }))
}

fn handle_report_get(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let report_id = match required_str(req, "reportId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.report(&report_id) {
        Some(r)
            if r.status == ReportStatus::Sent
                && state.is_guardian_of(&req.actor.user_id, &r.student_id) =>
        {
            ok(json!({ "report": r }))
        }
        _ => err("NOT_FOUND", "report not found"),
    }
}

pub fn try_handle(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    match req.event_name.as_str() {
        events::PARENT_CHILDREN_LIST => Some(handle_children(state, req)),
        events::PARENT_REPORTS_LIST => Some(handle_reports(state, req)),
        events::PARENT_REPORT_GET => Some(handle_report_get(state, req)),
        _ => None,
    }
}
