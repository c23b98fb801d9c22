use chrono::{Duration, Utc};
use serde_json::json;

use crate::mock::helpers::ok;
use crate::mock::state::{AssessmentStatus, MockState};
use crate::webhook::events;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

fn handle_summary(state: &MockState) -> WebhookResponse {
    let week_ago = Utc::now() - Duration::days(7);
    let pending_review = state
        .assessments
        .iter()
        .filter(|a| a.status.awaits_review())
        .count();
    let drafts = state
        .assessments
        .iter()
        .filter(|a| a.status == AssessmentStatus::Draft)
        .count();
    let finalized_this_week = state
        .assessments
        .iter()
        .filter(|a| a.status == AssessmentStatus::Finalized && a.updated_at >= week_ago)
        .count();

    ok(json!({
        "kpis": {
            "pendingReview": pending_review,
            "drafts": drafts,
            "finalizedThisWeek": finalized_this_week,
        }
    }))
}

fn handle_review_queue(state: &MockState) -> WebhookResponse {
    let items: Vec<_> = state
        .assessments
        .iter()
        .filter(|a| a.status.awaits_review())
        .map(|a| {
            json!({
                "studentName": a.student_name,
                "studentId": a.student_id,
                "assessmentName": a.title,
                "assessmentId": a.id,
                "status": a.status,
                "updatedAt": a.updated_at.to_rfc3339(),
            })
        })
        .collect();
    ok(json!({ "items": items }))
}

fn handle_drafts(state: &MockState) -> WebhookResponse {
    let items: Vec<_> = state
        .assessments
        .iter()
        .filter(|a| a.status == AssessmentStatus::Draft)
        .map(|a| {
            json!({
                "assessmentId": a.id,
                "assessmentName": a.title,
                "studentName": a.student_name,
                "updatedAt": a.updated_at.to_rfc3339(),
            })
        })
        .collect();
    ok(json!({ "items": items }))
}

pub fn try_handle(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    match req.event_name.as_str() {
        events::GET_DASHBOARD_SUMMARY => Some(handle_summary(state)),
        events::GET_REVIEW_QUEUE => Some(handle_review_queue(state)),
        events::GET_DRAFTS => Some(handle_drafts(state)),
        // Navigation acknowledgements; the upstream records them, the mock has nothing to do.
        events::REVIEW_OPEN | events::DRAFT_OPEN => Some(ok(json!({}))),
        _ => None,
    }
}
