use chrono::Utc;
use serde_json::json;

use crate::mock::helpers::{err, new_id, ok, optional_str, optional_usize, page_slice, required_str};
use crate::mock::state::{
    AiReview, AiSuggestion, Assessment, AssessmentStatus, MockState, SuggestionStatus,
};
use crate::webhook::events;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_SUGGESTIONS: usize = 3;

fn not_found() -> WebhookResponse {
    err("NOT_FOUND", "assessment not found")
}

fn finalized() -> WebhookResponse {
    err("INVALID_STATE", "assessment is finalized")
}

fn handle_create_draft(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let title = match required_str(req, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(student) = state.student(&student_id) else {
        return err("NOT_FOUND", "student not found");
    };
    let rubric_id = optional_str(req, "rubricId");
    if let Some(rid) = rubric_id.as_deref() {
        if !state.rubrics.iter().any(|r| r.id == rid) {
            return err("NOT_FOUND", "rubric not found");
        }
    }

    let now = Utc::now();
    let assessment = Assessment {
        id: new_id("asm_draft"),
        title,
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        rubric_id,
        status: AssessmentStatus::Draft,
        current_text: String::new(),
        ai_review: None,
        teacher_notes: String::new(),
        final_feedback: String::new(),
        created_at: now,
        updated_at: now,
    };
    let assessment_id = assessment.id.clone();
    state.assessments.insert(0, assessment);
    ok(json!({ "assessmentId": assessment_id }))
}

fn handle_list(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let status = match optional_str(req, "status").as_deref() {
        None | Some("all") => None,
        Some(s) => match AssessmentStatus::parse(s) {
            Some(v) => Some(v),
            None => return err("BAD_PARAMS", format!("unknown status: {}", s)),
        },
    };
    let search = optional_str(req, "search").map(|s| s.to_lowercase());
    let page = optional_usize(req, "page").unwrap_or(1).max(1);
    let page_size = optional_usize(req, "pageSize")
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let matching: Vec<&Assessment> = state
        .assessments
        .iter()
        .filter(|a| status.map(|s| a.status == s).unwrap_or(true))
        .filter(|a| match search.as_deref() {
            Some(q) => {
                a.title.to_lowercase().contains(q) || a.student_name.to_lowercase().contains(q)
            }
            None => true,
        })
        .collect();
    let total = matching.len();
    let assessments: Vec<_> = page_slice(&matching, page, page_size)
        .into_iter()
        .map(|a| a.list_item())
        .collect();

    ok(json!({
        "assessments": assessments,
        "total": total,
        "page": page,
        "pageSize": page_size,
    }))
}

fn handle_get(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "assessmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.assessment(&id) {
        Some(a) => ok(json!({ "assessment": a.workspace() })),
        None => not_found(),
    }
}

fn handle_text_save(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "assessmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(text) = req.payload.get("text").and_then(|v| v.as_str()) else {
        return err("BAD_PARAMS", "missing text");
    };
    let Some(a) = state.assessment_mut(&id) else {
        return not_found();
    };
    if a.status == AssessmentStatus::Finalized {
        return finalized();
    }
    a.current_text = text.to_string();
    state.touch_assessment(&id);
    ok(json!({}))
}

fn handle_extract_text(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "assessmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let file_ref = match required_str(req, "fileRef") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(a) = state.assessment(&id) else {
        return not_found();
    };
    if a.status == AssessmentStatus::Finalized {
        return finalized();
    }
    ok(json!({
        "extractedText": format!(
            "Text extracted from {} for {}. The student's handwritten answers appear here.",
            file_ref, a.student_name
        ),
    }))
}

/// Deterministic stand-in for the AI reviewer: one suggestion per leading
/// sentence, grammar fixes for lowercase openings and development prompts
/// otherwise.
fn mock_review(text: &str) -> AiReview {
    let sentences: Vec<&str> = text
        .split_terminator(['.', '!', '?'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let suggestions: Vec<AiSuggestion> = sentences
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|sentence| {
            let starts_lower = sentence.chars().next().is_some_and(|c| c.is_lowercase());
            let (category, suggested, explanation) = if starts_lower {
                let mut chars = sentence.chars();
                let capitalized = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                };
                (
                    "Grammar",
                    capitalized,
                    "Sentences should begin with a capital letter.",
                )
            } else {
                (
                    "Development",
                    format!("{} Add a specific example to support this point", sentence),
                    "Supporting detail would strengthen this claim.",
                )
            };
            AiSuggestion {
                id: new_id("sug"),
                category: category.to_string(),
                original_text: sentence.to_string(),
                suggested_text: suggested,
                explanation: explanation.to_string(),
                status: SuggestionStatus::Pending,
            }
        })
        .collect();

    AiReview {
        summary: format!(
            "Reviewed {} sentence(s); {} suggestion(s) ready for teacher review.",
            sentences.len(),
            suggestions.len()
        ),
        suggestions,
    }
}

fn handle_run_ai_review(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "assessmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(a) = state.assessment_mut(&id) else {
        return not_found();
    };
    if a.status != AssessmentStatus::Draft || a.current_text.trim().is_empty() {
        return err(
            "INVALID_STATE",
            "AI review requires a draft with submitted text",
        );
    }
    a.ai_review = Some(mock_review(&a.current_text));
    a.status = AssessmentStatus::AiDraftReady;
    state.touch_assessment(&id);
    match state.assessment(&id) {
        Some(a) => ok(json!({ "assessment": a.workspace() })),
        None => not_found(),
    }
}

fn handle_apply_suggestion(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "assessmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let suggestion_id = match required_str(req, "suggestionId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let apply = match required_str(req, "action").as_deref() {
        Ok("apply") => true,
        Ok("dismiss") => false,
        Ok(other) => {
            return err(
                "BAD_PARAMS",
                format!("action must be apply or dismiss, got {}", other),
            )
        }
        Err(resp) => return resp.clone(),
    };

    let Some(a) = state.assessment_mut(&id) else {
        return not_found();
    };
    if a.status == AssessmentStatus::Finalized {
        return finalized();
    }
    let Some(review) = a.ai_review.as_mut() else {
        return err("NOT_FOUND", "suggestion not found");
    };
    let Some(suggestion) = review.suggestions.iter_mut().find(|s| s.id == suggestion_id) else {
        return err("NOT_FOUND", "suggestion not found");
    };
    if suggestion.status != SuggestionStatus::Pending {
        return err("INVALID_STATE", "suggestion already resolved");
    }

    if apply {
        a.current_text = a
            .current_text
            .replacen(&suggestion.original_text, &suggestion.suggested_text, 1);
        suggestion.status = SuggestionStatus::Applied;
    } else {
        suggestion.status = SuggestionStatus::Dismissed;
    }
    let new_text = a.current_text.clone();
    state.touch_assessment(&id);
    ok(json!({ "newText": new_text }))
}

fn handle_save_feedback(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "assessmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(a) = state.assessment_mut(&id) else {
        return not_found();
    };
    if a.status == AssessmentStatus::Finalized {
        return finalized();
    }
    if let Some(notes) = req.payload.get("teacherNotes").and_then(|v| v.as_str()) {
        a.teacher_notes = notes.to_string();
    }
    if let Some(feedback) = req.payload.get("finalFeedback").and_then(|v| v.as_str()) {
        a.final_feedback = feedback.to_string();
    }
    if a.status == AssessmentStatus::AiDraftReady {
        a.status = AssessmentStatus::NeedsReview;
    }
    state.touch_assessment(&id);
    ok(json!({}))
}

fn handle_finalize(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "assessmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(a) = state.assessment_mut(&id) else {
        return not_found();
    };
    if !a.status.awaits_review() {
        return err(
            "INVALID_STATE",
            format!("cannot finalize an assessment in status {}", a.status.label()),
        );
    }
    a.status = AssessmentStatus::Finalized;
    state.touch_assessment(&id);
    match state.assessment(&id) {
        Some(a) => ok(json!({ "assessment": a.workspace() })),
        None => not_found(),
    }
}

pub fn try_handle(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    match req.event_name.as_str() {
        events::NEW_ASSESSMENT_START => Some(ok(json!({}))),
        events::ASSESSMENT_CREATE_DRAFT => Some(handle_create_draft(state, req)),
        events::ASSESSMENT_LIST => Some(handle_list(state, req)),
        events::ASSESSMENT_GET => Some(handle_get(state, req)),
        events::ASSESSMENT_TEXT_SAVE => Some(handle_text_save(state, req)),
        events::ASSESSMENT_EXTRACT_TEXT => Some(handle_extract_text(state, req)),
        events::ASSESSMENT_RUN_AI_REVIEW => Some(handle_run_ai_review(state, req)),
        events::ASSESSMENT_APPLY_SUGGESTION => Some(handle_apply_suggestion(state, req)),
        events::ASSESSMENT_SAVE_TEACHER_FEEDBACK => Some(handle_save_feedback(state, req)),
        events::ASSESSMENT_FINALIZE => Some(handle_finalize(state, req)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_capitalizes_lowercase_openings() {
        let review = mock_review("the cell is small. Plants need light.");
        assert_eq!(review.suggestions.len(), 2);
        assert_eq!(review.suggestions[0].category, "Grammar");
        assert_eq!(review.suggestions[0].suggested_text, "The cell is small");
        assert_eq!(review.suggestions[1].category, "Development");
        assert!(review.summary.contains("2 sentence"));
    }

    #[test]
    fn review_caps_suggestion_count() {
        let review = mock_review("a. b. c. d. e.");
        assert_eq!(review.suggestions.len(), MAX_SUGGESTIONS);
    }
}
