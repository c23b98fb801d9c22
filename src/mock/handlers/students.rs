use serde_json::json;

use crate::mock::helpers::{err, new_id, ok, optional_str, optional_usize, page_slice, required_str};
use crate::mock::state::{MockState, Student};
use crate::webhook::events;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

const RECENT_ASSESSMENTS: usize = 5;

fn list_item(state: &MockState, student: &Student) -> serde_json::Value {
    // Assessments are newest-first, so the first match is the latest.
    let latest = state
        .assessments
        .iter()
        .find(|a| a.student_id == student.id);
    let mut item = json!(student);
    item["lastAssessmentDate"] = json!(latest.map(|a| a.updated_at.to_rfc3339()));
    item["status"] = json!(latest.map(|a| a.status.label()).unwrap_or("No Assessments"));
    item
}

fn handle_list(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let total = state.students.len();
    let visible = match optional_usize(req, "limit") {
        Some(limit) if limit > 0 => {
            let page = optional_usize(req, "page").unwrap_or(1);
            page_slice(&state.students, page, limit)
        }
        _ => state.students.clone(),
    };
    let students: Vec<_> = visible.iter().map(|s| list_item(state, s)).collect();
    ok(json!({ "students": students, "total": total }))
}

fn handle_create(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let full_name = match required_str(req, "fullName") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student_id_number = optional_str(req, "studentIdNumber");
    if let Some(number) = student_id_number.as_deref() {
        if state
            .students
            .iter()
            .any(|s| s.student_id_number.as_deref() == Some(number))
        {
            return err(
                "BAD_PARAMS",
                format!("studentIdNumber already in use: {}", number),
            );
        }
    }

    let student = Student {
        id: new_id("stu"),
        name: full_name,
        class_name,
        student_id_number,
        parent_email: optional_str(req, "parentEmail"),
        avatar_url: format!(
            "https://picsum.photos/seed/new{}/100/100",
            state.students.len() + 1
        ),
    };
    let student_id = student.id.clone();
    state.students.insert(0, student);
    ok(json!({ "studentId": student_id }))
}

fn handle_get(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(student) = state.student(&student_id) else {
        return err("NOT_FOUND", "student not found");
    };

    let recent: Vec<_> = state
        .assessments
        .iter()
        .filter(|a| a.student_id == student.id)
        .take(RECENT_ASSESSMENTS)
        .map(|a| {
            json!({
                "id": a.id,
                "name": a.title,
                "status": a.status,
                "date": a.updated_at.date_naive().to_string(),
            })
        })
        .collect();

    let mut profile = list_item(state, student);
    profile["details"] = json!({ "gradeLevel": student.class_name });
    profile["recentAssessments"] = json!(recent);
    ok(json!({ "student": profile }))
}

fn handle_assessments(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if state.student(&student_id).is_none() {
        return err("NOT_FOUND", "student not found");
    }
    let assessments: Vec<_> = state
        .assessments
        .iter()
        .filter(|a| a.student_id == student_id)
        .map(|a| {
            json!({
                "id": a.id,
                "title": a.title,
                "status": a.status.label(),
                "updatedAt": a.updated_at.to_rfc3339(),
            })
        })
        .collect();
    ok(json!({ "assessments": assessments }))
}

fn handle_reports(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if state.student(&student_id).is_none() {
        return err("NOT_FOUND", "student not found");
    }
    let reports: Vec<_> = state
        .reports
        .iter()
        .filter(|r| r.student_id == student_id)
        .map(|r| {
            let mut item = r.list_item();
            item["status"] = json!(r.status.label());
            item
        })
        .collect();
    ok(json!({ "reports": reports }))
}

pub fn try_handle(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    match req.event_name.as_str() {
        events::STUDENT_LIST => Some(handle_list(state, req)),
        events::STUDENT_CREATE => Some(handle_create(state, req)),
        events::STUDENT_GET => Some(handle_get(state, req)),
        events::STUDENT_ASSESSMENTS_LIST => Some(handle_assessments(state, req)),
        events::STUDENT_REPORTS_LIST => Some(handle_reports(state, req)),
        _ => None,
    }
}
