use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};

use crate::mock::helpers::{err, new_id, ok, optional_usize, page_slice, required_str};
use crate::mock::state::{AssessmentStatus, MockState, Report, ReportLine, ReportStatus};
use crate::webhook::events;
use crate::webhook::types::{WebhookRequest, WebhookResponse};

const DEFAULT_PAGE_SIZE: usize = 20;

fn not_found() -> WebhookResponse {
    err("NOT_FOUND", "report not found")
}

/// Field of one of the nested option objects (`period`, `include`,
/// `delivery`) in a `REPORT_GENERATE` payload.
fn option<'a>(req: &'a WebhookRequest, section: &str, key: &str) -> Option<&'a Value> {
    req.payload.get(section).and_then(|s| s.get(key))
}

fn option_flag(req: &WebhookRequest, section: &str, key: &str, default: bool) -> bool {
    option(req, section, key)
        .and_then(|v| v.as_bool())
        .unwrap_or(default)
}

fn period_field(req: &WebhookRequest, key: &str) -> Option<String> {
    option(req, "period", key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts `YYYY-MM-DD` or anything that starts with it (RFC 3339 timestamps).
fn parse_date(raw: &str, key: &str) -> Result<NaiveDate, WebhookResponse> {
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| err("BAD_PARAMS", format!("{} must be a date (YYYY-MM-DD)", key)))
}

/// A preset wins; without one, both custom dates must be present. An empty
/// period means the last 30 days.
fn resolve_period(req: &WebhookRequest) -> Result<(NaiveDate, NaiveDate), WebhookResponse> {
    let today = Utc::now().date_naive();
    let preset = period_field(req, "preset");
    let start = period_field(req, "startDate");
    let end = period_field(req, "endDate");
    match (preset.as_deref(), start, end) {
        (Some("last_30"), _, _) => Ok((today - Duration::days(30), today)),
        (Some("last_90"), _, _) => Ok((today - Duration::days(90), today)),
        (None, None, None) => Ok((today - Duration::days(30), today)),
        (None | Some("custom"), Some(start), Some(end)) => {
            let start = parse_date(&start, "startDate")?;
            let end = parse_date(&end, "endDate")?;
            if end < start {
                return Err(err("BAD_PARAMS", "endDate must not be before startDate"));
            }
            Ok((start, end))
        }
        (None | Some("custom"), _, _) => Err(err(
            "BAD_PARAMS",
            "a custom period needs both startDate and endDate",
        )),
        (Some(other), _, _) => Err(err("BAD_PARAMS", format!("unknown period preset: {}", other))),
    }
}

fn handle_list(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let page = optional_usize(req, "page").unwrap_or(1);
    let page_size = optional_usize(req, "pageSize")
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let reports: Vec<_> = page_slice(&state.reports, page, page_size)
        .iter()
        .map(|r| r.list_item())
        .collect();
    ok(json!({ "reports": reports, "total": state.reports.len() }))
}

fn handle_generate(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(student) = state.student(&student_id) else {
        return err("NOT_FOUND", "student not found");
    };
    let (period_start, period_end) = match resolve_period(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut delivery = Vec::new();
    for (channel, default) in [("portal", true), ("email", false), ("pdf", false)] {
        if option_flag(req, "delivery", channel, default) {
            delivery.push(channel.to_string());
        }
    }
    if delivery.is_empty() {
        return err("BAD_PARAMS", "select at least one delivery method");
    }

    let include_summary = option_flag(req, "include", "summary", true);
    let include_breakdown = option_flag(req, "include", "rubricBreakdown", true);
    let include_notes = option_flag(req, "include", "teacherNotes", false);

    let finalized: Vec<_> = state
        .assessments
        .iter()
        .filter(|a| a.student_id == student.id && a.status == AssessmentStatus::Finalized)
        .filter(|a| {
            let d = a.updated_at.date_naive();
            d >= period_start && d <= period_end
        })
        .collect();

    let summary = include_summary.then(|| {
        format!(
            "{} finalized {} assessment(s) between {} and {}.",
            student.name,
            finalized.len(),
            period_start,
            period_end
        )
    });
    let lines = if include_breakdown {
        finalized
            .iter()
            .map(|a| ReportLine {
                assessment_id: a.id.clone(),
                title: a.title.clone(),
                final_feedback: a.final_feedback.clone(),
                teacher_notes: include_notes.then(|| a.teacher_notes.clone()),
            })
            .collect()
    } else {
        Vec::new()
    };

    let report = Report {
        id: new_id("rep"),
        title: format!("Progress Report: {}", student.name),
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        period_start,
        period_end,
        status: ReportStatus::Draft,
        summary,
        lines,
        delivery,
        created_at: Utc::now(),
        sent_at: None,
    };
    let report_id = report.id.clone();
    state.reports.insert(0, report);
    ok(json!({ "reportId": report_id }))
}

fn handle_get(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "reportId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.report(&id) {
        Some(r) => ok(json!({ "report": r })),
        None => not_found(),
    }
}

fn handle_send(state: &mut MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "reportId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(report) = state.report_mut(&id) else {
        return not_found();
    };
    if report.status == ReportStatus::Sent {
        return err("INVALID_STATE", "report already sent");
    }
    report.status = ReportStatus::Sent;
    report.sent_at = Some(Utc::now());
    ok(json!({}))
}

fn render_document(report: &Report) -> String {
    let mut out = format!(
        "{}\nPeriod: {} to {}\n\n",
        report.title, report.period_start, report.period_end
    );
    if let Some(summary) = report.summary.as_deref() {
        out.push_str(summary);
        out.push_str("\n\n");
    }
    for line in &report.lines {
        out.push_str(&format!("- {}: {}\n", line.title, line.final_feedback));
        if let Some(notes) = line.teacher_notes.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!("  Teacher notes: {}\n", notes));
        }
    }
    out
}

fn handle_download_pdf(state: &MockState, req: &WebhookRequest) -> WebhookResponse {
    let id = match required_str(req, "reportId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(report) = state.report(&id) else {
        return not_found();
    };
    ok(json!({
        "fileName": format!("{}.pdf", report.id),
        "fileContent": STANDARD.encode(render_document(report)),
    }))
}

pub fn try_handle(state: &mut MockState, req: &WebhookRequest) -> Option<WebhookResponse> {
    match req.event_name.as_str() {
        events::REPORTS_LIST => Some(handle_list(state, req)),
        events::REPORT_GENERATE => Some(handle_generate(state, req)),
        events::REPORT_GET => Some(handle_get(state, req)),
        events::REPORT_SEND => Some(handle_send(state, req)),
        events::REPORT_DOWNLOAD_PDF => Some(handle_download_pdf(state, req)),
        _ => None,
    }
}
