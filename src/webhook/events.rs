//! Event names understood by the upstream workflows and the mock dispatcher.
//!
//! The gateway itself forwards any event name; these exist so callers and
//! the mock handlers agree on spelling.

pub const HEALTH_CHECK: &str = "HEALTH_CHECK";

pub const GET_DASHBOARD_SUMMARY: &str = "GET_DASHBOARD_SUMMARY";
pub const GET_REVIEW_QUEUE: &str = "GET_REVIEW_QUEUE";
pub const GET_DRAFTS: &str = "GET_DRAFTS";
pub const REVIEW_OPEN: &str = "REVIEW_OPEN";
pub const DRAFT_OPEN: &str = "DRAFT_OPEN";

pub const STUDENT_LIST: &str = "STUDENT_LIST";
pub const STUDENT_CREATE: &str = "STUDENT_CREATE";
pub const STUDENT_GET: &str = "STUDENT_GET";
pub const STUDENT_ASSESSMENTS_LIST: &str = "STUDENT_ASSESSMENTS_LIST";
pub const STUDENT_REPORTS_LIST: &str = "STUDENT_REPORTS_LIST";

pub const NEW_ASSESSMENT_START: &str = "NEW_ASSESSMENT_START";
pub const ASSESSMENT_CREATE_DRAFT: &str = "ASSESSMENT_CREATE_DRAFT";
pub const ASSESSMENT_LIST: &str = "ASSESSMENT_LIST";
pub const ASSESSMENT_GET: &str = "ASSESSMENT_GET";
pub const ASSESSMENT_TEXT_SAVE: &str = "ASSESSMENT_TEXT_SAVE";
pub const ASSESSMENT_EXTRACT_TEXT: &str = "ASSESSMENT_EXTRACT_TEXT";
pub const ASSESSMENT_RUN_AI_REVIEW: &str = "ASSESSMENT_RUN_AI_REVIEW";
pub const ASSESSMENT_APPLY_SUGGESTION: &str = "ASSESSMENT_APPLY_SUGGESTION";
pub const ASSESSMENT_SAVE_TEACHER_FEEDBACK: &str = "ASSESSMENT_SAVE_TEACHER_FEEDBACK";
pub const ASSESSMENT_FINALIZE: &str = "ASSESSMENT_FINALIZE";

pub const REPORTS_LIST: &str = "REPORTS_LIST";
pub const REPORT_GENERATE: &str = "REPORT_GENERATE";
pub const REPORT_GET: &str = "REPORT_GET";
pub const REPORT_SEND: &str = "REPORT_SEND";
pub const REPORT_DOWNLOAD_PDF: &str = "REPORT_DOWNLOAD_PDF";

pub const PARENT_CHILDREN_LIST: &str = "PARENT_CHILDREN_LIST";
pub const PARENT_REPORTS_LIST: &str = "PARENT_REPORTS_LIST";
pub const PARENT_REPORT_GET: &str = "PARENT_REPORT_GET";

pub const RUBRIC_LIST: &str = "RUBRIC_LIST";

pub const ALL: &[&str] = &[
    HEALTH_CHECK,
    GET_DASHBOARD_SUMMARY,
    GET_REVIEW_QUEUE,
    GET_DRAFTS,
    REVIEW_OPEN,
    DRAFT_OPEN,
    STUDENT_LIST,
    STUDENT_CREATE,
    STUDENT_GET,
    STUDENT_ASSESSMENTS_LIST,
    STUDENT_REPORTS_LIST,
    NEW_ASSESSMENT_START,
    ASSESSMENT_CREATE_DRAFT,
    ASSESSMENT_LIST,
    ASSESSMENT_GET,
    ASSESSMENT_TEXT_SAVE,
    ASSESSMENT_EXTRACT_TEXT,
    ASSESSMENT_RUN_AI_REVIEW,
    ASSESSMENT_APPLY_SUGGESTION,
    ASSESSMENT_SAVE_TEACHER_FEEDBACK,
    ASSESSMENT_FINALIZE,
    REPORTS_LIST,
    REPORT_GENERATE,
    REPORT_GET,
    REPORT_SEND,
    REPORT_DOWNLOAD_PDF,
    PARENT_CHILDREN_LIST,
    PARENT_REPORTS_LIST,
    PARENT_REPORT_GET,
    RUBRIC_LIST,
];
