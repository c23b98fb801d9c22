use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    AiDraftReady,
    NeedsReview,
    Finalized,
}

impl AssessmentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(AssessmentStatus::Draft),
            "ai_draft_ready" => Some(AssessmentStatus::AiDraftReady),
            "needs_review" => Some(AssessmentStatus::NeedsReview),
            "finalized" => Some(AssessmentStatus::Finalized),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "Draft",
            AssessmentStatus::AiDraftReady => "AI Draft Ready",
            AssessmentStatus::NeedsReview => "Needs Review",
            AssessmentStatus::Finalized => "Finalized",
        }
    }

    pub fn awaits_review(self) -> bool {
        matches!(
            self,
            AssessmentStatus::AiDraftReady | AssessmentStatus::NeedsReview
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Applied,
    Dismissed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    pub id: String,
    pub category: String,
    pub original_text: String,
    pub suggested_text: String,
    pub explanation: String,
    pub status: SuggestionStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiReview {
    pub summary: String,
    pub suggestions: Vec<AiSuggestion>,
}

#[derive(Debug, Clone)]
pub struct Assessment {
    pub id: String,
    pub title: String,
    pub student_id: String,
    pub student_name: String,
    pub rubric_id: Option<String>,
    pub status: AssessmentStatus,
    pub current_text: String,
    pub ai_review: Option<AiReview>,
    pub teacher_notes: String,
    pub final_feedback: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn list_item(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "studentId": self.student_id,
            "studentName": self.student_name,
            "status": self.status,
            "updatedAt": self.updated_at.to_rfc3339(),
        })
    }

    pub fn workspace(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "student": { "id": self.student_id, "name": self.student_name },
            "rubricId": self.rubric_id,
            "status": self.status,
            "currentText": self.current_text,
            "aiReview": self.ai_review,
            "teacherNotes": self.teacher_notes,
            "finalFeedback": self.final_feedback,
            "createdAt": self.created_at.to_rfc3339(),
            "updatedAt": self.updated_at.to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportStatus {
    Draft,
    Sent,
}

impl ReportStatus {
    /// Badge text on a student's reports tab; a sent report is final.
    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Draft => "Draft",
            ReportStatus::Sent => "Final",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub assessment_id: String,
    pub title: String,
    pub final_feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub student_id: String,
    pub student_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: ReportStatus,
    pub summary: Option<String>,
    pub lines: Vec<ReportLine>,
    pub delivery: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn list_item(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "studentId": self.student_id,
            "studentName": self.student_name,
            "period": format!("{} to {}", self.period_start, self.period_end),
            "status": self.status,
            "createdAt": self.created_at.to_rfc3339(),
            "sentAt": self.sent_at.map(|t| t.to_rfc3339()),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: String,
    pub name: String,
    pub description: String,
    pub max_score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rubric {
    pub id: String,
    pub name: String,
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone)]
pub struct GuardianLink {
    pub parent_user_id: String,
    pub student_id: String,
}

/// Process-local fixture data behind the mock dispatcher.
///
/// Every list is newest-first: creates insert at index 0 and assessment
/// updates move the assessment back to the head.
#[derive(Debug, Clone)]
pub struct MockState {
    pub students: Vec<Student>,
    pub assessments: Vec<Assessment>,
    pub reports: Vec<Report>,
    pub rubrics: Vec<Rubric>,
    pub guardians: Vec<GuardianLink>,
    pub last_successful_call: Option<DateTime<Utc>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::seeded(Utc::now())
    }
}

impl MockState {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let students: Vec<Student> = [
            ("stu_01", "Amelia Johnson"),
            ("stu_02", "Benjamin Carter"),
            ("stu_03", "Charlotte Davis"),
            ("stu_04", "Daniel Evans"),
            ("stu_05", "Emma Foster"),
            ("stu_06", "Finn Harris"),
            ("stu_07", "Grace Hill"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (id, name))| Student {
            id: id.to_string(),
            name: name.to_string(),
            class_name: "Grade 5".to_string(),
            student_id_number: None,
            parent_email: None,
            avatar_url: format!("https://picsum.photos/seed/student{}/100/100", i + 1),
        })
        .collect();

        let hours = |h: i64| now - Duration::hours(h);
        let mk = |id: &str,
                  title: &str,
                  student: (&str, &str),
                  status: AssessmentStatus,
                  text: &str,
                  updated: DateTime<Utc>| Assessment {
            id: id.to_string(),
            title: title.to_string(),
            student_id: student.0.to_string(),
            student_name: student.1.to_string(),
            rubric_id: Some("rub_01".to_string()),
            status,
            current_text: text.to_string(),
            ai_review: None,
            teacher_notes: String::new(),
            final_feedback: String::new(),
            created_at: updated - Duration::days(3),
            updated_at: updated,
        };

        let amelia = ("stu_01", "Amelia Johnson");
        let mut assessments = vec![
            mk(
                "asm_01",
                "Unit 3: Fractions",
                amelia,
                AssessmentStatus::NeedsReview,
                "1/2 x 3/4 = 3/8. 2/3 + 1/6 = 5/6. I think fractions is easy when you draw them.",
                hours(2),
            ),
            mk(
                "asm_02",
                "History Mid-Term Essay",
                ("stu_02", "Benjamin Carter"),
                AssessmentStatus::AiDraftReady,
                "The industrial revolution changed how people lived and worked in cities.",
                hours(24),
            ),
            mk(
                "asm_03",
                "Science Project Proposal",
                ("stu_03", "Charlotte Davis"),
                AssessmentStatus::NeedsReview,
                "My project will test which soil helps bean plants grow fastest.",
                hours(48),
            ),
            mk(
                "asm_draft_01",
                "Creative Writing Assignment",
                ("stu_04", "Daniel Evans"),
                AssessmentStatus::Draft,
                "",
                hours(72),
            ),
            mk(
                "asm_draft_02",
                "Algebra II Quiz",
                ("stu_05", "Emma Foster"),
                AssessmentStatus::Draft,
                "",
                hours(120),
            ),
            mk(
                "asm_11",
                "Book Report: The Giver",
                amelia,
                AssessmentStatus::Finalized,
                "The Giver is about a boy named Jonas who receives memories of the past.",
                hours(96),
            ),
            mk(
                "asm_12",
                "Spelling Test #5",
                amelia,
                AssessmentStatus::Finalized,
                "necessary, separate, definitely, rhythm, occurrence",
                hours(240),
            ),
        ];
        for a in assessments.iter_mut() {
            if a.status == AssessmentStatus::Finalized {
                a.final_feedback = format!("Well done on {}.", a.title);
            }
        }

        let reports = vec![
            Report {
                id: "rep_01".to_string(),
                title: "Progress Report: Amelia Johnson".to_string(),
                student_id: "stu_01".to_string(),
                student_name: "Amelia Johnson".to_string(),
                period_start: (now - Duration::days(30)).date_naive(),
                period_end: now.date_naive(),
                status: ReportStatus::Sent,
                summary: Some("Amelia finalized 2 assessments this period.".to_string()),
                lines: assessments
                    .iter()
                    .filter(|a| a.student_id == "stu_01" && a.status == AssessmentStatus::Finalized)
                    .map(|a| ReportLine {
                        assessment_id: a.id.clone(),
                        title: a.title.clone(),
                        final_feedback: a.final_feedback.clone(),
                        teacher_notes: None,
                    })
                    .collect(),
                delivery: vec!["portal".to_string()],
                created_at: hours(30),
                sent_at: Some(hours(28)),
            },
            Report {
                id: "rep_02".to_string(),
                title: "Progress Report: Benjamin Carter".to_string(),
                student_id: "stu_02".to_string(),
                student_name: "Benjamin Carter".to_string(),
                period_start: (now - Duration::days(30)).date_naive(),
                period_end: now.date_naive(),
                status: ReportStatus::Draft,
                summary: None,
                lines: Vec::new(),
                delivery: vec!["portal".to_string()],
                created_at: hours(6),
                sent_at: None,
            },
        ];

        let rubrics = vec![
            Rubric {
                id: "rub_01".to_string(),
                name: "Standard Math Quiz Rubric".to_string(),
                criteria: vec![
                    criterion("crit_01", "Correctness", "Accuracy of the final answers."),
                    criterion("crit_02", "Methodology", "Shows the steps taken to reach the answer."),
                    criterion("crit_03", "Clarity", "The work is neat and easy to follow."),
                ],
            },
            Rubric {
                id: "rub_02".to_string(),
                name: "Essay Writing Rubric".to_string(),
                criteria: vec![
                    criterion("crit_11", "Thesis", "States a clear, arguable position."),
                    criterion("crit_12", "Evidence", "Supports claims with relevant sources."),
                    criterion("crit_13", "Mechanics", "Spelling, grammar and punctuation."),
                ],
            },
        ];

        let guardians = ["stu_01", "stu_05"]
            .iter()
            .map(|s| GuardianLink {
                parent_user_id: "parent-01".to_string(),
                student_id: s.to_string(),
            })
            .collect();

        // Keep the newest-first invariant for the seeded list too.
        assessments.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Self {
            students,
            assessments,
            reports,
            rubrics,
            guardians,
            last_successful_call: None,
        }
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn assessment(&self, id: &str) -> Option<&Assessment> {
        self.assessments.iter().find(|a| a.id == id)
    }

    pub fn assessment_mut(&mut self, id: &str) -> Option<&mut Assessment> {
        self.assessments.iter_mut().find(|a| a.id == id)
    }

    /// Stamps `updated_at` and moves the assessment to the head of the list.
    pub fn touch_assessment(&mut self, id: &str) {
        if let Some(pos) = self.assessments.iter().position(|a| a.id == id) {
            let mut a = self.assessments.remove(pos);
            a.updated_at = Utc::now();
            self.assessments.insert(0, a);
        }
    }

    pub fn report(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn report_mut(&mut self, id: &str) -> Option<&mut Report> {
        self.reports.iter_mut().find(|r| r.id == id)
    }

    pub fn is_guardian_of(&self, parent_user_id: &str, student_id: &str) -> bool {
        self.guardians
            .iter()
            .any(|g| g.parent_user_id == parent_user_id && g.student_id == student_id)
    }
}

fn criterion(id: &str, name: &str, description: &str) -> Criterion {
    Criterion {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        max_score: 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_assessments_are_newest_first() {
        let state = MockState::seeded(Utc::now());
        let times: Vec<_> = state.assessments.iter().map(|a| a.updated_at).collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(times, sorted);
    }

    #[test]
    fn seeded_references_resolve() {
        let state = MockState::seeded(Utc::now());
        for a in &state.assessments {
            assert!(state.student(&a.student_id).is_some(), "{}", a.id);
        }
        for g in &state.guardians {
            assert!(state.student(&g.student_id).is_some());
        }
        assert!(state.is_guardian_of("parent-01", "stu_01"));
        assert!(!state.is_guardian_of("parent-01", "stu_02"));
    }

    #[test]
    fn status_labels_and_parse_agree() {
        for s in [
            AssessmentStatus::Draft,
            AssessmentStatus::AiDraftReady,
            AssessmentStatus::NeedsReview,
            AssessmentStatus::Finalized,
        ] {
            let wire = serde_json::to_value(s).expect("serialize");
            assert_eq!(AssessmentStatus::parse(wire.as_str().unwrap_or("")), Some(s));
            assert!(!s.label().is_empty());
        }
    }
}
