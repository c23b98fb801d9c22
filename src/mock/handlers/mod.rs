pub mod assessments;
pub mod core;
pub mod dashboard;
pub mod parent;
pub mod reports;
pub mod rubrics;
pub mod students;
