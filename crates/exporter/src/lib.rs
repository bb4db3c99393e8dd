pub mod catalog;
pub mod issues;
pub mod measures;
pub mod prompt;
pub mod runner;

pub use issues::{extract_issues, normalize_issue, ISSUE_FIELDS};
pub use measures::{reconcile, MeasuresTable};
pub use prompt::Selection;
pub use runner::export_project;
