//! Investigations Auto-Assigner reports
//!
//! Consumers of a build's resolution result. None of them influence the
//! assignment itself:
//! - `statistics`: persisted usage counters
//! - `email`: per-build HTML report
//! - `details`: view model for the failed-test widget
//! - `artifact`: JSON / text rendering of the assignments

pub mod artifact;
pub mod details;
pub mod email;
pub mod error;
pub mod statistics;

pub use artifact::{
    render_assignments_text, write_assignments_json, AssignmentEntry, AssignmentsArtifact,
};
pub use details::{DetailsModel, FlakyTestDetector, TestDetailsView};
pub use email::{EmailReporter, EmailSender, WebLinks};
pub use error::{ReportError, Result};
pub use statistics::{Statistics, StatisticsDao, StatisticsReporter, STATISTICS_FILE_VERSION};
