use std::path::Path;

use chrono::{DateTime, Utc};
use iaa_core::{BuildId, FailedBuildInfo, ProblemItem};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const ASSIGNMENTS_SCHEMA_VERSION: &str = "1.0";

/// Single assignment in the persisted assignments artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentEntry {
    pub item: ProblemItem,
    /// Test name or build problem description.
    pub subject: String,
    pub username: String,
    pub user_name: String,
    pub description: String,
}

/// Assignments made for one build, in result order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentsArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub build_id: BuildId,
    pub build_type_name: String,
    pub build_number: String,
    pub processed_items: usize,
    pub assignments: Vec<AssignmentEntry>,
}

impl AssignmentsArtifact {
    pub fn from_info(info: &FailedBuildInfo) -> Self {
        let assignments = info
            .result()
            .iter()
            .map(|(item, responsibility)| {
                let subject = match item {
                    ProblemItem::TestRun(id) => info
                        .test_run(*id)
                        .map(|run| run.name.clone())
                        .unwrap_or_else(|| item.to_string()),
                    ProblemItem::BuildProblem(_) => info
                        .build_problem(item)
                        .map(|p| p.description.clone())
                        .unwrap_or_else(|| item.to_string()),
                };
                AssignmentEntry {
                    item: *item,
                    subject,
                    username: responsibility.user().username.clone(),
                    user_name: responsibility.user().descriptive_name().to_string(),
                    description: responsibility.description().to_string(),
                }
            })
            .collect();

        Self {
            schema_version: ASSIGNMENTS_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            build_id: info.build.id,
            build_type_name: info.build.build_type_name.clone(),
            build_number: info.build.number.clone(),
            processed_items: info.processed_items(),
            assignments,
        }
    }

    /// Items that were processed but received no assignment.
    pub fn unresolved(&self) -> usize {
        self.processed_items.saturating_sub(self.assignments.len())
    }
}

/// Write the assignments artifact in pretty JSON format.
pub fn write_assignments_json(path: &Path, artifact: &AssignmentsArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Render a plain-text table for terminal output.
pub fn render_assignments_text(artifact: &AssignmentsArtifact) -> String {
    let mut out = format!(
        "{} #{} (build {}): {} of {} item(s) assigned\n",
        artifact.build_type_name,
        artifact.build_number,
        artifact.build_id,
        artifact.assignments.len(),
        artifact.processed_items
    );
    for entry in &artifact.assignments {
        out.push_str(&format!(
            "  {:<24} {} -> {} ({})\n",
            entry.item.to_string(),
            entry.subject,
            entry.username,
            entry.description
        ));
    }
    out
}
