//! Error taxonomy for the resolution engine.
//!
//! Ambiguity and missing configuration are not errors: a heuristic that
//! cannot name a single user simply leaves the item out of its result.

use crate::domain::build::BuildId;
use crate::domain::problem::ProblemItem;

/// Errors produced by the resolution engine and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AssignerError {
    /// A heuristic tried to assign the same item twice within its own result.
    #[error("duplicate assignment for {item}")]
    DuplicateAssignment { item: ProblemItem },

    #[error("build not found: {0}")]
    BuildNotFound(BuildId),

    /// A data provider, user directory or other collaborator failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, AssignerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::TestRunId;

    #[test]
    fn test_duplicate_assignment_display() {
        let err = AssignerError::DuplicateAssignment {
            item: ProblemItem::TestRun(TestRunId(7)),
        };
        let msg = err.to_string();
        assert!(msg.contains("duplicate assignment"));
        assert!(msg.contains("test run #7"));
    }

    #[test]
    fn test_build_not_found_display() {
        let err = AssignerError::BuildNotFound(BuildId(239));
        assert!(err.to_string().contains("239"));
    }

    #[test]
    fn test_collaborator_error() {
        let err = AssignerError::Collaborator("vcs backend unreachable".to_string());
        assert!(err.to_string().contains("collaborator error"));
        assert!(err.to_string().contains("vcs backend unreachable"));
    }
}
