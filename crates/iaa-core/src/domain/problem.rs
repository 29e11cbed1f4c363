//! Problem items: the failed test runs and build problems of a build.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a failed test run within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TestRunId(pub i64);

/// Identifier of a build-level problem within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildProblemId(pub i64);

/// Uniform handle over "thing that needs a responsible user".
///
/// Identity is only meaningful within a single build's resolution pass.
/// The derived ordering (test runs first, then build problems, each by id)
/// is what makes result iteration deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ProblemItem {
    TestRun(TestRunId),
    BuildProblem(BuildProblemId),
}

impl fmt::Display for ProblemItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemItem::TestRun(id) => write!(f, "test run #{}", id.0),
            ProblemItem::BuildProblem(id) => write!(f, "build problem #{}", id.0),
        }
    }
}

/// A failed test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    pub id: TestRunId,

    /// Stable id of the test across builds (used for UI anchors).
    pub test_name_id: i64,

    /// Fully qualified test name.
    pub name: String,

    /// Failure message and stacktrace.
    #[serde(default)]
    pub failure_text: String,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub under_investigation: bool,
}

impl TestRun {
    pub fn new(id: i64, test_name_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: TestRunId(id),
            test_name_id,
            name: name.into(),
            failure_text: String::new(),
            muted: false,
            under_investigation: false,
        }
    }

    /// Attach failure text (builder pattern).
    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = text.into();
        self
    }

    pub fn item(&self) -> ProblemItem {
        ProblemItem::TestRun(self.id)
    }
}

/// A build-level problem (compilation error, exit code, etc).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildProblem {
    pub id: BuildProblemId,

    /// Problem type, e.g. `TC_COMPILATION_ERROR`.
    pub kind: String,

    pub description: String,

    /// Relevant build log lines.
    #[serde(default)]
    pub log_excerpt: String,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub under_investigation: bool,
}

impl BuildProblem {
    pub fn new(id: i64, kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: BuildProblemId(id),
            kind: kind.into(),
            description: description.into(),
            log_excerpt: String::new(),
            muted: false,
            under_investigation: false,
        }
    }

    /// Attach a build log excerpt (builder pattern).
    pub fn with_log_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.log_excerpt = excerpt.into();
        self
    }

    pub fn item(&self) -> ProblemItem {
        ProblemItem::BuildProblem(self.id)
    }
}
