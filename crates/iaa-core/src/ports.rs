//! Collaborator boundaries of the resolution engine.
//!
//! - `BuildDataProvider`: builds, failed tests, build problems (async, I/O bound)
//! - `ProblemTextExtractor`: diagnostic text used for broken-file matching
//! - `UserDirectory`: username -> user lookup
//!
//! Heuristics only see the synchronous ports; everything they read is
//! already fetched. In-memory implementations live in [`crate::fakes`].

use async_trait::async_trait;

use crate::domain::{Build, BuildId, BuildProblem, Project, Result, TestRun, User};

/// Build-server data access.
#[async_trait]
pub trait BuildDataProvider: Send + Sync {
    /// Fetch a finished build with its changes since the previous build.
    /// Returns `AssignerError::BuildNotFound` if absent.
    async fn build(&self, id: BuildId) -> Result<Build>;

    /// Project owning the build's configuration.
    async fn project(&self, build: &Build) -> Result<Project>;

    /// Failed test runs of the build.
    async fn failed_test_runs(&self, build: &Build) -> Result<Vec<TestRun>>;

    /// Build-level problems of the build.
    async fn build_problems(&self, build: &Build) -> Result<Vec<BuildProblem>>;
}

/// Produces the diagnostic text of a failure. May be empty.
pub trait ProblemTextExtractor: Send + Sync {
    fn test_run_text(&self, test_run: &TestRun, build: &Build) -> String;

    fn build_problem_text(&self, problem: &BuildProblem, build: &Build) -> String;
}

/// Resolves usernames to users.
pub trait UserDirectory: Send + Sync {
    fn find_user(&self, username: &str) -> Option<User>;
}

/// Text extractor over the fields the build server already reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProblemTextExtractor;

impl ProblemTextExtractor for DefaultProblemTextExtractor {
    fn test_run_text(&self, test_run: &TestRun, _build: &Build) -> String {
        format!("{}\n{}", test_run.name, test_run.failure_text)
    }

    fn build_problem_text(&self, problem: &BuildProblem, _build: &Build) -> String {
        if problem.log_excerpt.is_empty() {
            problem.description.clone()
        } else {
            format!("{}\n{}", problem.description, problem.log_excerpt)
        }
    }
}
