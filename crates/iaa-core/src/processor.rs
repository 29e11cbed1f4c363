//! Failed-build orchestration.
//!
//! Fetches a finished build from the [`BuildDataProvider`], decides whether it
//! is eligible, builds the [`ResolutionContext`] and runs the [`Resolver`].
//! Collaborator failures propagate unchanged; retries belong to the caller.

use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::domain::{
    Build, BuildId, BuildProblem, ProblemItem, ResolutionContext, ResolutionResult, Result,
    TestRun, TestRunId,
};
use crate::obs::{self, ResolutionSpan};
use crate::ports::BuildDataProvider;
use crate::resolver::Resolver;

/// Outcome of processing one failed build.
#[derive(Debug, Clone)]
pub struct FailedBuildInfo {
    pub build: Build,

    /// Failures considered for assignment (muted/investigated ones dropped).
    pub test_runs: Vec<TestRun>,
    pub build_problems: Vec<BuildProblem>,

    result: ResolutionResult,
}

impl FailedBuildInfo {
    pub fn new(build: Build, test_runs: Vec<TestRun>, build_problems: Vec<BuildProblem>) -> Self {
        Self {
            build,
            test_runs,
            build_problems,
            result: ResolutionResult::new(),
        }
    }

    /// Fold a heuristics result in; entries already present win.
    pub fn add_heuristics_result(&mut self, result: ResolutionResult) -> usize {
        self.result.merge_as_fallback(result)
    }

    pub fn result(&self) -> &ResolutionResult {
        &self.result
    }

    /// Number of items that were up for assignment.
    pub fn processed_items(&self) -> usize {
        self.test_runs.len() + self.build_problems.len()
    }

    /// Whether there is anything worth reporting.
    pub fn should_report(&self) -> bool {
        !self.result.is_empty()
    }

    pub fn test_run(&self, id: TestRunId) -> Option<&TestRun> {
        self.test_runs.iter().find(|run| run.id == id)
    }

    pub fn build_problem(&self, item: &ProblemItem) -> Option<&BuildProblem> {
        match item {
            ProblemItem::BuildProblem(id) => self.build_problems.iter().find(|p| p.id == *id),
            ProblemItem::TestRun(_) => None,
        }
    }
}

/// Drives resolution for failed builds.
pub struct FailedBuildProcessor {
    provider: Arc<dyn BuildDataProvider>,
    resolver: Resolver,
}

impl FailedBuildProcessor {
    pub fn new(provider: Arc<dyn BuildDataProvider>, resolver: Resolver) -> Self {
        Self { provider, resolver }
    }

    /// Why `build` is not eligible for auto-assignment, if it is not.
    fn skip_reason(build: &Build) -> Option<&'static str> {
        if build.personal {
            Some("personal build")
        } else if !build.default_branch {
            Some("not on the default branch")
        } else if build.feature.is_none() {
            Some("auto-assigner feature not configured")
        } else {
            None
        }
    }

    /// Resolve responsibilities for one failed build.
    ///
    /// Returns `Ok(None)` for builds that are not eligible.
    pub async fn process(&self, build_id: BuildId) -> Result<Option<FailedBuildInfo>> {
        let build = self.provider.build(build_id).await?;
        if let Some(reason) = Self::skip_reason(&build) {
            obs::emit_build_skipped(build_id, reason);
            return Ok(None);
        }

        let project = self.provider.project(&build).await?;
        let test_runs: Vec<TestRun> = self
            .provider
            .failed_test_runs(&build)
            .await?
            .into_iter()
            .filter(|run| !run.muted && !run.under_investigation)
            .collect();
        let build_problems: Vec<BuildProblem> = self
            .provider
            .build_problems(&build)
            .await?
            .into_iter()
            .filter(|problem| !problem.muted && !problem.under_investigation)
            .collect();

        let excluded = build
            .feature
            .as_ref()
            .map(|feature| feature.excluded_usernames())
            .unwrap_or_default();

        let ctx = ResolutionContext::new(build, project, build_problems, test_runs, excluded);
        let mut info = FailedBuildInfo::new(
            ctx.build.clone(),
            ctx.test_runs.clone(),
            ctx.build_problems.clone(),
        );

        let result = {
            let _span = ResolutionSpan::enter(build_id);
            self.resolver.resolve(&ctx)?
        };
        info.add_heuristics_result(result);

        info!(
            build_id = %build_id,
            processed = info.processed_items(),
            assigned = info.result().len(),
            "failed build processed"
        );
        Ok(Some(info))
    }

    /// Resolve several builds concurrently; results are in input order.
    pub async fn process_builds(&self, build_ids: &[BuildId]) -> Vec<Result<Option<FailedBuildInfo>>> {
        join_all(build_ids.iter().map(|id| self.process(*id))).await
    }
}
