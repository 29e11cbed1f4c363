//! Read-only snapshot handed to every heuristic.

use std::collections::{BTreeSet, HashSet};

use crate::domain::build::{Build, Project};
use crate::domain::problem::{BuildProblem, ProblemItem, TestRun};
use crate::domain::result::ResolutionResult;
use crate::domain::user::User;

/// Everything a heuristic may look at for one build.
///
/// Built once per build by the orchestrating caller and never mutated
/// during resolution. Items are unique by id; providers listing a failure
/// twice keep only its first occurrence.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub build: Build,
    pub project: Project,
    pub build_problems: Vec<BuildProblem>,
    pub test_runs: Vec<TestRun>,
    pub excluded_usernames: BTreeSet<String>,
}

impl ResolutionContext {
    pub fn new(
        build: Build,
        project: Project,
        build_problems: Vec<BuildProblem>,
        test_runs: Vec<TestRun>,
        excluded_usernames: BTreeSet<String>,
    ) -> Self {
        Self {
            build,
            project,
            build_problems: unique_by_item(build_problems, BuildProblem::item),
            test_runs: unique_by_item(test_runs, TestRun::item),
            excluded_usernames,
        }
    }

    /// Every problem item of the build: build problems, then test runs.
    pub fn items(&self) -> impl Iterator<Item = ProblemItem> + '_ {
        self.build_problems
            .iter()
            .map(BuildProblem::item)
            .chain(self.test_runs.iter().map(TestRun::item))
    }

    pub fn item_count(&self) -> usize {
        self.build_problems.len() + self.test_runs.len()
    }

    /// Whether `result` already holds an entry for every item.
    pub fn is_covered_by(&self, result: &ResolutionResult) -> bool {
        self.items().all(|item| result.contains(&item))
    }

    pub fn is_excluded(&self, user: &User) -> bool {
        self.excluded_usernames.contains(&user.username)
    }
}

fn unique_by_item<T>(entries: Vec<T>, item: impl Fn(&T) -> ProblemItem) -> Vec<T> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries.into_iter().filter(|e| seen.insert(item(e))).collect()
}
