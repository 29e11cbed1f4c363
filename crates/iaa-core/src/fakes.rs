//! In-memory collaborators (testing and snapshot replay)
//!
//! `MemoryBuildDataProvider` and `MemoryUserDirectory` satisfy the port
//! contracts without a build server behind them.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    AssignerError, Build, BuildId, BuildProblem, Project, Result, TestRun, User,
};
use crate::ports::{BuildDataProvider, UserDirectory};

// ---------------------------------------------------------------------------
// MemoryUserDirectory
// ---------------------------------------------------------------------------

/// User directory backed by a `HashMap<username, User>`.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: HashMap<String, User>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn find_user(&self, username: &str) -> Option<User> {
        self.users.get(username).cloned()
    }
}

// ---------------------------------------------------------------------------
// MemoryBuildDataProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct BuildState {
    build: Build,
    project: Project,
    test_runs: Vec<TestRun>,
    build_problems: Vec<BuildProblem>,
}

/// Build data provider backed by a `HashMap<BuildId, BuildState>`.
#[derive(Debug, Default)]
pub struct MemoryBuildDataProvider {
    builds: Mutex<HashMap<BuildId, BuildState>>,
    unavailable: Mutex<bool>,
}

impl MemoryBuildDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finished build with its failures.
    pub fn insert(
        &self,
        build: Build,
        project: Project,
        test_runs: Vec<TestRun>,
        build_problems: Vec<BuildProblem>,
    ) {
        let mut builds = self.builds.lock().unwrap();
        builds.insert(
            build.id,
            BuildState {
                build,
                project,
                test_runs,
                build_problems,
            },
        );
    }

    /// Make every call fail with a collaborator error, as an unreachable server would.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    fn state(&self, id: BuildId) -> Result<BuildState> {
        if *self.unavailable.lock().unwrap() {
            return Err(AssignerError::Collaborator(
                "build server unavailable".to_string(),
            ));
        }
        let builds = self.builds.lock().unwrap();
        builds
            .get(&id)
            .cloned()
            .ok_or(AssignerError::BuildNotFound(id))
    }
}

#[async_trait]
impl BuildDataProvider for MemoryBuildDataProvider {
    async fn build(&self, id: BuildId) -> Result<Build> {
        Ok(self.state(id)?.build)
    }

    async fn project(&self, build: &Build) -> Result<Project> {
        Ok(self.state(build.id)?.project)
    }

    async fn failed_test_runs(&self, build: &Build) -> Result<Vec<TestRun>> {
        Ok(self.state(build.id)?.test_runs)
    }

    async fn build_problems(&self, build: &Build) -> Result<Vec<BuildProblem>> {
        Ok(self.state(build.id)?.build_problems)
    }
}
