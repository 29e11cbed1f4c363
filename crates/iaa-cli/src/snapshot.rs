//! Offline build snapshots.
//!
//! A snapshot is a JSON export of one finished build: the build with its
//! changes, its project, its failures and the users known to the server.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use iaa_core::fakes::{MemoryBuildDataProvider, MemoryUserDirectory};
use iaa_core::{Build, BuildId, BuildProblem, Project, TestRun, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSnapshot {
    pub build: Build,
    pub project: Project,
    #[serde(default)]
    pub test_runs: Vec<TestRun>,
    #[serde(default)]
    pub build_problems: Vec<BuildProblem>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Collaborators serving a single snapshot.
pub struct SnapshotSources {
    pub build_id: BuildId,
    pub builds: Arc<MemoryBuildDataProvider>,
    pub users: Arc<MemoryUserDirectory>,
}

impl BuildSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid snapshot {}", path.display()))
    }

    pub fn into_sources(self) -> SnapshotSources {
        let build_id = self.build.id;
        let users = Arc::new(MemoryUserDirectory::with_users(self.users));
        let builds = Arc::new(MemoryBuildDataProvider::new());
        builds.insert(self.build, self.project, self.test_runs, self.build_problems);
        SnapshotSources {
            build_id,
            builds,
            users,
        }
    }
}
