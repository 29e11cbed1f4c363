//! Build, project and VCS change model as supplied by the build server.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// Build identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildId(pub i64);

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file touched by a VCS change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModification {
    /// Path relative to the VCS root, with either `/` or `\` separators.
    pub relative_path: String,
}

impl FileModification {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }
}

/// A VCS change detected since the previous build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcsChange {
    /// VCS revision identifier.
    pub version: String,

    /// Users the change's VCS author maps to. Usually one.
    pub committers: Vec<User>,

    /// Modified files, in VCS order.
    pub files: Vec<FileModification>,
}

impl VcsChange {
    pub fn new(version: impl Into<String>, committers: Vec<User>, files: &[&str]) -> Self {
        Self {
            version: version.into(),
            committers,
            files: files.iter().map(|p| FileModification::new(*p)).collect(),
        }
    }
}

/// Per-build configuration of the auto-assigner (the "build feature").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignerFeature {
    /// Username that receives every otherwise-unassigned item.
    #[serde(default)]
    pub default_responsible: Option<String>,

    /// Usernames that must never be blamed (bots, release managers).
    #[serde(default)]
    pub users_to_ignore: Vec<String>,

    /// Suggest assignments in the UI instead of assigning directly.
    #[serde(default)]
    pub silent_mode: bool,
}

impl AssignerFeature {
    /// Trimmed, non-blank usernames from `users_to_ignore`.
    ///
    /// Entries may themselves contain newline or comma separated lists.
    pub fn excluded_usernames(&self) -> BTreeSet<String> {
        self.users_to_ignore
            .iter()
            .flat_map(|entry| entry.split(['\n', ',']))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Configured default user, ignoring blank values.
    pub fn default_responsible(&self) -> Option<&str> {
        self.default_responsible
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// A finished build as seen by the resolution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub id: BuildId,
    pub number: String,
    pub build_type_name: String,

    /// "Project :: Build Type" style name.
    pub full_name: String,
    pub project_id: String,

    #[serde(default = "default_true")]
    pub default_branch: bool,

    #[serde(default)]
    pub personal: bool,

    /// Changes since the last build, personal builds excluded.
    #[serde(default)]
    pub changes_since_last_build: Vec<VcsChange>,

    /// Auto-assigner configuration, `None` when the feature is not enabled.
    #[serde(default)]
    pub feature: Option<AssignerFeature>,
}

fn default_true() -> bool {
    true
}

impl Build {
    pub fn new(id: i64, number: impl Into<String>, build_type_name: impl Into<String>) -> Self {
        let build_type_name = build_type_name.into();
        Self {
            id: BuildId(id),
            number: number.into(),
            full_name: build_type_name.clone(),
            build_type_name,
            project_id: "_Root".to_string(),
            default_branch: true,
            personal: false,
            changes_since_last_build: Vec::new(),
            feature: None,
        }
    }

    /// Add a detected change (builder pattern).
    pub fn with_change(mut self, change: VcsChange) -> Self {
        self.changes_since_last_build.push(change);
        self
    }

    /// Enable the auto-assigner feature (builder pattern).
    pub fn with_feature(mut self, feature: AssignerFeature) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Distinct committers of all changes since the last build, first-seen order.
    pub fn committers_since_last_build(&self) -> Vec<&User> {
        let mut committers: Vec<&User> = Vec::new();
        for user in self
            .changes_since_last_build
            .iter()
            .flat_map(|change| change.committers.iter())
        {
            if !committers.contains(&user) {
                committers.push(user);
            }
        }
        committers
    }
}

/// Project owning the build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
