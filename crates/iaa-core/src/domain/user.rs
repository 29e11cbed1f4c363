//! Users and responsibilities.

use serde::{Deserialize, Serialize};

/// A user known to the build server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            name: None,
        }
    }

    /// Set the display name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name when set, otherwise the username.
    pub fn descriptive_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }
}

/// Immutable (user, reason) pair explaining why an item was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsibility {
    user: User,
    description: String,
}

impl Responsibility {
    pub fn new(user: User, description: impl Into<String>) -> Self {
        Self {
            user,
            description: description.into(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Reason phrased to follow the user's name, e.g. "is the only committer ...".
    pub fn description(&self) -> &str {
        &self.description
    }
}
