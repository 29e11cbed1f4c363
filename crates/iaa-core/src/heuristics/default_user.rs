//! Default-user heuristic: the configured fallback owner takes everything left.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{ResolutionContext, ResolutionResult, Responsibility, Result};
use crate::heuristics::{assign_all, Heuristic};
use crate::ports::UserDirectory;

pub struct DefaultUserHeuristic {
    users: Arc<dyn UserDirectory>,
}

impl DefaultUserHeuristic {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }
}

impl Heuristic for DefaultUserHeuristic {
    fn name(&self) -> &str {
        "Default User Heuristic"
    }

    fn description(&self) -> &str {
        "Assign an investigation to the default responsible user."
    }

    fn evaluate(&self, ctx: &ResolutionContext) -> Result<ResolutionResult> {
        let build = &ctx.build;
        let Some(username) = build
            .feature
            .as_ref()
            .and_then(|feature| feature.default_responsible())
        else {
            return Ok(ResolutionResult::new());
        };

        let Some(user) = self.users.find_user(username) else {
            warn!(
                build_id = %build.id,
                username = %username,
                "default responsible user is configured but unknown to the user directory"
            );
            return Ok(ResolutionResult::new());
        };

        let responsibility = Responsibility::new(
            user,
            format!(
                "you're the default responsible user for the build: {} #{}",
                build.full_name, build.number
            ),
        );
        assign_all(ctx, &responsibility)
    }
}
