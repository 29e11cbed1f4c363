//! One-committer heuristic: a sole committer since the last build owns every failure.

use tracing::debug;

use crate::domain::{ResolutionContext, ResolutionResult, Responsibility, Result, User};
use crate::heuristics::{assign_all, Heuristic};

#[derive(Debug, Clone, Copy, Default)]
pub struct OneCommitterHeuristic;

impl OneCommitterHeuristic {
    pub fn new() -> Self {
        Self
    }
}

impl Heuristic for OneCommitterHeuristic {
    fn name(&self) -> &str {
        "Only One Committer Heuristic"
    }

    fn description(&self) -> &str {
        "Assign an investigation to the user who is the only committer since the last build."
    }

    fn evaluate(&self, ctx: &ResolutionContext) -> Result<ResolutionResult> {
        let committers: Vec<&User> = ctx
            .build
            .committers_since_last_build()
            .into_iter()
            .filter(|user| !ctx.is_excluded(user))
            .collect();

        match committers.as_slice() {
            [only] => {
                let responsibility = Responsibility::new(
                    (*only).clone(),
                    "is the only committer to the build since the last build",
                );
                assign_all(ctx, &responsibility)
            }
            _ => {
                debug!(
                    build_id = %ctx.build.id,
                    committers = committers.len(),
                    "no single committer since the last build"
                );
                Ok(ResolutionResult::new())
            }
        }
    }
}
