//! Responsibility heuristics.
//!
//! Each heuristic is a stateless rule that looks at the full
//! [`ResolutionContext`] and returns a partial [`ResolutionResult`]. The
//! [`Resolver`](crate::resolver::Resolver) runs them in priority order;
//! no heuristic ever sees another heuristic's output.

pub mod broken_file;
pub mod default_user;
pub mod one_committer;

pub use broken_file::{derive_patterns, BrokenFileHeuristic, SMALL_PATTERN_THRESHOLD};
pub use default_user::DefaultUserHeuristic;
pub use one_committer::OneCommitterHeuristic;

use crate::domain::{ResolutionContext, ResolutionResult, Result};

/// A rule that infers responsible users from build metadata.
pub trait Heuristic: Send + Sync {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// One-line explanation of what the rule does.
    fn description(&self) -> &str;

    /// Resolve whatever items this rule can.
    ///
    /// Items the rule cannot attribute (or finds ambiguous) are left out.
    /// The only error is `DuplicateAssignment`, which indicates a bug in the
    /// heuristic itself.
    fn evaluate(&self, ctx: &ResolutionContext) -> Result<ResolutionResult>;
}

/// Assign `responsibility` to every build problem and test run of the build.
pub(crate) fn assign_all(
    ctx: &ResolutionContext,
    responsibility: &crate::domain::Responsibility,
) -> Result<ResolutionResult> {
    let mut result = ResolutionResult::new();
    for item in ctx.items() {
        result.add(item, responsibility.clone())?;
    }
    Ok(result)
}
