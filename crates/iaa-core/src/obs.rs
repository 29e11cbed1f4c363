//! Structured observability hooks for resolution passes.
//!
//! This module provides:
//! - Pass-scoped tracing spans via the `ResolutionSpan` RAII guard
//! - Emission functions for lifecycle events: start, heuristic evaluated, finish, skip
//!
//! Events are emitted at `info!` level except per-heuristic events, which are
//! `debug!`. For JSON output, set `IAA_LOG_FORMAT=json`.

use tracing::{debug, info};

use crate::domain::BuildId;

/// RAII guard that enters a span for one build's resolution pass.
///
/// # Example
///
/// ```ignore
/// let _span = ResolutionSpan::enter(build.id);
/// // every event below carries build_id and pass_id
/// ```
pub struct ResolutionSpan {
    _span: tracing::span::EnteredSpan,
}

impl ResolutionSpan {
    /// Create and enter a span tagged with the build id and a fresh pass id.
    pub fn enter(build_id: BuildId) -> Self {
        let pass_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("iaa.resolution", build_id = %build_id, pass_id = %pass_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: resolution started for a build with `items` problem items.
pub fn emit_resolution_started(build_id: BuildId, items: usize, heuristics: usize) {
    info!(
        event = "resolution.started",
        build_id = %build_id,
        items = items,
        heuristics = heuristics,
    );
}

/// Emit event: one heuristic ran.
///
/// `assigned` is what the heuristic proposed, `accepted` how many of those
/// were new after the fallback merge.
pub fn emit_heuristic_evaluated(build_id: BuildId, heuristic: &str, assigned: usize, accepted: usize) {
    debug!(
        event = "heuristic.evaluated",
        build_id = %build_id,
        heuristic = %heuristic,
        assigned = assigned,
        accepted = accepted,
    );
}

/// Emit event: resolution finished.
pub fn emit_resolution_finished(build_id: BuildId, assigned: usize, unresolved: usize, heuristics_run: usize) {
    info!(
        event = "resolution.finished",
        build_id = %build_id,
        assigned = assigned,
        unresolved = unresolved,
        heuristics_run = heuristics_run,
    );
}

/// Emit event: build not eligible for auto-assignment.
pub fn emit_build_skipped(build_id: BuildId, reason: &str) {
    info!(event = "build.skipped", build_id = %build_id, reason = %reason);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_span_create() {
        let _span = ResolutionSpan::enter(BuildId(1));
        emit_resolution_started(BuildId(1), 2, 3);
        emit_heuristic_evaluated(BuildId(1), "Default User Heuristic", 2, 1);
        emit_resolution_finished(BuildId(1), 1, 1, 3);
    }
}
