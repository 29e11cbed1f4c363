//! Domain model for responsibility resolution.
//!
//! - `ProblemItem`: a failed test run or build problem needing an owner
//! - `Responsibility`: immutable (user, reason) pair
//! - `ResolutionResult`: item -> responsibility map with fallback merge
//! - `ResolutionContext`: read-only snapshot of one finished build

pub mod build;
pub mod context;
pub mod error;
pub mod problem;
pub mod result;
pub mod user;

pub use build::{AssignerFeature, Build, BuildId, FileModification, Project, VcsChange};
pub use context::ResolutionContext;
pub use error::{AssignerError, Result};
pub use problem::{BuildProblem, BuildProblemId, ProblemItem, TestRun, TestRunId};
pub use result::ResolutionResult;
pub use user::{Responsibility, User};
