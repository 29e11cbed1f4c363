//! Investigations Auto-Assigner core
//!
//! Assigns blame for a failed build's test failures and build problems:
//! - Heuristics infer a responsible user from VCS changes, committers and configuration
//! - The resolver merges their partial results in priority order
//! - The processor fetches build data and drives a resolution pass per build

pub mod config;
pub mod domain;
pub mod fakes;
pub mod heuristics;
pub mod obs;
pub mod ports;
pub mod processor;
pub mod resolver;
pub mod telemetry;

pub use config::AssignerConfig;
pub use domain::{
    AssignerError, AssignerFeature, Build, BuildId, BuildProblem, BuildProblemId,
    FileModification, ProblemItem, Project, ResolutionContext, ResolutionResult, Responsibility,
    Result, TestRun, TestRunId, User, VcsChange,
};
pub use heuristics::{
    derive_patterns, BrokenFileHeuristic, DefaultUserHeuristic, Heuristic, OneCommitterHeuristic,
};
pub use ports::{BuildDataProvider, DefaultProblemTextExtractor, ProblemTextExtractor, UserDirectory};
pub use processor::{FailedBuildInfo, FailedBuildProcessor};
pub use resolver::Resolver;
pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
