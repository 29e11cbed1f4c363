//! Broken-file heuristic.
//!
//! Correlates a failure's diagnostic text with the files changed since the
//! previous build. A changed file whose name (qualified by up to two parent
//! directories) occurs in the text is a suspect, and the single committer of
//! the change that touched it is blamed.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Build, ResolutionContext, ResolutionResult, Responsibility, Result, User};
use crate::heuristics::Heuristic;
use crate::ports::ProblemTextExtractor;

/// Dot-joined patterns this short are too likely to match unrelated text.
pub const SMALL_PATTERN_THRESHOLD: usize = 15;

const SEPARATORS: [&str; 3] = [".", "/", "\\"];

/// Derive the substrings that identify `relative_path` in diagnostic text.
///
/// The file name without extension is qualified by its parent and
/// grandparent directory names. If that dot-joined form has at most
/// [`SMALL_PATTERN_THRESHOLD`] characters, the unqualified file name with
/// its extension is used instead. The result is the chosen parts joined by
/// each of `.`, `/` and `\`, without duplicates.
///
/// ```
/// use iaa_core::heuristics::derive_patterns;
///
/// assert_eq!(derive_patterns("src/main/Foo.java"), vec!["Foo.java"]);
/// assert_eq!(
///     derive_patterns("core/scheduler/TaskQueueWorker.rs"),
///     vec![
///         "core.scheduler.TaskQueueWorker",
///         "core/scheduler/TaskQueueWorker",
///         "core\\scheduler\\TaskQueueWorker",
///     ]
/// );
/// assert!(derive_patterns("config/.gitignore").is_empty());
/// ```
pub fn derive_patterns(relative_path: &str) -> Vec<String> {
    let mut segments: Vec<&str> = relative_path.split(['/', '\\']).collect();
    let file_name = segments.pop().unwrap_or_default();

    let stem = match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    };
    if stem.is_empty() {
        return Vec::new();
    }

    let mut parts: Vec<&str> = segments[segments.len().saturating_sub(2)..]
        .iter()
        .copied()
        .filter(|segment| !segment.is_empty())
        .collect();
    parts.push(stem);

    if parts.join(".").chars().count() <= SMALL_PATTERN_THRESHOLD {
        parts = vec![file_name];
    }

    let mut patterns: Vec<String> = Vec::with_capacity(SEPARATORS.len());
    for separator in SEPARATORS {
        let pattern = parts.join(separator);
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }
    patterns
}

/// A changed file with its precomputed match patterns.
struct Suspect<'a> {
    path: &'a str,
    patterns: Vec<String>,
}

/// A change since the last build, reduced to what matching needs.
struct ChangeSuspects<'a> {
    committers: Vec<&'a User>,
    files: Vec<Suspect<'a>>,
}

impl<'a> ChangeSuspects<'a> {
    /// First file of the change whose patterns occur in `problem_text`.
    fn find_broken_file(&self, problem_text: &str) -> Option<&'a str> {
        self.files
            .iter()
            .find(|file| file.patterns.iter().any(|p| problem_text.contains(p.as_str())))
            .map(|file| file.path)
    }
}

/// Blames the committer of a changed file mentioned in the failure text.
pub struct BrokenFileHeuristic {
    text_extractor: Arc<dyn ProblemTextExtractor>,
}

impl BrokenFileHeuristic {
    pub fn new(text_extractor: Arc<dyn ProblemTextExtractor>) -> Self {
        Self { text_extractor }
    }

    fn index_changes<'a>(ctx: &'a ResolutionContext) -> Vec<ChangeSuspects<'a>> {
        ctx.build
            .changes_since_last_build
            .iter()
            .map(|change| {
                let mut committers: Vec<&User> = Vec::new();
                for user in change.committers.iter().filter(|u| !ctx.is_excluded(u)) {
                    if !committers.contains(&user) {
                        committers.push(user);
                    }
                }
                ChangeSuspects {
                    committers,
                    files: change
                        .files
                        .iter()
                        .map(|file| Suspect {
                            path: &file.relative_path,
                            patterns: derive_patterns(&file.relative_path),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    /// Find the single user responsible for a failure with `problem_text`.
    ///
    /// Returns `None` when no changed file matches, or when the matches
    /// disagree: a matching change with several committers, or two
    /// matching changes by different committers, leave the item unassigned.
    fn find_responsible(
        changes: &[ChangeSuspects<'_>],
        build: &Build,
        problem_text: &str,
    ) -> Option<Responsibility> {
        let mut found: Option<(&User, &str)> = None;

        for change in changes {
            let Some(broken_file) = change.find_broken_file(problem_text) else {
                continue;
            };

            match change.committers.as_slice() {
                [] => continue,
                [committer] => {
                    if let Some((previous, _)) = found {
                        if previous != *committer {
                            debug!(
                                build_id = %build.id,
                                first = %previous.username,
                                second = %committer.username,
                                "suspicious files changed by different committers"
                            );
                            return None;
                        }
                    }
                    found = Some((*committer, broken_file));
                }
                _ => {
                    debug!(
                        build_id = %build.id,
                        file = %broken_file,
                        committers = change.committers.len(),
                        "suspicious file changed by more than one committer"
                    );
                    return None;
                }
            }
        }

        found.map(|(user, broken_file)| {
            Responsibility::new(
                user.clone(),
                format!(
                    "changed the suspicious file \"{}\" which probably broke the build",
                    broken_file
                ),
            )
        })
    }
}

impl Heuristic for BrokenFileHeuristic {
    fn name(&self) -> &str {
        "Detect Broken File Heuristic"
    }

    fn description(&self) -> &str {
        "Assign an investigation to the user who changed a file mentioned in the failure."
    }

    fn evaluate(&self, ctx: &ResolutionContext) -> Result<ResolutionResult> {
        let mut result = ResolutionResult::new();
        let changes = Self::index_changes(ctx);
        if changes.is_empty() {
            return Ok(result);
        }

        for test_run in &ctx.test_runs {
            let text = self.text_extractor.test_run_text(test_run, &ctx.build);
            if let Some(responsibility) = Self::find_responsible(&changes, &ctx.build, &text) {
                result.add(test_run.item(), responsibility)?;
            }
        }

        for problem in &ctx.build_problems {
            let text = self.text_extractor.build_problem_text(problem, &ctx.build);
            if let Some(responsibility) = Self::find_responsible(&changes, &ctx.build, &text) {
                result.add(problem.item(), responsibility)?;
            }
        }

        Ok(result)
    }
}
