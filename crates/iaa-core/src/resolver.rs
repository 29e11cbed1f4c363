//! Priority-ordered heuristic pipeline.
//!
//! The resolver runs each registered heuristic against the full context and
//! folds the partial results with [`ResolutionResult::merge_as_fallback`], so
//! an earlier heuristic's answer for an item always wins. Once every item
//! is covered the remaining heuristics are not invoked; their output could
//! not change the result anyway.

use std::sync::Arc;

use crate::domain::{ResolutionContext, ResolutionResult, Result};
use crate::heuristics::{BrokenFileHeuristic, DefaultUserHeuristic, Heuristic, OneCommitterHeuristic};
use crate::obs;
use crate::ports::{ProblemTextExtractor, UserDirectory};

pub struct Resolver {
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl Resolver {
    /// Resolver over `heuristics`; list order is priority order.
    pub fn new(heuristics: Vec<Box<dyn Heuristic>>) -> Self {
        Self { heuristics }
    }

    /// Standard pipeline: broken file, then one committer, then default user.
    pub fn standard(
        users: Arc<dyn UserDirectory>,
        text_extractor: Arc<dyn ProblemTextExtractor>,
    ) -> Self {
        Self::new(vec![
            Box::new(BrokenFileHeuristic::new(text_extractor)),
            Box::new(OneCommitterHeuristic::new()),
            Box::new(DefaultUserHeuristic::new(users)),
        ])
    }

    /// Append a heuristic with the lowest priority (builder pattern).
    pub fn with_heuristic(mut self, heuristic: Box<dyn Heuristic>) -> Self {
        self.heuristics.push(heuristic);
        self
    }

    /// Registered heuristic names in priority order.
    pub fn heuristic_names(&self) -> Vec<&str> {
        self.heuristics.iter().map(|h| h.name()).collect()
    }

    /// Resolve every item of `ctx` that some heuristic can attribute.
    ///
    /// Unresolved items are absent from the result; that is the normal
    /// outcome, not an error.
    pub fn resolve(&self, ctx: &ResolutionContext) -> Result<ResolutionResult> {
        let build_id = ctx.build.id;
        obs::emit_resolution_started(build_id, ctx.item_count(), self.heuristics.len());

        let mut accumulated = ResolutionResult::new();
        let mut heuristics_run = 0;

        for heuristic in &self.heuristics {
            if ctx.is_covered_by(&accumulated) {
                break;
            }

            let partial = heuristic.evaluate(ctx)?;
            heuristics_run += 1;

            let assigned = partial.len();
            let accepted = accumulated.merge_as_fallback(partial);
            obs::emit_heuristic_evaluated(build_id, heuristic.name(), assigned, accepted);
        }

        obs::emit_resolution_finished(
            build_id,
            accumulated.len(),
            ctx.item_count().saturating_sub(accumulated.len()),
            heuristics_run,
        );
        Ok(accumulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Build, Project, ProblemItem, Responsibility, TestRun, User};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Heuristic returning a fixed result and counting its invocations.
    struct Scripted {
        name: &'static str,
        result: ResolutionResult,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(name: &'static str, assignments: &[(ProblemItem, &str)]) -> (Self, Arc<AtomicUsize>) {
            let mut result = ResolutionResult::new();
            for (item, why) in assignments {
                result
                    .add(*item, Responsibility::new(User::new(1, name), *why))
                    .unwrap();
            }
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    result,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl Heuristic for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "scripted"
        }

        fn evaluate(&self, _ctx: &ResolutionContext) -> Result<ResolutionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    fn context(test_ids: &[i64]) -> ResolutionContext {
        ResolutionContext::new(
            Build::new(1, "1", "Tests"),
            Project::new("Main", "Main"),
            vec![],
            test_ids
                .iter()
                .map(|id| TestRun::new(*id, *id * 10, "a.Test.x"))
                .collect(),
            Default::default(),
        )
    }

    fn item(id: i64) -> ProblemItem {
        ProblemItem::TestRun(crate::domain::TestRunId(id))
    }

    #[test]
    fn test_responsible_not_found() {
        let (first, _) = Scripted::new("first", &[]);
        let (second, _) = Scripted::new("second", &[]);
        let resolver = Resolver::new(vec![Box::new(first), Box::new(second)]);

        let result = resolver.resolve(&context(&[1])).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_checks_second_if_not_found_in_first() {
        let (first, _) = Scripted::new("first", &[]);
        let (second, second_calls) = Scripted::new("second", &[(item(1), "second")]);
        let resolver = Resolver::new(vec![Box::new(first), Box::new(second)]);

        let result = resolver.resolve(&context(&[1])).unwrap();
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.get(&item(1)).unwrap().description(), "second");
    }

    #[test]
    fn test_does_not_call_second_if_all_found_in_first() {
        let (first, _) = Scripted::new("first", &[(item(1), "first")]);
        let (second, second_calls) = Scripted::new("second", &[(item(1), "second")]);
        let resolver = Resolver::new(vec![Box::new(first), Box::new(second)]);

        resolver.resolve(&context(&[1])).unwrap();
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_takes_first_found() {
        let (first, _) = Scripted::new("first", &[(item(1), "Failed description")]);
        let (second, _) = Scripted::new(
            "second",
            &[(item(1), "Failed description 2"), (item(2), "Only second")],
        );
        let resolver = Resolver::new(vec![Box::new(first), Box::new(second)]);

        let result = resolver.resolve(&context(&[1, 2])).unwrap();
        assert_eq!(result.get(&item(1)).unwrap().description(), "Failed description");
        assert_eq!(result.get(&item(2)).unwrap().description(), "Only second");
    }

    #[test]
    fn test_short_circuit_has_no_observable_effect() {
        let ctx = context(&[1, 2]);
        let scripts: [&[(ProblemItem, &str)]; 3] = [
            &[(item(1), "a")],
            &[(item(1), "b"), (item(2), "b")],
            &[(item(2), "c")],
        ];

        let resolver = Resolver::new(
            scripts
                .iter()
                .map(|s| Box::new(Scripted::new("h", s).0) as Box<dyn Heuristic>)
                .collect(),
        );
        let short_circuited = resolver.resolve(&ctx).unwrap();

        let mut exhaustive = ResolutionResult::new();
        for s in scripts {
            exhaustive.merge_as_fallback(Scripted::new("h", s).0.result);
        }

        assert_eq!(short_circuited, exhaustive);
    }

    #[test]
    fn test_appended_heuristic_runs_last() {
        let (first, _) = Scripted::new("first", &[(item(1), "first")]);
        let (fallback, fallback_calls) =
            Scripted::new("fallback", &[(item(1), "fallback"), (item(2), "fallback")]);
        let resolver = Resolver::new(vec![Box::new(first)]).with_heuristic(Box::new(fallback));

        assert_eq!(resolver.heuristic_names(), vec!["first", "fallback"]);
        let result = resolver.resolve(&context(&[1, 2])).unwrap();
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.get(&item(1)).unwrap().description(), "first");
        assert_eq!(result.get(&item(2)).unwrap().description(), "fallback");
    }

    #[test]
    fn test_standard_order() {
        let resolver = Resolver::standard(
            Arc::new(crate::fakes::MemoryUserDirectory::new()),
            Arc::new(crate::ports::DefaultProblemTextExtractor),
        );
        assert_eq!(
            resolver.heuristic_names(),
            vec![
                "Detect Broken File Heuristic",
                "Only One Committer Heuristic",
                "Default User Heuristic",
            ]
        );
    }
}
