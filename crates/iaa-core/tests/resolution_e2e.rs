//! End-to-end resolution through the processor with in-memory collaborators.

use std::sync::Arc;

use iaa_core::fakes::{MemoryBuildDataProvider, MemoryUserDirectory};
use iaa_core::{
    AssignerError, AssignerFeature, Build, BuildId, BuildProblem, DefaultProblemTextExtractor,
    FailedBuildProcessor, Project, Resolver, TestRun, User, VcsChange,
};

const PARSER_PATH: &str = "compiler/frontend/ExpressionParser.kt";

fn carol() -> User {
    User::new(3, "carol").with_name("Carol Danvers")
}

fn feature(default_responsible: Option<&str>, ignore: &[&str]) -> AssignerFeature {
    AssignerFeature {
        default_responsible: default_responsible.map(str::to_string),
        users_to_ignore: ignore.iter().map(|s| s.to_string()).collect(),
        silent_mode: false,
    }
}

fn failing_test() -> TestRun {
    TestRun::new(1, 100, "frontend.ExpressionParserTest.parsesLambda").with_failure_text(
        "java.lang.IllegalStateException\n\tat compiler.frontend.ExpressionParser.parse(ExpressionParser.kt:77)",
    )
}

fn exit_code_problem() -> BuildProblem {
    BuildProblem::new(1, "TC_EXIT_CODE", "Process exited with code 1")
}

fn processor(provider: Arc<MemoryBuildDataProvider>, users: Vec<User>) -> FailedBuildProcessor {
    let resolver = Resolver::standard(
        Arc::new(MemoryUserDirectory::with_users(users)),
        Arc::new(DefaultProblemTextExtractor),
    );
    FailedBuildProcessor::new(provider, resolver)
}

#[tokio::test]
async fn broken_file_then_one_committer() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    let build = Build::new(10, "10", "Tests")
        .with_feature(feature(None, &[]))
        .with_change(VcsChange::new("r1", vec![carol()], &[PARSER_PATH]));
    provider.insert(
        build,
        Project::new("Compiler", "Compiler"),
        vec![failing_test()],
        vec![exit_code_problem()],
    );

    let info = processor(provider, vec![carol()])
        .process(BuildId(10))
        .await
        .expect("process")
        .expect("eligible build");

    let result = info.result();
    assert_eq!(result.len(), 2);

    let test_responsibility = result.get(&failing_test().item()).unwrap();
    assert_eq!(test_responsibility.user(), &carol());
    assert!(test_responsibility
        .description()
        .starts_with("changed the suspicious file"));
    assert!(test_responsibility.description().contains(PARSER_PATH));

    let problem_responsibility = result.get(&exit_code_problem().item()).unwrap();
    assert_eq!(problem_responsibility.user(), &carol());
    assert_eq!(
        problem_responsibility.description(),
        "is the only committer to the build since the last build"
    );
}

#[tokio::test]
async fn failures_listed_twice_are_assigned_once() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    let alice = User::new(1, "alice");
    let build = Build::new(15, "15", "Tests")
        .with_feature(feature(None, &[]))
        .with_change(VcsChange::new("r1", vec![alice.clone()], &["docs/README.md"]));
    let repeated = TestRun::new(7, 70, "a.SomeTest.x");
    provider.insert(
        build,
        Project::new("Compiler", "Compiler"),
        vec![repeated.clone(), repeated.clone()],
        vec![exit_code_problem(), exit_code_problem()],
    );

    let info = processor(provider, vec![alice.clone()])
        .process(BuildId(15))
        .await
        .expect("process")
        .expect("eligible build");

    assert_eq!(info.processed_items(), 2);
    assert_eq!(info.result().len(), 2);
    assert_eq!(info.result().get(&repeated.item()).unwrap().user(), &alice);
}

#[tokio::test]
async fn default_user_takes_what_is_left() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    let alice = User::new(1, "alice");
    let bob = User::new(2, "bob");
    let oncall = User::new(9, "oncall");
    let build = Build::new(11, "11", "Tests")
        .with_feature(feature(Some("oncall"), &[]))
        .with_change(VcsChange::new("r1", vec![alice.clone()], &[PARSER_PATH]))
        .with_change(VcsChange::new("r2", vec![bob], &["docs/CHANGELOG.md"]));
    provider.insert(
        build,
        Project::new("Compiler", "Compiler"),
        vec![failing_test()],
        vec![exit_code_problem()],
    );

    let info = processor(provider, vec![alice.clone(), oncall.clone()])
        .process(BuildId(11))
        .await
        .unwrap()
        .unwrap();

    let result = info.result();
    assert_eq!(result.get(&failing_test().item()).unwrap().user(), &alice);
    assert_eq!(result.get(&exit_code_problem().item()).unwrap().user(), &oncall);
}

#[tokio::test]
async fn excluded_users_are_never_blamed() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    let build = Build::new(12, "12", "Tests")
        .with_feature(feature(None, &["carol"]))
        .with_change(VcsChange::new("r1", vec![carol()], &[PARSER_PATH]));
    provider.insert(
        build,
        Project::new("Compiler", "Compiler"),
        vec![failing_test()],
        vec![exit_code_problem()],
    );

    let info = processor(provider, vec![carol()])
        .process(BuildId(12))
        .await
        .unwrap()
        .unwrap();

    assert!(info.result().is_empty());
    assert!(!info.should_report());
    assert_eq!(info.processed_items(), 2);
}

#[tokio::test]
async fn muted_and_investigated_failures_are_skipped() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    let mut muted = failing_test();
    muted.muted = true;
    let mut investigated = exit_code_problem();
    investigated.under_investigation = true;

    let build = Build::new(13, "13", "Tests")
        .with_feature(feature(None, &[]))
        .with_change(VcsChange::new("r1", vec![carol()], &[PARSER_PATH]));
    provider.insert(
        build,
        Project::new("Compiler", "Compiler"),
        vec![muted],
        vec![investigated],
    );

    let info = processor(provider, vec![carol()])
        .process(BuildId(13))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(info.processed_items(), 0);
    assert!(info.result().is_empty());
}

#[tokio::test]
async fn ineligible_builds_are_skipped() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    let unconfigured = Build::new(14, "14", "Tests")
        .with_change(VcsChange::new("r1", vec![carol()], &[PARSER_PATH]));
    let mut personal = Build::new(15, "15", "Tests").with_feature(feature(None, &[]));
    personal.personal = true;

    for build in [unconfigured, personal] {
        provider.insert(
            build,
            Project::new("Compiler", "Compiler"),
            vec![failing_test()],
            vec![],
        );
    }

    let processor = processor(provider, vec![carol()]);
    assert!(processor.process(BuildId(14)).await.unwrap().is_none());
    assert!(processor.process(BuildId(15)).await.unwrap().is_none());
}

#[tokio::test]
async fn collaborator_failure_propagates() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    provider.set_unavailable(true);

    let err = processor(provider, vec![])
        .process(BuildId(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AssignerError::Collaborator(_)));
}

#[tokio::test]
async fn builds_resolve_independently() {
    let provider = Arc::new(MemoryBuildDataProvider::new());
    let alice = User::new(1, "alice");
    let bob = User::new(2, "bob");
    provider.insert(
        Build::new(20, "20", "Tests")
            .with_feature(feature(None, &[]))
            .with_change(VcsChange::new("r1", vec![alice.clone()], &["README.md"])),
        Project::new("Main", "Main"),
        vec![failing_test()],
        vec![],
    );
    provider.insert(
        Build::new(21, "21", "Tests")
            .with_feature(feature(None, &[]))
            .with_change(VcsChange::new("r2", vec![bob.clone()], &["README.md"])),
        Project::new("Main", "Main"),
        vec![failing_test()],
        vec![],
    );

    let results = processor(provider, vec![])
        .process_builds(&[BuildId(20), BuildId(21), BuildId(22)])
        .await;

    assert_eq!(results.len(), 3);
    let first = results[0].as_ref().unwrap().as_ref().unwrap();
    let second = results[1].as_ref().unwrap().as_ref().unwrap();
    assert_eq!(first.result().get(&failing_test().item()).unwrap().user(), &alice);
    assert_eq!(second.result().get(&failing_test().item()).unwrap().user(), &bob);
    assert!(matches!(results[2], Err(AssignerError::BuildNotFound(BuildId(22)))));
}
