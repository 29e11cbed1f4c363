//! View model for the "suggested investigation" widget on a failed test.

use std::sync::Arc;

use iaa_core::{Build, BuildId, Responsibility, TestRun};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::statistics::StatisticsReporter;

/// Data the widget renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsModel {
    pub user_id: i64,
    pub user_name: String,
    /// Reason as displayed next to the user.
    pub shown_description: String,
    /// Reason stored on the investigation if the suggestion is accepted.
    pub investigation_description: String,
    pub build_id: BuildId,
    pub project_id: String,
    pub test_name_id: i64,
}

/// Tells whether a test fails intermittently, keyed by test name id.
pub trait FlakyTestDetector: Send + Sync {
    fn is_flaky(&self, test_name_id: i64) -> bool;
}

/// Produces [`DetailsModel`]s and counts how often suggestions are shown.
pub struct TestDetailsView {
    statistics: Arc<StatisticsReporter>,
    flaky_tests: Option<Arc<dyn FlakyTestDetector>>,
}

impl TestDetailsView {
    pub fn new(statistics: Arc<StatisticsReporter>) -> Self {
        Self {
            statistics,
            flaky_tests: None,
        }
    }

    /// Hide suggestions for tests `detector` reports as flaky.
    pub fn with_flaky_detector(mut self, detector: Arc<dyn FlakyTestDetector>) -> Self {
        self.flaky_tests = Some(detector);
        self
    }

    fn is_flaky(&self, test_run: &TestRun) -> bool {
        self.flaky_tests
            .as_ref()
            .is_some_and(|d| d.is_flaky(test_run.test_name_id))
    }

    /// Model for `test_run` of `build`, if a suggestion should be shown.
    ///
    /// `responsibility` was computed for `first_failed_in`, the build where
    /// the test started failing, which may be earlier than `build`.
    pub fn model(
        &self,
        build: &Build,
        test_run: &TestRun,
        responsibility: Option<&Responsibility>,
        first_failed_in: Option<BuildId>,
    ) -> Result<Option<DetailsModel>> {
        let silent_mode = build.feature.as_ref().is_some_and(|f| f.silent_mode);
        if !silent_mode
            || !build.default_branch
            || test_run.under_investigation
            || self.is_flaky(test_run)
        {
            return Ok(None);
        }
        let Some(responsibility) = responsibility else {
            return Ok(None);
        };

        let mut shown_description = responsibility.description().to_string();
        let from_earlier_build = first_failed_in.is_some_and(|id| id != build.id);
        if from_earlier_build && shown_description.ends_with("build") {
            shown_description.push_str(" with the first test failure");
        }

        self.statistics.report_shown_button()?;

        Ok(Some(DetailsModel {
            user_id: responsibility.user().id,
            user_name: responsibility.user().descriptive_name().to_string(),
            shown_description,
            investigation_description: responsibility.description().to_string(),
            build_id: build.id,
            project_id: build.project_id.clone(),
            test_name_id: test_run.test_name_id,
        }))
    }
}
