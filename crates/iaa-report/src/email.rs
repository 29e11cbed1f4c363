//! Email report of the assignments made for one build.

use std::fmt::Write as _;
use std::sync::Arc;

use iaa_core::{Build, FailedBuildInfo, ProblemItem};
use tracing::{debug, info};

use crate::error::Result;
use crate::statistics::StatisticsReporter;

/// Outgoing mail transport.
pub trait EmailSender: Send + Sync {
    fn send(&self, address: &str, subject: &str, plain_text: &str, html: &str) -> Result<()>;
}

/// Builds links into the build server UI.
#[derive(Debug, Clone)]
pub struct WebLinks {
    server_url: String,
}

impl WebLinks {
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Results page of a build.
    pub fn view_results_url(&self, build: &Build) -> String {
        format!(
            "{}/viewLog.html?buildId={}&tab=buildResultsDiv",
            self.server_url, build.id
        )
    }
}

/// One rendered line of the report.
struct ReportEntry {
    anchor: String,
    username: String,
    description: String,
}

/// Sends a summary of a build's assignments to a configured address.
pub struct EmailReporter {
    sender: Arc<dyn EmailSender>,
    links: WebLinks,
    address: Option<String>,
    statistics: Option<Arc<StatisticsReporter>>,
}

impl EmailReporter {
    pub fn new(sender: Arc<dyn EmailSender>, links: WebLinks, address: Option<String>) -> Self {
        Self {
            sender,
            links,
            address: address.filter(|a| !a.trim().is_empty()),
            statistics: None,
        }
    }

    /// Append the statistics fragment to every report (builder pattern).
    pub fn with_statistics(mut self, statistics: Arc<StatisticsReporter>) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Send the report for `info`. Returns whether an email was sent.
    ///
    /// Nothing is sent without a configured address or without assignments.
    pub fn send_results(&self, info: &FailedBuildInfo) -> Result<bool> {
        let Some(address) = self.address.as_deref() else {
            debug!(build_id = %info.build.id, "no report address configured");
            return Ok(false);
        };
        if !info.should_report() {
            return Ok(false);
        }

        let entries = Self::entries(info);
        let subject = Self::subject(&info.build);
        let html = self.render_html(info, &entries);
        let plain_text = Self::render_plain_text(&entries);

        self.sender.send(address, &subject, &plain_text, &html)?;
        info!(
            build_id = %info.build.id,
            investigations = entries.len(),
            "assignment report sent"
        );
        Ok(true)
    }

    pub fn subject(build: &Build) -> String {
        format!(
            "Investigations auto-assigner report for {}#{}",
            build.build_type_name, build.id
        )
    }

    fn entries(info: &FailedBuildInfo) -> Vec<ReportEntry> {
        info.result()
            .iter()
            .map(|(item, responsibility)| ReportEntry {
                anchor: match item {
                    ProblemItem::TestRun(id) => {
                        let test_name_id = info.test_run(*id).map_or(id.0, |run| run.test_name_id);
                        format!("testNameId{}", test_name_id)
                    }
                    ProblemItem::BuildProblem(id) => format!("buildProblemId{}", id.0),
                },
                username: responsibility.user().username.clone(),
                description: responsibility.description().to_string(),
            })
            .collect()
    }

    fn render_html(&self, info: &FailedBuildInfo, entries: &[ReportEntry]) -> String {
        let url = self.links.view_results_url(&info.build);
        let statistics = self
            .statistics
            .as_ref()
            .map(|s| s.generate_report())
            .unwrap_or_default();

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<body>\n");
        let _ = writeln!(
            html,
            "<h2>Report for <a href=\"{}\">{}#{}</a>. Found {} investigations:</h2>",
            url,
            escape_html(&info.build.build_type_name),
            info.build.id,
            entries.len()
        );
        html.push_str("<ol>\n");
        for entry in entries {
            let _ = writeln!(
                html,
                "<li><a href=\"{}#{}\">Investigation</a> was assigned to {} who {}.</li>",
                url,
                entry.anchor,
                escape_html(&entry.username),
                escape_html(&entry.description)
            );
        }
        html.push_str("</ol>\n");
        html.push_str(&statistics);
        html.push_str("\n</body>\n</html>");
        html
    }

    fn render_plain_text(entries: &[ReportEntry]) -> String {
        entries
            .iter()
            .map(|e| format!("Investigation was assigned to {} who {}.", e.username, e.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
