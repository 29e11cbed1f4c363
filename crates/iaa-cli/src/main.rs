//! Investigations Auto-Assigner CLI
//!
//! The `iaa` command runs the auto-assigner against exported build snapshots.
//!
//! ## Commands
//!
//! - `resolve`: Assign the failures of a snapshot build to responsible users
//! - `stats`: Show the persisted usage statistics

mod outbox;
mod snapshot;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iaa_core::{AssignerConfig, DefaultProblemTextExtractor, FailedBuildProcessor, Resolver};
use iaa_report::{
    render_assignments_text, AssignmentsArtifact, EmailReporter, Statistics, StatisticsDao,
    StatisticsReporter, WebLinks,
};
use tracing::{info, warn, Level};

use crate::outbox::FileEmailSender;
use crate::snapshot::BuildSnapshot;

#[derive(Parser)]
#[command(name = "iaa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Investigations auto-assigner for failed builds", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign the failures of a build snapshot
    Resolve {
        /// Build snapshot file (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Print the assignments artifact as JSON
        #[arg(long)]
        json: bool,

        /// Report recipient (overrides IAA_REPORT_EMAIL)
        #[arg(long)]
        email_to: Option<String>,

        /// Write the HTML report to this file
        #[arg(long)]
        email_out: Option<PathBuf>,

        /// Statistics directory (overrides IAA_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Show usage statistics
    Stats {
        /// Statistics directory (overrides IAA_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AssignerConfig::from_env();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    iaa_core::init_tracing(cli.json_logs || config.log_json, level);

    match cli.command {
        Commands::Resolve {
            snapshot,
            json,
            email_to,
            email_out,
            data_dir,
        } => {
            if let Some(dir) = data_dir {
                config = config.with_data_dir(dir);
            }
            if let Some(address) = email_to.as_deref() {
                config = config.with_report_email(address);
            }
            cmd_resolve(&config, &snapshot, json, email_out.as_deref())
                .await
                .map(|_| ())
        }
        Commands::Stats { data_dir } => {
            if let Some(dir) = data_dir {
                config = config.with_data_dir(dir);
            }
            cmd_stats(&config).map(|_| ())
        }
    }
}

/// Resolve one snapshot build. Returns `None` when the build is not eligible.
async fn cmd_resolve(
    config: &AssignerConfig,
    snapshot_path: &Path,
    json: bool,
    email_out: Option<&Path>,
) -> Result<Option<AssignmentsArtifact>> {
    let sources = BuildSnapshot::load(snapshot_path)?.into_sources();
    let resolver = Resolver::standard(sources.users, Arc::new(DefaultProblemTextExtractor));
    let processor = FailedBuildProcessor::new(sources.builds, resolver);

    let Some(info) = processor
        .process(sources.build_id)
        .await
        .with_context(|| format!("Failed to process build {}", sources.build_id))?
    else {
        println!("Build {} is not eligible for auto-assignment", sources.build_id);
        return Ok(None);
    };

    let statistics = Arc::new(
        StatisticsReporter::new(StatisticsDao::new(&config.data_dir))
            .context("Failed to open statistics")?,
    );
    statistics.report_assigned_investigations(info.result().len() as u64)?;

    match (email_out, config.report_email.as_deref()) {
        (Some(path), Some(_)) => {
            let reporter = EmailReporter::new(
                Arc::new(FileEmailSender::new(path.to_path_buf())),
                WebLinks::new(&config.server_url),
                config.report_email.clone(),
            )
            .with_statistics(statistics.clone());
            if !reporter.send_results(&info)? {
                info!(build_id = %info.build.id, "nothing to report");
            }
        }
        (Some(_), None) => warn!("--email-out given without a report address, skipping report"),
        _ => {}
    }

    let artifact = AssignmentsArtifact::from_info(&info);
    if json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
    } else {
        print!("{}", render_assignments_text(&artifact));
    }
    Ok(Some(artifact))
}

fn cmd_stats(config: &AssignerConfig) -> Result<Statistics> {
    let dao = StatisticsDao::new(&config.data_dir);
    let statistics = dao.read()?;

    println!("Statistics ({})", dao.path().display());
    println!("  Suggestions shown:         {}", statistics.shown_buttons_count);
    println!("  Suggestions accepted:      {}", statistics.clicked_buttons_count);
    println!("  Investigations assigned:   {}", statistics.assigned_investigations_count);
    println!("  Investigations wrong:      {}", statistics.wrong_investigations_count);
    Ok(statistics)
}
