//! Log output for the `iaa` binaries.
//!
//! Logs go to stderr so stdout stays reserved for command output. Without
//! `RUST_LOG`, only the auto-assigner crates log at the requested level and
//! dependencies are limited to warnings.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const ASSIGNER_TARGETS: [&str; 3] = ["iaa_core", "iaa_report", "iaa_cli"];

/// Filter directives used when `RUST_LOG` is unset.
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    std::iter::once("warn".to_string())
        .chain(ASSIGNER_TARGETS.iter().map(|t| format!("{t}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Only the first call in a process has an effect.
///
/// JSON lines include the enclosing resolution span, so every event of a
/// pass carries its `build_id` and `pass_id`.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let text_layer = (!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init();
}
