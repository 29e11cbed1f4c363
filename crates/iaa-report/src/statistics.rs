//! Usage statistics of the auto-assigner.
//!
//! Counters live in a small JSON file under the data directory. Every
//! `report_*` call is a read-modify-write: bump the in-memory counter under
//! the lock, then persist the whole file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ReportError, Result};

/// Version tag of the statistics file. Files with another version are reset.
pub const STATISTICS_FILE_VERSION: &str = "1";

const PLUGIN_DATA_DIR: &str = "investigationsAutoAssigner";
const STATISTICS_FILE_NAME: &str = "statistics.json";

/// Persisted counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub version: String,
    #[serde(default)]
    pub shown_buttons_count: u64,
    #[serde(default)]
    pub clicked_buttons_count: u64,
    #[serde(default)]
    pub assigned_investigations_count: u64,
    #[serde(default)]
    pub wrong_investigations_count: u64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            version: STATISTICS_FILE_VERSION.to_string(),
            shown_buttons_count: 0,
            clicked_buttons_count: 0,
            assigned_investigations_count: 0,
            wrong_investigations_count: 0,
        }
    }
}

impl Statistics {
    fn is_current(&self) -> bool {
        self.version == STATISTICS_FILE_VERSION
    }
}

/// Reads and writes [`Statistics`] as JSON.
#[derive(Debug, Clone)]
pub struct StatisticsDao {
    data_dir: PathBuf,
    path: PathBuf,
}

impl StatisticsDao {
    /// DAO for `<data_dir>/investigationsAutoAssigner/statistics.json`.
    pub fn new(data_dir: &Path) -> Self {
        let data_dir = data_dir.join(PLUGIN_DATA_DIR);
        let path = data_dir.join(STATISTICS_FILE_NAME);
        Self { data_dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load counters; a missing, unreadable or outdated file reads as zero.
    pub fn read(&self) -> Result<Statistics> {
        if !self.path.exists() {
            return Ok(Statistics::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            ReportError::StatisticsIo {
                path: self.path.display().to_string(),
                source,
            }
        })?;

        match serde_json::from_str::<Statistics>(&content) {
            Ok(statistics) if statistics.is_current() => Ok(statistics),
            Ok(statistics) => {
                debug!(
                    version = %statistics.version,
                    "statistics file has another version, starting from zero"
                );
                Ok(Statistics::default())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupted statistics file, starting from zero");
                Ok(Statistics::default())
            }
        }
    }

    /// Persist counters, creating the data directory if needed.
    pub fn write(&self, statistics: &Statistics) -> Result<()> {
        let io_err = |source| ReportError::StatisticsIo {
            path: self.path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(&self.data_dir).map_err(io_err)?;
        let content = serde_json::to_string_pretty(statistics)?;
        std::fs::write(&self.path, content).map_err(io_err)?;
        Ok(())
    }
}

/// Shared counter collaborator handed to the UI and email adapters.
#[derive(Debug)]
pub struct StatisticsReporter {
    dao: StatisticsDao,
    statistics: Mutex<Statistics>,
}

impl StatisticsReporter {
    pub fn new(dao: StatisticsDao) -> Result<Self> {
        let statistics = dao.read()?;
        Ok(Self {
            dao,
            statistics: Mutex::new(statistics),
        })
    }

    /// Counters only change in memory once the file has been written.
    fn update(&self, bump: impl FnOnce(&mut Statistics)) -> Result<()> {
        let mut statistics = self.statistics.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = statistics.clone();
        bump(&mut next);
        self.dao.write(&next)?;
        *statistics = next;
        Ok(())
    }

    /// An assignment suggestion was displayed.
    pub fn report_shown_button(&self) -> Result<()> {
        self.update(|s| s.shown_buttons_count += 1)
    }

    /// A displayed suggestion was accepted.
    pub fn report_clicked_button(&self) -> Result<()> {
        self.update(|s| s.clicked_buttons_count += 1)
    }

    pub fn report_assigned_investigations(&self, count: u64) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        self.update(|s| s.assigned_investigations_count += count)
    }

    /// An assignment was reported as wrong by its assignee.
    pub fn report_wrong_investigation(&self) -> Result<()> {
        self.update(|s| s.wrong_investigations_count += 1)
    }

    /// Current counters.
    pub fn snapshot(&self) -> Statistics {
        self.statistics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// HTML fragment summarising the counters, appended to email reports.
    pub fn generate_report(&self) -> String {
        let s = self.snapshot();
        format!(
            "<p>Statistics: {} suggestions shown, {} suggestions accepted, {} investigations assigned, {} investigations marked wrong.</p>",
            s.shown_buttons_count,
            s.clicked_buttons_count,
            s.assigned_investigations_count,
            s.wrong_investigations_count
        )
    }
}
