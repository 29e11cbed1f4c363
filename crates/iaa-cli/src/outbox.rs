//! Email transport that drops the report into a file instead of mailing it.

use std::path::PathBuf;

use iaa_report::{EmailSender, Result};
use tracing::info;

pub struct FileEmailSender {
    path: PathBuf,
}

impl FileEmailSender {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl EmailSender for FileEmailSender {
    fn send(&self, address: &str, subject: &str, _plain_text: &str, html: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, html)?;
        info!(path = %self.path.display(), to = address, subject, "report written");
        Ok(())
    }
}
