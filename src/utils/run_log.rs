use crate::utils::error::Result;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamped text artifact for one run: `<dir>/log_YYYYmmdd_HHMMSS.txt`.
///
/// Every line written here is echoed through `tracing` as well, so the console
/// and the file tell the same story.
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("log_{}.txt", stamp));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::debug!("Run log opened at {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line(&mut self, message: &str) -> Result<()> {
        let message = message.trim_end();
        writeln!(self.file, "{}", message)?;
        tracing::info!("{}", message);
        Ok(())
    }
}
