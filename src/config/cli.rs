use crate::config::MirrorConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "r2-pdf-mirror")]
#[command(about = "Mirror the PDFs listed in an R2-hosted spreadsheet back into R2")]
pub struct CliArgs {
    /// Optional TOML file; environment variables override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of concurrent transfers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-request connect/read timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Directory for the run log
    #[arg(long)]
    pub log_dir: Option<String>,

    /// Read and list the URLs without downloading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    /// Report peak memory and throughput at the end of the run
    #[arg(long)]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// Defaults, then the config file, then the environment, then these flags.
    pub fn load_config(&self) -> Result<MirrorConfig> {
        let mut config = match &self.config {
            Some(path) => MirrorConfig::from_file(path)?,
            None => MirrorConfig::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut MirrorConfig) {
        if let Some(workers) = self.workers {
            config.download.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            config.download.request_timeout_secs = timeout;
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_values() {
        let args = CliArgs::parse_from([
            "r2-pdf-mirror",
            "--workers",
            "3",
            "--timeout",
            "15",
            "--log-dir",
            "/tmp/mirror-logs",
        ]);
        let mut config = MirrorConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.download.workers, 3);
        assert_eq!(config.download.request_timeout_secs, 15);
        assert_eq!(config.log_dir(), "/tmp/mirror-logs");
        assert!(!args.dry_run);
    }
}
