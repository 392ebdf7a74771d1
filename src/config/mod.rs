#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{MirrorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub storage: StorageConfig,
    pub sheet: SheetConfig,
    pub download: DownloadConfig,
    pub connectivity: ConnectivityConfig,
    pub log_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Overrides the R2 account endpoint, e.g. for MinIO or a local test server.
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub key: String,
    pub sheet_name: String,
    pub column: String,
    /// 1-based; row 1 holds the header.
    pub first_row: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub upload_prefix: String,
    pub workers: usize,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_secs: f64,
    pub part_size_mb: u64,
    pub user_agent: String,
    pub referer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub interval_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            region: "auto".to_string(),
            bucket: "lihan".to_string(),
            max_attempts: 3,
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            key: "Desktop/Excel file/Symbols.xlsx".to_string(),
            sheet_name: "Sheet1".to_string(),
            column: "A".to_string(),
            first_row: 2,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            upload_prefix: "Desktop/All pdfs download/".to_string(),
            workers: 8,
            request_timeout_secs: 120,
            max_retries: 3,
            backoff_secs: 1.0,
            part_size_mb: 8,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            referer: Some("https://www.nseindia.com/".to_string()),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            host: "8.8.8.8".to_string(),
            port: 53,
            timeout_secs: 3,
            interval_secs: 5,
        }
    }
}

impl MirrorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlays values from `lookup`, which maps an environment variable name to its value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("R2_ACCOUNT_ID") {
            self.storage.account_id = Some(v);
        }
        if let Some(v) = get("R2_ACCESS_KEY_ID") {
            self.storage.access_key_id = Some(v);
        }
        if let Some(v) = get("R2_SECRET_ACCESS_KEY") {
            self.storage.secret_access_key = Some(v);
        }
        if let Some(v) = get("R2_ENDPOINT") {
            self.storage.endpoint = Some(v);
        }
        if let Some(v) = get("R2_REGION") {
            self.storage.region = v;
        }
        if let Some(v) = get("R2_BUCKET") {
            self.storage.bucket = v;
        }
        if let Some(v) = get("R2_EXCEL_KEY") {
            self.sheet.key = v;
        }
        if let Some(v) = get("R2_EXCEL_SHEET") {
            self.sheet.sheet_name = v;
        }
        if let Some(v) = get("R2_EXCEL_COLUMN") {
            self.sheet.column = v;
        }
        // An empty prefix is legal, so this one bypasses the blank filter.
        if let Some(v) = lookup("R2_UPLOAD_PREFIX") {
            self.download.upload_prefix = v;
        }
        if let Some(v) = get("MAX_WORKERS") {
            self.download.workers = parse_number("MAX_WORKERS", &v)?;
        }
        if let Some(v) = get("REQUEST_TIMEOUT") {
            self.download.request_timeout_secs = parse_number("REQUEST_TIMEOUT", &v)?;
        }
        if let Some(v) = get("MAX_RETRIES") {
            self.download.max_retries = parse_number("MAX_RETRIES", &v)?;
        }
        if let Some(v) = get("LOG_DIR") {
            self.log_dir = v;
        }
        Ok(())
    }

    pub fn log_dir(&self) -> &str {
        if self.log_dir.is_empty() {
            "output"
        } else {
            &self.log_dir
        }
    }
}

impl StorageConfig {
    pub fn endpoint_url(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }
        match &self.account_id {
            Some(account_id) => Ok(format!("https://{}.r2.cloudflarestorage.com", account_id)),
            None => Err(MirrorError::MissingConfigError {
                fields: vec!["R2_ACCOUNT_ID".to_string()],
            }),
        }
    }

    /// Access key pair, or every missing credential variable in one error.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let mut missing = Vec::new();
        if self.endpoint.is_none() && self.account_id.is_none() {
            missing.push("R2_ACCOUNT_ID".to_string());
        }
        if self.access_key_id.is_none() {
            missing.push("R2_ACCESS_KEY_ID".to_string());
        }
        if self.secret_access_key.is_none() {
            missing.push("R2_SECRET_ACCESS_KEY".to_string());
        }

        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access), Some(secret)) if missing.is_empty() => {
                Ok((access.as_str(), secret.as_str()))
            }
            _ => Err(MirrorError::MissingConfigError { fields: missing }),
        }
    }
}

impl DownloadConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs_f64(self.backoff_secs.max(0.0))
    }

    pub fn part_size_bytes(&self) -> usize {
        (self.part_size_mb as usize) * 1024 * 1024
    }
}

impl ConnectivityConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| MirrorError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Value must be a non-negative integer".to_string(),
        })
}

impl Validate for MirrorConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.storage.endpoint {
            validation::validate_url("storage.endpoint", endpoint)?;
        }
        validation::validate_bucket_name("storage.bucket", &self.storage.bucket)?;
        validation::validate_non_empty_string("storage.region", &self.storage.region)?;
        validation::validate_range("storage.max_attempts", self.storage.max_attempts, 1, 10)?;

        validation::validate_non_empty_string("sheet.key", &self.sheet.key)?;
        validation::validate_non_empty_string("sheet.sheet_name", &self.sheet.sheet_name)?;
        validation::validate_column_letters("sheet.column", &self.sheet.column)?;
        validation::validate_positive_number("sheet.first_row", self.sheet.first_row as u64, 1)?;

        validation::validate_range("download.workers", self.download.workers, 1, 64)?;
        validation::validate_positive_number(
            "download.request_timeout_secs",
            self.download.request_timeout_secs,
            1,
        )?;
        validation::validate_range("download.max_retries", self.download.max_retries, 0, 10)?;
        validation::validate_range("download.backoff_secs", self.download.backoff_secs, 0.0, 60.0)?;
        // S3 rejects multipart parts below 5 MiB.
        validation::validate_range("download.part_size_mb", self.download.part_size_mb, 5, 512)?;

        validation::validate_non_empty_string("connectivity.host", &self.connectivity.host)?;
        validation::validate_positive_number(
            "connectivity.timeout_secs",
            self.connectivity.timeout_secs,
            1,
        )?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
