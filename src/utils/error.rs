use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing required configuration: {}", fields.join(", "))]
    MissingConfigError { fields: Vec<String> },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to fetch {bucket}/{key}: {source}")]
    RetrievalError {
        bucket: String,
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to parse workbook {key}: {message}")]
    ParseError { key: String, message: String },

    #[error("Failed to upload {bucket}/{key}: {source}")]
    UploadError {
        bucket: String,
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl MirrorError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MirrorError::HttpError(_) | MirrorError::RetrievalError { .. } => {
                ErrorSeverity::Medium
            }
            MirrorError::UploadError { .. } => ErrorSeverity::Medium,
            MirrorError::MissingConfigError { .. }
            | MirrorError::InvalidConfigValueError { .. }
            | MirrorError::TomlError(_)
            | MirrorError::ParseError { .. } => ErrorSeverity::High,
            MirrorError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MirrorError::MissingConfigError { fields } => {
                format!("Export {} before running", fields.join(", "))
            }
            MirrorError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of {}", field)
            }
            MirrorError::TomlError(_) => {
                "Check the config file syntax and field names".to_string()
            }
            MirrorError::RetrievalError { bucket, key, .. } => format!(
                "Make sure {} exists in bucket {} and the keys can read it",
                key, bucket
            ),
            MirrorError::ParseError { .. } => {
                "Re-save the workbook as .xlsx and check the sheet name".to_string()
            }
            MirrorError::HttpError(_) | MirrorError::UploadError { .. } => {
                "Check network connectivity and retry".to_string()
            }
            MirrorError::IoError(_) => "Check permissions on the log directory".to_string(),
        }
    }

    /// Exit code for the CLI when a run aborts.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_lists_every_field() {
        let err = MirrorError::MissingConfigError {
            fields: vec!["R2_ACCOUNT_ID".to_string(), "R2_SECRET_ACCESS_KEY".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required configuration: R2_ACCOUNT_ID, R2_SECRET_ACCESS_KEY"
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_retrieval_error_is_retryable_severity() {
        let err = MirrorError::RetrievalError {
            bucket: "lihan".to_string(),
            key: "urls.xlsx".to_string(),
            source: "NoSuchKey".into(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Failed to fetch lihan/urls.xlsx: NoSuchKey");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_log_directory_failure_is_critical() {
        let err = MirrorError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
