use crate::utils::error::{MirrorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> MirrorError {
    MirrorError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// Spreadsheet column letters, `A` through `XFD`.
pub fn validate_column_letters(field_name: &str, column: &str) -> Result<()> {
    if column.is_empty() || column.len() > 3 || !column.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(invalid(
            field_name,
            column,
            "Column must be one to three letters, e.g. A or AB",
        ));
    }
    Ok(())
}

pub fn validate_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid(
            field_name,
            bucket_name,
            "Bucket name must be between 3 and 63 characters",
        ));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            field_name,
            bucket_name,
            "Bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid(
            field_name,
            bucket_name,
            "Bucket name cannot start or end with a hyphen",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://abc.r2.cloudflarestorage.com").is_ok());
        assert!(validate_url("endpoint", "http://127.0.0.1:9000").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "invalid-url").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("download.workers", 8, 1, 64).is_ok());
        assert!(validate_range("download.workers", 0, 1, 64).is_err());
        assert!(validate_range("download.workers", 65, 1, 64).is_err());
    }

    #[test]
    fn test_validate_column_letters() {
        assert!(validate_column_letters("sheet.column", "A").is_ok());
        assert!(validate_column_letters("sheet.column", "ab").is_ok());
        assert!(validate_column_letters("sheet.column", "").is_err());
        assert!(validate_column_letters("sheet.column", "A1").is_err());
        assert!(validate_column_letters("sheet.column", "ABCD").is_err());
    }

    #[test]
    fn test_validate_bucket_name() {
        assert!(validate_bucket_name("storage.bucket", "lihan").is_ok());
        assert!(validate_bucket_name("storage.bucket", "my.pdf-archive").is_ok());
        assert!(validate_bucket_name("storage.bucket", "ab").is_err());
        assert!(validate_bucket_name("storage.bucket", "Uppercase").is_err());
        assert!(validate_bucket_name("storage.bucket", "-edge").is_err());
    }
}
