use std::fmt;

/// Result of mirroring one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Uploaded {
        url: String,
        bucket: String,
        key: String,
        bytes: u64,
    },
    Failed {
        url: String,
        reason: String,
    },
}

impl Outcome {
    pub fn failed(url: &str, reason: impl Into<String>) -> Self {
        Outcome::Failed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Uploaded { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Outcome::Uploaded { url, .. } | Outcome::Failed { url, .. } => url,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Uploaded {
                url, bucket, key, ..
            } => write!(f, "OK   {} -> r2://{}/{}", url, bucket, key),
            Outcome::Failed { url, reason } => write!(f, "FAIL {} -> {}", url, reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub bytes: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Uploaded { bytes, .. } => {
                self.succeeded += 1;
                self.bytes += bytes;
            }
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Done. Success: {}, Failed: {}", self.succeeded, self.failed)
    }
}

/// Status line and the headers the transfer cares about, with the body still unread.
pub struct HttpResponse<B> {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: B,
}
