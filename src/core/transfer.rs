use crate::adapters::connectivity::wait_until_connected;
use crate::core::filename::pick_filename;
use crate::domain::model::Outcome;
use crate::domain::ports::{ConnectivityProbe, HttpSource, ObjectStore};
use crate::utils::error::Result;
use std::time::Duration;

pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// Moves one URL's body into the store under `upload_prefix`.
pub struct TransferWorker<H, S, P> {
    http: H,
    store: S,
    probe: P,
    probe_interval: Duration,
    upload_prefix: String,
}

impl<H, S, P> TransferWorker<H, S, P>
where
    H: HttpSource,
    S: ObjectStore,
    P: ConnectivityProbe,
{
    pub fn new(http: H, store: S, probe: P, upload_prefix: impl Into<String>) -> Self {
        Self {
            http,
            store,
            probe,
            probe_interval: Duration::from_secs(5),
            upload_prefix: upload_prefix.into(),
        }
    }

    pub fn with_probe_interval(mut self, interval: Duration) -> Self {
        self.probe_interval = interval;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Never fails: every error becomes an [`Outcome::Failed`].
    pub async fn transfer(&self, url: &str) -> Outcome {
        wait_until_connected(&self.probe, self.probe_interval).await;

        match self.try_transfer(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("Transfer of {} failed: {:?}", url, e);
                Outcome::failed(url, e.to_string())
            }
        }
    }

    async fn try_transfer(&self, url: &str) -> Result<Outcome> {
        let response = self.http.get(url).await?;
        if response.status != 200 {
            return Ok(Outcome::failed(url, format!("HTTP {}", response.status)));
        }

        let filename = pick_filename(
            url,
            response.content_disposition.as_deref(),
            response.content_type.as_deref(),
        );
        let key = format!("{}{}", self.upload_prefix, filename);
        let content_type = response
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        tracing::debug!("Streaming {} -> {} ({})", url, key, content_type);
        let bytes = self
            .store
            .put_stream(&key, &content_type, response.body)
            .await?;

        Ok(Outcome::Uploaded {
            url: url.to_string(),
            bucket: self.store.bucket().to_string(),
            key,
            bytes,
        })
    }
}
