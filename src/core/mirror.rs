use crate::core::sheet::{read_urls, SheetLayout};
use crate::core::transfer::TransferWorker;
use crate::domain::model::RunSummary;
use crate::domain::ports::{ConnectivityProbe, HttpSource, ObjectStore};
use crate::utils::error::Result;
use crate::utils::run_log::RunLog;
use futures::stream::{self, StreamExt};

pub const DEFAULT_WORKERS: usize = 8;

/// Reads the URL list once and fans the transfers out over a fixed-size pool.
pub struct MirrorEngine<H, S, P> {
    worker: TransferWorker<H, S, P>,
    sheet_key: String,
    layout: SheetLayout,
    workers: usize,
}

impl<H, S, P> MirrorEngine<H, S, P>
where
    H: HttpSource,
    S: ObjectStore,
    P: ConnectivityProbe,
{
    pub fn new(worker: TransferWorker<H, S, P>, sheet_key: impl Into<String>) -> Self {
        Self {
            worker,
            sheet_key: sheet_key.into(),
            layout: SheetLayout::default(),
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub async fn read_urls(&self) -> Result<Vec<String>> {
        read_urls(self.worker.store(), &self.sheet_key, &self.layout).await
    }

    /// Runs every transfer and writes one log line per outcome plus the tally.
    ///
    /// Only a failure to read the URL list is returned as an error.
    pub async fn run(&self, log: &mut RunLog) -> Result<RunSummary> {
        tracing::info!(
            "Reading {} from bucket {} ...",
            self.sheet_key,
            self.worker.store().bucket()
        );
        let urls = self.read_urls().await?;
        self.run_urls(&urls, log).await
    }

    pub async fn run_urls(&self, urls: &[String], log: &mut RunLog) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        if urls.is_empty() {
            log.line("No URLs found in spreadsheet. Exiting.")?;
            return Ok(summary);
        }

        tracing::info!(
            "Found {} URLs. Starting downloads with {} workers ...",
            urls.len(),
            self.workers
        );

        let mut outcomes = stream::iter(urls)
            .map(|url| self.worker.transfer(url))
            .buffer_unordered(self.workers);

        while let Some(outcome) = outcomes.next().await {
            log.line(&outcome.to_string())?;
            summary.record(&outcome);
        }

        log.line(&summary.to_string())?;
        Ok(summary)
    }
}
