use crate::config::StorageConfig;
use crate::domain::ports::{ByteSource, ObjectStore};
use crate::utils::error::{MirrorError, Result};
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::{Credentials, StalledStreamProtectionConfig};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client as S3Client;
use bytes::{Bytes, BytesMut};

/// Part size used when nothing else is configured; also the single-PUT threshold.
pub const DEFAULT_PART_SIZE: usize = 8 * 1024 * 1024;

/// Builds an S3 client for the configured R2 account (or explicit endpoint).
///
/// Fails with [`MirrorError::MissingConfigError`] before any network traffic
/// when credentials are absent.
pub async fn build_s3_client(config: &StorageConfig) -> Result<S3Client> {
    let (access_key, secret_key) = config.credentials()?;
    let endpoint = config.endpoint_url()?;
    let credentials = Credentials::new(access_key, secret_key, None, None, "r2-env");

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(&endpoint)
        .credentials_provider(credentials)
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
        .build();

    tracing::debug!("S3 client configured for {}", endpoint);
    Ok(S3Client::from_conf(s3_config))
}

#[derive(Debug, Clone)]
pub struct R2Store {
    client: S3Client,
    bucket: String,
    part_size: usize,
}

impl R2Store {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self {
            client,
            bucket,
            part_size: DEFAULT_PART_SIZE,
        }
    }

    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }

    fn upload_error<E>(&self, key: &str, err: E) -> MirrorError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MirrorError::UploadError {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            source: DisplayErrorContext(err).to_string().into(),
        }
    }

    async fn put_single(&self, key: &str, content_type: &str, data: Bytes) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| self.upload_error(key, e))?;
        Ok(())
    }

    async fn put_multipart<B: ByteSource>(
        &self,
        key: &str,
        content_type: &str,
        first_part: Bytes,
        parts: &mut PartReader<B>,
    ) -> Result<u64> {
        let create = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| self.upload_error(key, e))?;

        let upload_id = create
            .upload_id()
            .ok_or_else(|| MirrorError::UploadError {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                source: "CreateMultipartUpload returned no upload_id".into(),
            })?
            .to_string();

        match self.upload_parts(key, &upload_id, first_part, parts).await {
            Ok((completed, bytes)) => {
                self.client
                    .complete_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .multipart_upload(
                        CompletedMultipartUpload::builder()
                            .set_parts(Some(completed))
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|e| self.upload_error(key, e))?;
                Ok(bytes)
            }
            Err(e) => {
                tracing::warn!("Multipart upload of {} failed, aborting: {}", key, e);
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    tracing::warn!(
                        "Abort of multipart upload {} for {} failed: {}",
                        upload_id,
                        key,
                        DisplayErrorContext(abort_err)
                    );
                }
                Err(e)
            }
        }
    }

    async fn upload_parts<B: ByteSource>(
        &self,
        key: &str,
        upload_id: &str,
        first_part: Bytes,
        parts: &mut PartReader<B>,
    ) -> Result<(Vec<CompletedPart>, u64)> {
        let mut completed = Vec::new();
        let mut part_number: i32 = 1;
        let mut bytes: u64 = 0;
        let mut next = Some(first_part);

        while let Some(data) = next {
            let len = data.len() as u64;
            let output = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(data))
                .send()
                .await
                .map_err(|e| self.upload_error(key, e))?;

            completed.push(
                CompletedPart::builder()
                    .e_tag(output.e_tag().unwrap_or_default())
                    .part_number(part_number)
                    .build(),
            );
            bytes += len;
            tracing::debug!("{}: part {} uploaded ({} bytes so far)", key, part_number, bytes);

            part_number += 1;
            next = parts.next_part().await?;
        }

        Ok((completed, bytes))
    }
}

impl ObjectStore for R2Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let retrieval_error = |source: String| MirrorError::RetrievalError {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            source: source.into(),
        };

        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| retrieval_error(DisplayErrorContext(e).to_string()))?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| retrieval_error(e.to_string()))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn put_stream<B: ByteSource>(
        &self,
        key: &str,
        content_type: &str,
        body: B,
    ) -> Result<u64> {
        let mut parts = PartReader::new(body, self.part_size);

        let first = parts.next_part().await?.unwrap_or_default();
        if !parts.is_exhausted() {
            return self.put_multipart(key, content_type, first, &mut parts).await;
        }

        let len = first.len() as u64;
        self.put_single(key, content_type, first).await?;
        Ok(len)
    }
}

/// Regroups an arbitrary chunk stream into parts of exactly `part_size` bytes
/// (the last part may be shorter). Holds at most one part in memory.
pub struct PartReader<B> {
    body: B,
    part_size: usize,
    buffer: BytesMut,
    exhausted: bool,
}

impl<B: ByteSource> PartReader<B> {
    pub fn new(body: B, part_size: usize) -> Self {
        Self {
            body,
            part_size: part_size.max(1),
            buffer: BytesMut::new(),
            exhausted: false,
        }
    }

    /// True once the body has ended and every buffered byte has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.buffer.is_empty()
    }

    pub async fn next_part(&mut self) -> Result<Option<Bytes>> {
        while !self.exhausted && self.buffer.len() < self.part_size {
            match self.body.next_chunk().await? {
                Some(chunk) => self.buffer.extend_from_slice(&chunk),
                None => self.exhausted = true,
            }
        }

        if self.buffer.is_empty() {
            return Ok(None);
        }
        let take = self.buffer.len().min(self.part_size);
        Ok(Some(self.buffer.split_to(take).freeze()))
    }
}
