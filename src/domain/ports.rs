use crate::domain::model::HttpResponse;
use crate::utils::error::Result;
use bytes::Bytes;
use std::future::Future;

/// A body that yields its bytes one chunk at a time. `Ok(None)` means end of stream.
pub trait ByteSource: Send {
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Bytes>>> + Send;
}

/// Streaming HTTP GET.
pub trait HttpSource: Send + Sync {
    type Body: ByteSource;

    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse<Self::Body>>> + Send;
}

/// The slice of an object store the mirror needs: fetch one object, put one stream.
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    fn get_object(&self, key: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Drains `body` into `key` and returns the number of bytes written.
    fn put_stream<B: ByteSource>(
        &self,
        key: &str,
        content_type: &str,
        body: B,
    ) -> impl Future<Output = Result<u64>> + Send;
}

pub trait ConnectivityProbe: Send + Sync {
    fn is_reachable(&self) -> impl Future<Output = bool> + Send;
}

impl ByteSource for reqwest::Response {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.chunk().await?)
    }
}
