#![allow(dead_code)]

use bytes::Bytes;
use r2_pdf_mirror::core::{ByteSource, ConnectivityProbe, ObjectStore};
use r2_pdf_mirror::{MirrorError, Result};
use rust_xlsxwriter::Workbook;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-memory bucket that drains uploads chunk by chunk.
#[derive(Clone)]
pub struct MemoryStore {
    bucket: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    reject_uploads: bool,
}

impl MemoryStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Arc::new(Mutex::new(HashMap::new())),
            reject_uploads: false,
        }
    }

    pub fn rejecting_uploads(mut self) -> Self {
        self.reject_uploads = true;
        self
    }

    pub async fn insert(&self, key: &str, data: Vec<u8>) {
        let mut objects = self.objects.lock().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    pub async fn object(&self, key: &str) -> Option<StoredObject> {
        let objects = self.objects.lock().await;
        objects.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let objects = self.objects.lock().await;
        let mut keys: Vec<String> = objects.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self.objects.lock().await;
        objects
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| MirrorError::RetrievalError {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                source: "NoSuchKey".into(),
            })
    }

    async fn put_stream<B: ByteSource>(
        &self,
        key: &str,
        content_type: &str,
        mut body: B,
    ) -> Result<u64> {
        if self.reject_uploads {
            return Err(MirrorError::UploadError {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                source: "AccessDenied".into(),
            });
        }

        let mut data = Vec::new();
        while let Some(chunk) = body.next_chunk().await? {
            data.extend_from_slice(&chunk);
        }
        let len = data.len() as u64;

        let mut objects = self.objects.lock().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(len)
    }
}

/// Body made of pre-split chunks.
pub struct ChunkBody(VecDeque<Bytes>);

impl ChunkBody {
    pub fn new(chunks: &[&[u8]]) -> Self {
        Self(chunks.iter().map(|c| Bytes::copy_from_slice(c)).collect())
    }
}

impl ByteSource for ChunkBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.0.pop_front())
    }
}

pub struct Online;

impl ConnectivityProbe for Online {
    async fn is_reachable(&self) -> bool {
        true
    }
}

/// Single-sheet workbook with a header in A1 and `cells` from A2 down; `None` leaves a row blank.
pub fn url_workbook(cells: &[Option<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1").unwrap();
    worksheet.write_string(0, 0, "url").unwrap();
    for (i, cell) in cells.iter().enumerate() {
        if let Some(text) = cell {
            worksheet.write_string(i as u32 + 1, 0, *text).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub fn log_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
