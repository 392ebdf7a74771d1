mod common;

use common::{MemoryStore, Online};
use httpmock::prelude::*;
use r2_pdf_mirror::config::DownloadConfig;
use r2_pdf_mirror::{Outcome, RetryingHttpClient, TransferWorker};

fn http_client(max_retries: u32) -> RetryingHttpClient {
    let config = DownloadConfig {
        max_retries,
        backoff_secs: 0.0,
        request_timeout_secs: 5,
        ..DownloadConfig::default()
    };
    RetryingHttpClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_successful_download_is_streamed_under_prefix() {
    let server = MockServer::start();
    let pdf_mock = server.mock(|when, then| {
        when.method(GET).path("/files/doc");
        then.status(200)
            .header("Content-Type", "application/pdf")
            .body("%PDF-1.7 quarterly results");
    });

    let store = MemoryStore::new("test-bucket");
    let worker = TransferWorker::new(http_client(0), store.clone(), Online, "pdfs/");

    let url = server.url("/files/doc");
    let outcome = worker.transfer(&url).await;

    pdf_mock.assert();
    assert_eq!(
        outcome,
        Outcome::Uploaded {
            url: url.clone(),
            bucket: "test-bucket".to_string(),
            key: "pdfs/doc.pdf".to_string(),
            bytes: 26,
        }
    );
    assert_eq!(
        outcome.to_string(),
        format!("OK   {} -> r2://test-bucket/pdfs/doc.pdf", url)
    );

    let stored = store.object("pdfs/doc.pdf").await.unwrap();
    assert_eq!(stored.data, b"%PDF-1.7 quarterly results");
    assert_eq!(stored.content_type, "application/pdf");
}

#[tokio::test]
async fn test_content_disposition_names_the_object() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/download");
        then.status(200)
            .header("Content-Type", "application/pdf")
            .header("Content-Disposition", "attachment; filename=\"report.pdf\"")
            .body("pdf");
    });

    let store = MemoryStore::new("test-bucket");
    let worker = TransferWorker::new(http_client(0), store.clone(), Online, "pdfs/");

    let outcome = worker.transfer(&server.url("/download")).await;

    assert!(outcome.is_success());
    assert!(store.object("pdfs/report.pdf").await.is_some());
}

#[tokio::test]
async fn test_missing_content_type_defaults_to_pdf() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/files/notice");
        then.status(200).body("pdf bytes");
    });

    let store = MemoryStore::new("test-bucket");
    let worker = TransferWorker::new(http_client(0), store.clone(), Online, "");

    let outcome = worker.transfer(&server.url("/files/notice")).await;

    assert!(outcome.is_success());
    let stored = store.object("notice.pdf").await.unwrap();
    assert_eq!(stored.content_type, "application/pdf");
}

#[tokio::test]
async fn test_not_found_becomes_failure_with_status_code() {
    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/files/gone.pdf");
        then.status(404);
    });

    let store = MemoryStore::new("test-bucket");
    let worker = TransferWorker::new(http_client(3), store.clone(), Online, "pdfs/");

    let url = server.url("/files/gone.pdf");
    let outcome = worker.transfer(&url).await;

    missing.assert_hits(1);
    assert!(!outcome.is_success());
    assert_eq!(outcome.to_string(), format!("FAIL {} -> HTTP 404", url));
    assert!(store.keys().await.is_empty());
}

#[tokio::test]
async fn test_connection_error_becomes_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let store = MemoryStore::new("test-bucket");
    let worker = TransferWorker::new(http_client(0), store.clone(), Online, "pdfs/");

    let url = format!("http://{}/files/doc.pdf", address);
    let outcome = worker.transfer(&url).await;

    match outcome {
        Outcome::Failed { url: failed_url, reason } => {
            assert_eq!(failed_url, url);
            assert!(reason.starts_with("HTTP request failed"));
        }
        other => panic!("expected failure, got {}", other),
    }
}

#[tokio::test]
async fn test_upload_error_becomes_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/files/doc.pdf");
        then.status(200).header("Content-Type", "application/pdf").body("pdf");
    });

    let store = MemoryStore::new("test-bucket").rejecting_uploads();
    let worker = TransferWorker::new(http_client(0), store, Online, "pdfs/");

    let outcome = worker.transfer(&server.url("/files/doc.pdf")).await;

    match outcome {
        Outcome::Failed { reason, .. } => {
            assert_eq!(reason, "Failed to upload test-bucket/pdfs/doc.pdf: AccessDenied");
        }
        other => panic!("expected failure, got {}", other),
    }
}
