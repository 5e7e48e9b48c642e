//! Medical record download from WorkDrive.
//!
//! A download never fails the pipeline: on any error the sample record is
//! analyzed instead and the failure is logged.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Local;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};

pub mod sample;

pub use sample::sample_medical_records;

const USER_AGENT: &str = "VA-Claims-Analysis-System/3.0";
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no download URL in webhook payload")]
    MissingUrl,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download failed with status {0}")]
    Status(u16),
}

/// Fetches an uploaded file and returns its text.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, download_url: &str) -> Result<String, DownloadError>;

    /// `fetch`, or the sample record when the download fails.
    async fn fetch_text(&self, download_url: &str) -> String {
        match self.fetch(download_url).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error downloading medical records: {e}");
                sample_medical_records(Local::now())
            }
        }
    }
}

/// Downloads with the Zoho OAuth token.
pub struct WorkDriveFetcher {
    client: Client,
    access_token: String,
}

impl WorkDriveFetcher {
    pub fn new(access_token: String) -> Result<Self, DownloadError> {
        Ok(Self {
            client: Client::builder()
                .timeout(DOWNLOAD_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()?,
            access_token,
        })
    }
}

#[async_trait]
impl DocumentFetcher for WorkDriveFetcher {
    async fn fetch(&self, download_url: &str) -> Result<String, DownloadError> {
        if download_url.trim().is_empty() {
            return Err(DownloadError::MissingUrl);
        }

        info!("Downloading from: {download_url}");

        let response = self
            .client
            .get(download_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Zoho-oauthtoken {}", self.access_token),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Download failed: {status} - {body}");
            return Err(DownloadError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(decode_document(&body, content_type.as_deref()))
    }
}

/// Turns a downloaded body into text: PDF extraction, UTF-8, or a binary marker.
pub fn decode_document(body: &Bytes, content_type: Option<&str>) -> String {
    let is_pdf = body.starts_with(b"%PDF")
        || content_type.is_some_and(|ct| ct.starts_with("application/pdf"));

    if is_pdf {
        match pdf_extract::extract_text_from_mem(body) {
            Ok(text) if !text.trim().is_empty() => return text,
            Ok(_) => warn!("PDF contains no extractable text, may need OCR processing"),
            Err(e) => warn!("PDF text extraction failed: {e}"),
        }
        return binary_marker(body.len());
    }

    match std::str::from_utf8(body) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!("Binary file detected, may need OCR processing");
            binary_marker(body.len())
        }
    }
}

fn binary_marker(len: usize) -> String {
    format!("Binary file content ({len} bytes) - OCR processing needed")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingFetcher;

    #[async_trait]
    impl DocumentFetcher for FailingFetcher {
        async fn fetch(&self, _download_url: &str) -> Result<String, DownloadError> {
            Err(DownloadError::Status(404))
        }
    }

    #[test]
    fn test_decode_plain_text() {
        let body = Bytes::from_static(b"PTSD 70%\nTinnitus 10%");
        assert_eq!(decode_document(&body, Some("text/plain")), "PTSD 70%\nTinnitus 10%");
    }

    #[test]
    fn test_decode_binary_marks_for_ocr() {
        let body = Bytes::from_static(&[0xff, 0xfe, 0x00, 0x81]);
        assert_eq!(
            decode_document(&body, None),
            "Binary file content (4 bytes) - OCR processing needed"
        );
    }

    #[test]
    fn test_decode_broken_pdf_marks_for_ocr() {
        let body = Bytes::from_static(b"%PDF-1.7 truncated");
        assert!(decode_document(&body, Some("application/pdf")).starts_with("Binary file content"));
    }

    #[tokio::test]
    async fn test_fetch_text_falls_back_to_sample() {
        let text = FailingFetcher.fetch_text("https://example.com/missing").await;
        assert!(text.contains("DEPARTMENT OF VETERANS AFFAIRS MEDICAL RECORD"));
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let fetcher = WorkDriveFetcher::new("token".to_string()).unwrap();
        assert!(matches!(fetcher.fetch("  ").await, Err(DownloadError::MissingUrl)));
    }
}
