use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use crate::dispatch::DispatchError;

const REPORTS_PREFIX: &str = "reports";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Stores a rendered report and returns the URL it can be read from.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn upload(&self, filename: &str, html: &str) -> Result<String, DispatchError>;

    /// URL reported when the upload failed; `date` is `MMDDYYYY`.
    fn error_url(&self, date: &str) -> String;
}

pub struct S3ReportStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ReportStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

pub fn report_key(filename: &str) -> String {
    format!("{REPORTS_PREFIX}/{filename}")
}

fn error_report_url(public_base_url: &str, date: &str) -> String {
    format!("{public_base_url}/{REPORTS_PREFIX}/error_{date}.html")
}

#[async_trait]
impl ReportStore for S3ReportStore {
    async fn upload(&self, filename: &str, html: &str) -> Result<String, DispatchError> {
        let key = report_key(filename);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(HTML_CONTENT_TYPE)
            .body(ByteStream::from(html.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| DispatchError::Storage(e.to_string()))?;

        info!("Uploaded report to s3://{}/{}", self.bucket, key);
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    fn error_url(&self, date: &str) -> String {
        error_report_url(&self.public_base_url, date)
    }
}
