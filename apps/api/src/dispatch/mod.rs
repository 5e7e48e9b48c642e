// Report delivery: document store upload, email notification, CRM update.
// Each backend sits behind a trait carried in AppState as Arc<dyn …>.

use thiserror::Error;

pub mod crm;
pub mod email;
pub mod storage;

pub use crm::{CrmClient, ZohoCrmClient};
pub use email::{Notifier, ZohoMailNotifier};
pub use storage::{ReportStore, S3ReportStore};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} rejected request with status {status}: {body}")]
    Rejected {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Maps a non-2xx response to `DispatchError::Rejected`.
async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<(), DispatchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DispatchError::Rejected {
        service,
        status: status.as_u16(),
        body,
    })
}
