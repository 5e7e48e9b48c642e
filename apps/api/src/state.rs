use std::sync::Arc;

use crate::analysis::ClaimsAnalyzer;
use crate::config::Config;
use crate::dispatch::{CrmClient, Notifier, ReportStore};
use crate::documents::DocumentFetcher;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator is a trait object so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub analyzer: Arc<dyn ClaimsAnalyzer>,
    pub store: Arc<dyn ReportStore>,
    pub notifier: Arc<dyn Notifier>,
    pub crm: Arc<dyn CrmClient>,
}
