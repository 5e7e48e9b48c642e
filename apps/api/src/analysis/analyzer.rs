//! Analyzer seam: pluggable, trait-based so the pipeline and routes can run
//! without a live model.
//!
//! Default: `LlmClaimsAnalyzer` (Claude via `llm_client`).
//! `AppState` holds an `Arc<dyn ClaimsAnalyzer>`.

use async_trait::async_trait;
use chrono::Local;
use tracing::{error, info};

use crate::analysis::enrich::enrich;
use crate::analysis::fallback::fallback_analysis;
use crate::analysis::model::ClaimsAnalysis;
use crate::analysis::prompts::{build_analysis_prompt, build_system_prompt};
use crate::llm_client::{LlmClient, LlmError};
use crate::webhook::VeteranInfo;

/// Produces an enriched analysis for a medical record. Never fails: backends fall
/// back to a canned analysis when they cannot produce one.
#[async_trait]
pub trait ClaimsAnalyzer: Send + Sync {
    async fn analyze(&self, medical_text: &str, veteran: &VeteranInfo) -> ClaimsAnalysis;

    /// Label recorded in report metadata, e.g. `Claude (claude-3-5-sonnet-20241022)`.
    fn backend(&self) -> String;
}

pub struct LlmClaimsAnalyzer {
    llm: LlmClient,
}

impl LlmClaimsAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ClaimsAnalyzer for LlmClaimsAnalyzer {
    async fn analyze(&self, medical_text: &str, veteran: &VeteranInfo) -> ClaimsAnalysis {
        let prompt = build_analysis_prompt(medical_text, veteran);
        let system = build_system_prompt();

        let result = self.llm.call_json::<ClaimsAnalysis>(&prompt, &system).await;
        finalize(result, veteran, &self.backend())
    }

    fn backend(&self) -> String {
        format!("Claude ({})", self.llm.model())
    }
}

/// Enriches a successful model result, or substitutes the fallback analysis.
pub fn finalize(
    result: Result<ClaimsAnalysis, LlmError>,
    veteran: &VeteranInfo,
    backend: &str,
) -> ClaimsAnalysis {
    let now = Local::now();
    match result {
        Ok(mut analysis) => {
            enrich(&mut analysis, veteran, backend, now);
            info!(
                "Analysis for {} covers {} sections",
                veteran.report_id,
                analysis.section_count()
            );
            analysis
        }
        Err(LlmError::Parse(e)) => {
            error!("Model returned unparseable JSON for {}: {e}", veteran.report_id);
            fallback_analysis(veteran, backend, now)
        }
        Err(e) => {
            error!("Analysis call failed for {}: {e}", veteran.report_id);
            fallback_analysis(veteran, backend, now)
        }
    }
}
