//! Upload pipeline: one path for every webhook.
//!
//! Flow: extract veteran → download records → analyze → render report →
//!       upload → email → CRM.
//!
//! Collaborator failures degrade instead of aborting: a failed download analyzes the
//! sample record, a failed model call uses the fallback analysis, a failed upload
//! reports an error URL, and email/CRM failures only clear their flag.

use std::fmt;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::ClaimsAnalysis;
use crate::documents::sample_medical_records;
use crate::report::{render_report, report_filename};
use crate::state::AppState;
use crate::webhook::{extract_veteran_info, VeteranInfo, WebhookPayload};

/// Characters of the rendered report returned by `/analyze-sample`.
const REPORT_PREVIEW_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub veteran_name: String,
    pub report_id: String,
    pub report_url: String,
    pub webhook_event: String,
    pub file_processed: String,
    pub ai_backend: String,
    pub analysis_sections: usize,
    pub current_rating: i32,
    pub potential_rating: i32,
    pub monthly_increase: i64,
    pub email_sent: bool,
    pub crm_updated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub current_rating: i32,
    pub potential_rating: i32,
    pub monthly_increase: i64,
    pub conditions_analyzed: usize,
    pub new_opportunities: usize,
}

impl AnalysisSummary {
    fn of(analysis: &ClaimsAnalysis) -> Self {
        let summary = &analysis.executive_summary;
        Self {
            current_rating: summary.current_combined_rating,
            potential_rating: summary.potential_combined_rating,
            monthly_increase: summary.monthly_increase_potential,
            conditions_analyzed: analysis.current_service_connected_conditions.len(),
            new_opportunities: analysis.missed_claiming_opportunities.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleOutcome {
    pub veteran_name: String,
    pub report_id: String,
    pub analysis_summary: AnalysisSummary,
    pub report_preview: String,
}

/// Runs the full pipeline for one upload notification.
///
/// Only report rendering can fail; every other step degrades and logs.
pub async fn process_upload(
    state: &AppState,
    payload: &WebhookPayload,
) -> Result<ProcessOutcome, fmt::Error> {
    let run_id = Uuid::new_v4();
    let now = Local::now();

    info!("[{run_id}] Webhook event: {}", payload.event());
    let veteran = extract_veteran_info(payload, now);
    info!(
        "[{run_id}] Veteran: {} ({}), file: {} ({})",
        veteran.name, veteran.email, veteran.filename, veteran.file_size
    );

    // Step 1: Download
    let medical_text = state.fetcher.fetch_text(&veteran.download_url).await;
    info!(
        "[{run_id}] Downloaded {} characters of medical records",
        medical_text.chars().count()
    );

    // Step 2: Analyze
    let analysis = state.analyzer.analyze(&medical_text, &veteran).await;
    info!("[{run_id}] Senior rater analysis completed");

    // Step 3: Render
    let report_html = render_report(&analysis, &veteran, &medical_text)?;
    info!("[{run_id}] Report generated ({} bytes)", report_html.len());

    // Step 4: Upload
    let filename = report_filename(&veteran, now);
    let report_url = match state.store.upload(&filename, &report_html).await {
        Ok(url) => url,
        Err(e) => {
            warn!("[{run_id}] Error uploading report: {e}");
            state.store.error_url(&veteran.date)
        }
    };
    info!("[{run_id}] Report uploaded: {report_url}");

    // Step 5: Email
    let email_sent = match state
        .notifier
        .send_report(&veteran, &report_url, &analysis)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!("[{run_id}] Email notification not sent: {e}");
            false
        }
    };

    // Step 6: CRM
    let crm_updated = match state
        .crm
        .record_analysis(&veteran, &analysis, &report_url)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!("[{run_id}] CRM not updated: {e}");
            false
        }
    };

    info!(
        "[{run_id}] Potential monthly increase for {}: {}",
        veteran.report_id, analysis.executive_summary.monthly_increase_potential
    );

    Ok(outcome(
        payload,
        veteran,
        &analysis,
        report_url,
        state.analyzer.backend(),
        email_sent,
        crm_updated,
    ))
}

fn outcome(
    payload: &WebhookPayload,
    veteran: VeteranInfo,
    analysis: &ClaimsAnalysis,
    report_url: String,
    ai_backend: String,
    email_sent: bool,
    crm_updated: bool,
) -> ProcessOutcome {
    let summary = AnalysisSummary::of(analysis);
    ProcessOutcome {
        veteran_name: veteran.name,
        report_id: veteran.report_id,
        report_url,
        webhook_event: payload.event().to_string(),
        file_processed: veteran.filename,
        ai_backend,
        analysis_sections: analysis.section_count(),
        current_rating: summary.current_rating,
        potential_rating: summary.potential_rating,
        monthly_increase: summary.monthly_increase,
        email_sent,
        crm_updated,
    }
}

/// Analyzes the built-in sample record for the sample veteran. Nothing is dispatched.
pub async fn analyze_sample(state: &AppState) -> Result<SampleOutcome, fmt::Error> {
    let now = Local::now();
    let veteran = VeteranInfo::sample(now);
    let medical_text = sample_medical_records(now);

    let analysis = state.analyzer.analyze(&medical_text, &veteran).await;
    let report_html = render_report(&analysis, &veteran, &medical_text)?;

    let mut report_preview: String = report_html.chars().take(REPORT_PREVIEW_CHARS).collect();
    report_preview.push_str("...");

    Ok(SampleOutcome {
        veteran_name: veteran.name,
        report_id: veteran.report_id,
        analysis_summary: AnalysisSummary::of(&analysis),
        report_preview,
    })
}
