//! Validation pass over model output.
//!
//! The model is never trusted with arithmetic: every scenario's combined rating and
//! compensation is recomputed from its individual ratings, and the executive summary
//! is rebuilt from the current and realistic scenarios.

use chrono::{DateTime, Local};

use crate::analysis::model::{AnalysisMetadata, ClaimsAnalysis};
use crate::rating::{combine, monthly_compensation, CompensationDelta};
use crate::webhook::VeteranInfo;

pub const RATER_MODE: &str = "Senior VA Claims Rater (GS-13)";

/// Recomputes every derived figure and stamps metadata.
pub fn enrich(
    analysis: &mut ClaimsAnalysis,
    veteran: &VeteranInfo,
    ai_backend: &str,
    now: DateTime<Local>,
) {
    for scenario in analysis.combined_rating_scenarios.iter_mut() {
        let combined = combine(&scenario.individual_ratings) as i32;
        scenario.combined_rating = combined;
        scenario.monthly_compensation = monthly_compensation(combined.into());
    }

    let scenarios = &analysis.combined_rating_scenarios;
    let current = scenarios
        .current_calculation
        .as_ref()
        .map(|s| s.combined_rating)
        .unwrap_or(0);
    let potential = scenarios
        .realistic_scenario
        .as_ref()
        .map(|s| s.combined_rating)
        .unwrap_or(0);
    let delta = CompensationDelta::between(current.into(), potential.into());

    let summary = &mut analysis.executive_summary;
    summary.current_combined_rating = current;
    summary.potential_combined_rating = potential;
    summary.current_monthly_compensation = delta.current_monthly;
    summary.potential_monthly_compensation = delta.potential_monthly;
    summary.monthly_increase_potential = delta.monthly_increase;
    summary.annual_increase_potential = delta.annual_increase;

    if summary.total_conditions_analyzed == 0 {
        summary.total_conditions_analyzed = (analysis.current_service_connected_conditions.len()
            + analysis.missed_claiming_opportunities.len())
            as u32;
    }

    analysis.metadata = Some(AnalysisMetadata {
        analysis_date: now.to_rfc3339(),
        veteran_name: veteran.name.clone(),
        report_id: veteran.report_id.clone(),
        ai_backend: ai_backend.to_string(),
        rater_mode: RATER_MODE.to_string(),
    });
}
