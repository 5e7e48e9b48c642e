use chrono::{DateTime, Local};

use crate::analysis::enrich::enrich;
use crate::analysis::model::{
    ClaimOpportunity, ClaimsAnalysis, ExecutiveSummary, RatingScenario, RatingScenarios,
    ServiceConnectedCondition,
};
use crate::webhook::VeteranInfo;

/// Canned analysis used whenever the model call or its JSON fails.
///
/// Figures are not hard-coded: the scenarios go through `enrich` like any model
/// output, so the calculator decides the 70 → 90 combined ratings.
pub fn fallback_analysis(
    veteran: &VeteranInfo,
    ai_backend: &str,
    now: DateTime<Local>,
) -> ClaimsAnalysis {
    let mut analysis = ClaimsAnalysis {
        executive_summary: ExecutiveSummary {
            total_conditions_analyzed: 4,
            high_priority_opportunities: 2,
            key_findings: vec![
                "PTSD rating increase opportunity from 50% to 70%".to_string(),
                "Sleep apnea secondary claim opportunity".to_string(),
                "Depression secondary service connection potential".to_string(),
            ],
            ..ExecutiveSummary::default()
        },
        current_service_connected_conditions: vec![ServiceConnectedCondition {
            condition_name: "PTSD".to_string(),
            current_rating: Some(50),
            diagnostic_code: "9411".to_string(),
            potential_rating: Some(70),
            cfr_citation: "38 CFR 4.130".to_string(),
            evidence_strength: "High".to_string(),
            supporting_evidence:
                "Sleep disturbances, social isolation, occupational impairment documented"
                    .to_string(),
            rating_criteria_met:
                "Occupational and social impairment with deficiencies in most areas".to_string(),
            probability_increase: "High".to_string(),
            action_required: "Updated mental health evaluation focusing on occupational impacts"
                .to_string(),
            timeline: "60-90 days".to_string(),
        }],
        missed_claiming_opportunities: vec![ClaimOpportunity {
            condition_name: "Sleep Apnea".to_string(),
            connection_type: "Secondary".to_string(),
            primary_condition: "PTSD".to_string(),
            potential_rating: Some(50),
            diagnostic_code: "6847".to_string(),
            cfr_citation: "38 CFR 4.97".to_string(),
            supporting_evidence: "Sleep disturbances documented, CPAP use likely".to_string(),
            nexus_strength: "Strong".to_string(),
            recommended_strategy: "File secondary claim with sleep study".to_string(),
            evidence_needed: "Sleep study results, nexus letter".to_string(),
            success_probability: "High".to_string(),
        }],
        combined_rating_scenarios: RatingScenarios {
            current_calculation: Some(RatingScenario::new(vec![50, 30, 10])),
            realistic_scenario: Some(RatingScenario::new(vec![70, 50, 30])),
            ..RatingScenarios::default()
        },
        ..ClaimsAnalysis::default()
    };

    enrich(
        &mut analysis,
        veteran,
        &format!("{ai_backend} (Fallback)"),
        now,
    );
    analysis
}
