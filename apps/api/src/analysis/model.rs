//! Structured senior-rater analysis as returned by the model.
//!
//! Model output is untrusted: every field defaults when absent, null or unreadable.
//! Ratings are accepted as integers, floats or strings like `"70%"`, dollar amounts
//! as `1716`, `1716.15` or `"$1,716"`, and text fields as strings, numbers or lists.
//! One malformed field never rejects the whole analysis.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsAnalysis {
    #[serde(deserialize_with = "or_default")]
    pub executive_summary: ExecutiveSummary,
    #[serde(deserialize_with = "lenient_list")]
    pub current_service_connected_conditions: Vec<ServiceConnectedCondition>,
    #[serde(deserialize_with = "lenient_list")]
    pub missed_claiming_opportunities: Vec<ClaimOpportunity>,
    #[serde(deserialize_with = "or_default")]
    pub combined_rating_scenarios: RatingScenarios,
    #[serde(deserialize_with = "or_default")]
    pub special_monthly_compensation: Option<SpecialMonthlyCompensation>,
    #[serde(deserialize_with = "or_default")]
    pub strategic_action_plan: StrategicActionPlan,
    #[serde(deserialize_with = "or_default")]
    pub evidence_gaps_analysis: EvidenceGaps,
    #[serde(deserialize_with = "or_default")]
    pub pyramiding_considerations: Option<PyramidingConsiderations>,
    #[serde(deserialize_with = "or_default")]
    pub appeal_opportunities: Option<AppealOpportunities>,
    #[serde(deserialize_with = "or_default")]
    pub document_preparation_guidance: Option<DocumentGuidance>,
    #[serde(deserialize_with = "or_default")]
    pub metadata: Option<AnalysisMetadata>,
}

impl ClaimsAnalysis {
    /// Number of top-level sections that carry any content.
    pub fn section_count(&self) -> usize {
        [
            self.executive_summary != ExecutiveSummary::default(),
            !self.current_service_connected_conditions.is_empty(),
            !self.missed_claiming_opportunities.is_empty(),
            self.combined_rating_scenarios.iter().next().is_some(),
            self.special_monthly_compensation.is_some(),
            !self.strategic_action_plan.is_empty(),
            self.evidence_gaps_analysis != EvidenceGaps::default(),
            self.pyramiding_considerations.is_some(),
            self.appeal_opportunities.is_some(),
            self.document_preparation_guidance.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutiveSummary {
    #[serde(deserialize_with = "lenient_rating")]
    pub current_combined_rating: i32,
    #[serde(deserialize_with = "lenient_rating")]
    pub potential_combined_rating: i32,
    #[serde(deserialize_with = "lenient_amount")]
    pub current_monthly_compensation: i64,
    #[serde(deserialize_with = "lenient_amount")]
    pub potential_monthly_compensation: i64,
    #[serde(deserialize_with = "lenient_amount")]
    pub monthly_increase_potential: i64,
    #[serde(deserialize_with = "lenient_amount")]
    pub annual_increase_potential: i64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_conditions_analyzed: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub high_priority_opportunities: u32,
    #[serde(deserialize_with = "lenient_strings")]
    pub key_findings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConnectedCondition {
    #[serde(deserialize_with = "lenient_string")]
    pub condition_name: String,
    #[serde(deserialize_with = "lenient_optional_rating")]
    pub current_rating: Option<i32>,
    #[serde(deserialize_with = "lenient_string")]
    pub diagnostic_code: String,
    #[serde(deserialize_with = "lenient_optional_rating")]
    pub potential_rating: Option<i32>,
    #[serde(deserialize_with = "lenient_string")]
    pub cfr_citation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub evidence_strength: String,
    #[serde(deserialize_with = "lenient_string")]
    pub supporting_evidence: String,
    #[serde(deserialize_with = "lenient_string")]
    pub rating_criteria_met: String,
    #[serde(deserialize_with = "lenient_string")]
    pub probability_increase: String,
    #[serde(deserialize_with = "lenient_string")]
    pub action_required: String,
    #[serde(deserialize_with = "lenient_string")]
    pub timeline: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimOpportunity {
    #[serde(deserialize_with = "lenient_string")]
    pub condition_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub connection_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_condition: String,
    #[serde(deserialize_with = "lenient_optional_rating")]
    pub potential_rating: Option<i32>,
    #[serde(deserialize_with = "lenient_string")]
    pub diagnostic_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cfr_citation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub supporting_evidence: String,
    #[serde(deserialize_with = "lenient_string")]
    pub nexus_strength: String,
    #[serde(deserialize_with = "lenient_string")]
    pub recommended_strategy: String,
    #[serde(deserialize_with = "lenient_string")]
    pub evidence_needed: String,
    #[serde(deserialize_with = "lenient_string")]
    pub success_probability: String,
}

/// One set of individual ratings and what it combines to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingScenario {
    #[serde(deserialize_with = "lenient_ratings")]
    pub individual_ratings: Vec<i32>,
    #[serde(deserialize_with = "lenient_rating")]
    pub combined_rating: i32,
    #[serde(deserialize_with = "lenient_amount")]
    pub monthly_compensation: i64,
}

impl RatingScenario {
    pub fn new(individual_ratings: Vec<i32>) -> Self {
        Self {
            individual_ratings,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingScenarios {
    #[serde(deserialize_with = "or_default")]
    pub current_calculation: Option<RatingScenario>,
    #[serde(deserialize_with = "or_default")]
    pub conservative_scenario: Option<RatingScenario>,
    #[serde(deserialize_with = "or_default")]
    pub realistic_scenario: Option<RatingScenario>,
    #[serde(deserialize_with = "or_default")]
    pub optimistic_scenario: Option<RatingScenario>,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub tdiu_potential: Option<String>,
}

impl RatingScenarios {
    /// Present scenarios in presentation order, with a display label.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RatingScenario)> {
        [
            ("Current", &self.current_calculation),
            ("Conservative", &self.conservative_scenario),
            ("Realistic", &self.realistic_scenario),
            ("Optimistic", &self.optimistic_scenario),
        ]
        .into_iter()
        .filter_map(|(label, scenario)| scenario.as_ref().map(|s| (label, s)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RatingScenario> {
        [
            &mut self.current_calculation,
            &mut self.conservative_scenario,
            &mut self.realistic_scenario,
            &mut self.optimistic_scenario,
        ]
        .into_iter()
        .filter_map(Option::as_mut)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialMonthlyCompensation {
    #[serde(deserialize_with = "lenient_string")]
    pub eligible: String,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub smc_type: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub additional_monthly: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub requirements_met: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategicActionPlan {
    #[serde(deserialize_with = "lenient_list")]
    pub immediate_actions: Vec<ActionItem>,
    #[serde(deserialize_with = "lenient_list")]
    pub short_term_actions: Vec<ActionItem>,
    #[serde(deserialize_with = "lenient_list")]
    pub long_term_actions: Vec<ActionItem>,
}

impl StrategicActionPlan {
    pub fn is_empty(&self) -> bool {
        self.immediate_actions.is_empty()
            && self.short_term_actions.is_empty()
            && self.long_term_actions.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionItem {
    #[serde(deserialize_with = "lenient_string")]
    pub priority: String,
    #[serde(deserialize_with = "lenient_string")]
    pub action: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub deadline: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub timeline: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub impact: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub cost_benefit: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub resources_needed: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub monitoring_required: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceGaps {
    #[serde(deserialize_with = "lenient_strings")]
    pub critical_missing_evidence: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub medical_opinions_needed: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub lay_statements_recommended: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub additional_testing_suggested: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub contradictory_evidence: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub evidence_development_priority: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidingConsiderations {
    #[serde(deserialize_with = "lenient_strings")]
    pub potential_issues: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub recommended_strategies: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub bilateral_factor_applicable: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppealOpportunities {
    #[serde(deserialize_with = "lenient_strings")]
    pub decisions_to_appeal: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub appeal_deadlines: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub appeal_strategies: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub success_probability: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentGuidance {
    #[serde(deserialize_with = "lenient_strings")]
    pub lay_statement_topics: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub medical_opinion_requirements: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub evidence_organization: String,
    #[serde(deserialize_with = "lenient_string")]
    pub c_and_p_exam_preparation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMetadata {
    pub analysis_date: String,
    pub veteran_name: String,
    pub report_id: String,
    pub ai_backend: String,
    pub rater_mode: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient rating parsing
// ────────────────────────────────────────────────────────────────────────────

/// Reads a percentage from `70`, `70.0`, `"70"` or `"70%"`.
fn rating_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok()
            .map(|f| f.round() as i32),
        _ => None,
    }
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(rating_from_value(&value).unwrap_or(0))
}

fn lenient_optional_rating<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(rating_from_value(&value))
}

/// Unreadable entries are dropped rather than failing the whole analysis.
fn lenient_ratings<'de, D>(deserializer: D) -> Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(rating_from_value).collect(),
        other => rating_from_value(&other).into_iter().collect(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient money, counts, text and nested sections
// ────────────────────────────────────────────────────────────────────────────

/// Whole dollars from `1716`, `1716.15`, `"1716"` or `"$1,716.15"`.
fn amount_from_value(value: &Value) -> Option<i64> {
    let dollars = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .trim()
            .parse::<f64>()
            .ok()?,
        _ => return None,
    };
    dollars.is_finite().then(|| dollars.round() as i64)
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value).unwrap_or(0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0))
}

/// Text from a string, a number, or a list joined with `"; "`. Null is no text.
fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(text_from_value)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value).unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value))
}

/// A list of strings; a lone string becomes a one-item list.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(text_from_value).collect(),
        other => text_from_value(other).into_iter().collect(),
    })
}

/// List entries that are not objects of the expected shape are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// A nested section, or its default when the model sent another shape.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ClaimsAnalysis {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_null_text_fields_default_to_empty() {
        let analysis = parse(json!({
            "current_service_connected_conditions": [
                { "condition_name": "PTSD", "diagnostic_code": null, "timeline": 90 }
            ]
        }));
        let condition = &analysis.current_service_connected_conditions[0];
        assert_eq!(condition.condition_name, "PTSD");
        assert_eq!(condition.diagnostic_code, "");
        assert_eq!(condition.timeline, "90");
    }

    #[test]
    fn test_money_accepts_floats_and_dollar_strings() {
        let analysis = parse(json!({
            "executive_summary": {
                "current_monthly_compensation": 1716.15,
                "potential_monthly_compensation": "$2,241",
                "monthly_increase_potential": null,
                "total_conditions_analyzed": "4",
                "key_findings": "PTSD underrated"
            }
        }));
        let summary = &analysis.executive_summary;
        assert_eq!(summary.current_monthly_compensation, 1716);
        assert_eq!(summary.potential_monthly_compensation, 2241);
        assert_eq!(summary.monthly_increase_potential, 0);
        assert_eq!(summary.total_conditions_analyzed, 4);
        assert_eq!(summary.key_findings, vec!["PTSD underrated"]);
    }

    #[test]
    fn test_list_where_text_expected_is_joined() {
        let analysis = parse(json!({
            "evidence_gaps_analysis": {
                "evidence_development_priority": ["1. nexus", "2. sleep study"]
            },
            "combined_rating_scenarios": { "tdiu_potential": ["Possible", "needs VA-21-8940"] },
            "special_monthly_compensation": { "eligible": false, "additional_monthly": "120.50" }
        }));
        assert_eq!(
            analysis.evidence_gaps_analysis.evidence_development_priority,
            "1. nexus; 2. sleep study"
        );
        assert_eq!(
            analysis.combined_rating_scenarios.tdiu_potential.as_deref(),
            Some("Possible; needs VA-21-8940")
        );
        let smc = analysis.special_monthly_compensation.unwrap();
        assert_eq!(smc.eligible, "false");
        assert_eq!(smc.additional_monthly, 121);
    }

    #[test]
    fn test_null_scenario_compensation() {
        let analysis = parse(json!({
            "combined_rating_scenarios": {
                "current_calculation": { "individual_ratings": [50, 30], "monthly_compensation": null }
            }
        }));
        let current = analysis.combined_rating_scenarios.current_calculation.unwrap();
        assert_eq!(current.individual_ratings, vec![50, 30]);
        assert_eq!(current.monthly_compensation, 0);
    }

    #[test]
    fn test_misshapen_sections_default() {
        let analysis = parse(json!({
            "executive_summary": "see below",
            "current_service_connected_conditions": null,
            "missed_claiming_opportunities": [{ "condition_name": "Tinnitus" }, "Hearing loss"],
            "combined_rating_scenarios": { "realistic_scenario": "70%" },
            "strategic_action_plan": { "immediate_actions": [{ "action": "File 21-526EZ", "deadline": null }] },
            "pyramiding_considerations": "None identified",
            "appeal_opportunities": null
        }));
        assert_eq!(analysis.executive_summary, ExecutiveSummary::default());
        assert!(analysis.current_service_connected_conditions.is_empty());
        assert_eq!(analysis.missed_claiming_opportunities.len(), 1);
        assert!(analysis.combined_rating_scenarios.realistic_scenario.is_none());
        let action = &analysis.strategic_action_plan.immediate_actions[0];
        assert_eq!(action.action, "File 21-526EZ");
        assert!(action.deadline.is_none());
        assert!(analysis.pyramiding_considerations.is_none());
        assert!(analysis.appeal_opportunities.is_none());
    }

    #[test]
    fn test_empty_object_deserializes_to_defaults() {
        let analysis: ClaimsAnalysis = serde_json::from_value(json!({})).unwrap();
        assert_eq!(analysis.section_count(), 0);
        assert!(analysis.combined_rating_scenarios.iter().next().is_none());
    }

    #[test]
    fn test_lenient_ratings_accept_mixed_forms() {
        let scenario: RatingScenario = serde_json::from_value(json!({
            "individual_ratings": [70, 50.0, "30%", "n/a", null],
            "combined_rating": "90"
        }))
        .unwrap();
        assert_eq!(scenario.individual_ratings, vec![70, 50, 30]);
        assert_eq!(scenario.combined_rating, 90);
        assert_eq!(scenario.monthly_compensation, 0);
    }

    #[test]
    fn test_condition_rating_as_string() {
        let condition: ServiceConnectedCondition = serde_json::from_value(json!({
            "condition_name": "PTSD",
            "current_rating": "50%",
            "potential_rating": 70
        }))
        .unwrap();
        assert_eq!(condition.current_rating, Some(50));
        assert_eq!(condition.potential_rating, Some(70));
    }

    #[test]
    fn test_scenarios_iterate_in_presentation_order() {
        let scenarios: RatingScenarios = serde_json::from_value(json!({
            "optimistic_scenario": { "individual_ratings": [100] },
            "current_calculation": { "individual_ratings": [50] },
            "tdiu_potential": "No"
        }))
        .unwrap();
        let labels: Vec<&str> = scenarios.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Current", "Optimistic"]);
    }

    #[test]
    fn test_smc_type_field_renamed() {
        let smc: SpecialMonthlyCompensation = serde_json::from_value(json!({
            "eligible": "Yes",
            "type": "SMC-S",
            "additional_monthly": 450
        }))
        .unwrap();
        assert_eq!(smc.smc_type, "SMC-S");
        assert_eq!(smc.additional_monthly, 450);
    }

    #[test]
    fn test_section_count() {
        let analysis: ClaimsAnalysis = serde_json::from_value(json!({
            "current_service_connected_conditions": [{ "condition_name": "PTSD" }],
            "combined_rating_scenarios": { "current_calculation": { "individual_ratings": [50] } },
            "appeal_opportunities": {}
        }))
        .unwrap();
        assert_eq!(analysis.section_count(), 3);
    }
}
