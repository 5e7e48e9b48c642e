// LLM prompt constants for the senior-rater analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{ADJUDICATION_PRINCIPLES, JSON_ONLY_SYSTEM};
use crate::webhook::VeteranInfo;

/// Characters of the medical record sent to the model.
pub const MAX_RECORD_CHARS: usize = 8000;

/// System prompt for the analysis call.
pub const SENIOR_RATER_SYSTEM: &str = "You are a Senior VA Claims Rater (GS-13) with \
    complete mastery of 38 CFR Part 4 and the M21-1 adjudication manual.";

/// User prompt. Placeholders: {veteran_name}, {filename}, {file_size},
/// {uploaded_time}, {report_id}, {medical_text}, {principles}.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"SYSTEM INSTRUCTIONS - "VA Senior Rater Mode"

You are "Senior VA Claims Rater - GS-13." Assume full mastery of 38 CFR Part 4 (Schedule for Rating Disabilities), the M21-1 adjudication manual, and recent VBA policy letters. Review the Veteran's submissions and present the highest supportable ratings plus any additional benefits or special monthly compensation the facts allow.

VETERAN INFORMATION:
- Name: {veteran_name}
- File: {filename} ({file_size})
- Upload Date: {uploaded_time}
- Report ID: {report_id}

MEDICAL RECORDS TO ANALYZE:
{medical_text}

ANALYSIS REQUIREMENTS:
1. Parse every piece of evidence provided.
2. Map each finding to the correct diagnostic code, severity tier, and compensable percentage under 38 CFR.
3. {principles}
4. Individual ratings must be multiples of 10 between 0 and 100.

OUTPUT REQUIRED AS VALID JSON:
{
    "executive_summary": {
        "total_conditions_analyzed": 0,
        "high_priority_opportunities": 0,
        "key_findings": ["Finding 1", "Finding 2"]
    },
    "current_service_connected_conditions": [
        {
            "condition_name": "Condition Name",
            "current_rating": 50,
            "diagnostic_code": "9411",
            "potential_rating": 70,
            "cfr_citation": "38 CFR 4.130",
            "evidence_strength": "High/Moderate/Low",
            "supporting_evidence": "Specific medical evidence found",
            "rating_criteria_met": "Specific criteria met for higher rating",
            "probability_increase": "High/Moderate/Low",
            "action_required": "Specific steps needed",
            "timeline": "30-60 days"
        }
    ],
    "missed_claiming_opportunities": [
        {
            "condition_name": "New Condition Name",
            "connection_type": "Direct/Secondary/Aggravation",
            "primary_condition": "If secondary, what condition causes this",
            "potential_rating": 30,
            "diagnostic_code": "6260",
            "cfr_citation": "38 CFR 4.85",
            "supporting_evidence": "Evidence found in records",
            "nexus_strength": "Strong/Moderate/Weak",
            "recommended_strategy": "Specific claiming approach",
            "evidence_needed": "Additional evidence required",
            "success_probability": "High/Moderate/Low"
        }
    ],
    "combined_rating_scenarios": {
        "current_calculation": { "individual_ratings": [50, 30, 10] },
        "conservative_scenario": { "individual_ratings": [70, 30, 10] },
        "realistic_scenario": { "individual_ratings": [70, 50, 30] },
        "optimistic_scenario": { "individual_ratings": [100, 50, 30] },
        "tdiu_potential": "Yes/No with explanation"
    },
    "special_monthly_compensation": {
        "eligible": "Yes/No",
        "type": "SMC-S, SMC-L, etc.",
        "additional_monthly": 0,
        "requirements_met": "Specific SMC requirements analysis"
    },
    "strategic_action_plan": {
        "immediate_actions": [
            { "priority": "High/Medium/Low", "action": "Specific action", "deadline": "Deadline if applicable", "impact": "Expected outcome", "cost_benefit": "Effort vs reward" }
        ],
        "short_term_actions": [
            { "priority": "High/Medium/Low", "action": "Specific action", "timeline": "30-90 days", "impact": "Expected outcome", "resources_needed": "What is required" }
        ],
        "long_term_actions": [
            { "priority": "High/Medium/Low", "action": "Specific action", "timeline": "90+ days", "impact": "Expected outcome", "monitoring_required": "What to track" }
        ]
    },
    "evidence_gaps_analysis": {
        "critical_missing_evidence": ["Missing item"],
        "medical_opinions_needed": ["Opinion type"],
        "lay_statements_recommended": ["Topic"],
        "additional_testing_suggested": ["Test type"],
        "contradictory_evidence": ["Issue"],
        "evidence_development_priority": "Ranked list of evidence to gather"
    },
    "pyramiding_considerations": {
        "potential_issues": ["Issue"],
        "recommended_strategies": ["Strategy"],
        "bilateral_factor_applicable": "Yes/No with conditions"
    },
    "appeal_opportunities": {
        "decisions_to_appeal": ["Decision"],
        "appeal_deadlines": ["Date"],
        "appeal_strategies": ["Strategy"],
        "success_probability": "Assessment of appeal chances"
    },
    "document_preparation_guidance": {
        "lay_statement_topics": ["Topic"],
        "medical_opinion_requirements": ["Requirement"],
        "evidence_organization": "How to present evidence",
        "c_and_p_exam_preparation": "Preparation recommendations"
    }
}

Combined ratings and compensation amounts are calculated by the system from individual_ratings; do not compute them.
Consider all secondary service connection opportunities and analyze TDIU potential if individual ratings do not reach 100%.
"#;

pub fn build_system_prompt() -> String {
    format!("{SENIOR_RATER_SYSTEM} {JSON_ONLY_SYSTEM}")
}

/// Fills the analysis template. The record is cut to `MAX_RECORD_CHARS` characters.
pub fn build_analysis_prompt(medical_text: &str, veteran: &VeteranInfo) -> String {
    let excerpt: String = medical_text.chars().take(MAX_RECORD_CHARS).collect();

    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("veteran_name", veteran.name.as_str()),
            ("filename", veteran.filename.as_str()),
            ("file_size", veteran.file_size.as_str()),
            ("uploaded_time", veteran.uploaded_time.as_str()),
            ("report_id", veteran.report_id.as_str()),
            ("principles", ADJUDICATION_PRINCIPLES),
            ("medical_text", excerpt.as_str()),
        ],
    )
}

/// Substitutes `{key}` placeholders in a single pass. Substituted text is never
/// rescanned, so braces in veteran-supplied values stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after
            .find('}')
            .and_then(|close| values.iter().find(|(key, _)| *key == &after[..close]));

        match known {
            Some((key, value)) => {
                filled.push_str(value);
                rest = &after[key.len() + 1..];
            }
            None => {
                filled.push('{');
                rest = after;
            }
        }
    }

    filled.push_str(rest);
    filled
}
