//! HTML report rendering.
//!
//! Produces one standalone document (inline CSS, no external assets) so the file can
//! be uploaded, emailed and opened as-is. All model-supplied text is escaped.

use std::fmt::{self, Write};

use chrono::{DateTime, Local};

use crate::analysis::model::{ActionItem, ClaimsAnalysis};
use crate::rating::combination_steps;
use crate::webhook::VeteranInfo;

pub mod format;

use format::{escape_html, format_dollars, strength_class};

/// Characters of the source record quoted at the end of the report.
const RECORD_EXCERPT_CHARS: usize = 1500;

const STYLE: &str = "
body { font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; margin: 0; background: #f4f6f9; color: #1f2933; }
.container { max-width: 1100px; margin: 0 auto; padding: 24px; }
header { background: #1e3a5f; color: #fff; padding: 28px 24px; }
header h1 { margin: 0 0 8px; font-size: 1.8rem; }
header p { margin: 2px 0; opacity: 0.9; }
section { background: #fff; border-radius: 8px; padding: 20px 24px; margin: 20px 0; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
h2 { color: #1e3a5f; border-bottom: 2px solid #e4e7eb; padding-bottom: 6px; }
.metrics { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 16px; }
.metric { background: #f0f4f8; border-radius: 6px; padding: 14px; text-align: center; }
.metric .value { font-size: 1.6rem; font-weight: 700; color: #1e3a5f; }
.metric .label { font-size: 0.85rem; color: #52606d; }
table { width: 100%; border-collapse: collapse; font-size: 0.92rem; }
th, td { border: 1px solid #e4e7eb; padding: 8px; text-align: left; vertical-align: top; }
th { background: #f0f4f8; }
.high { color: #0b7a3e; font-weight: 600; }
.medium { color: #b7791f; font-weight: 600; }
.low { color: #c53030; font-weight: 600; }
pre { white-space: pre-wrap; background: #f0f4f8; padding: 12px; border-radius: 6px; font-size: 0.85rem; }
.disclaimer { font-size: 0.8rem; color: #7b8794; }
@media (max-width: 640px) { table, thead, tbody, tr, th, td { display: block; } th { display: none; } }
";

/// `va_senior_rater_analysis_<name>_<YYYYMMDD_HHMMSS>.html`
pub fn report_filename(veteran: &VeteranInfo, now: DateTime<Local>) -> String {
    let clean_name = veteran.name.replace([' ', '-'], "_").to_lowercase();
    format!(
        "va_senior_rater_analysis_{clean_name}_{}.html",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Renders the full report document.
pub fn render_report(
    analysis: &ClaimsAnalysis,
    veteran: &VeteranInfo,
    medical_text: &str,
) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(16 * 1024);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    )?;
    writeln!(
        html,
        "<title>VA Claims Analysis - {}</title>",
        escape_html(&veteran.name)
    )?;
    writeln!(html, "<style>{STYLE}</style></head><body>")?;

    write_header(&mut html, analysis, veteran)?;
    writeln!(html, "<div class=\"container\">")?;
    write_summary(&mut html, analysis)?;
    write_conditions(&mut html, analysis)?;
    write_opportunities(&mut html, analysis)?;
    write_scenarios(&mut html, analysis)?;
    write_smc(&mut html, analysis)?;
    write_action_plan(&mut html, analysis)?;
    write_evidence_gaps(&mut html, analysis)?;
    write_record_excerpt(&mut html, medical_text)?;
    writeln!(
        html,
        "<p class=\"disclaimer\">This analysis is informational and does not constitute a VA \
         rating decision. Combined ratings use the VA combined ratings formula; compensation \
         figures are 2025 veteran-only monthly rates.</p>"
    )?;
    writeln!(html, "</div></body></html>")?;

    Ok(html)
}

fn write_header(html: &mut String, analysis: &ClaimsAnalysis, veteran: &VeteranInfo) -> fmt::Result {
    let analysis_date = analysis
        .metadata
        .as_ref()
        .map(|m| m.analysis_date.as_str())
        .unwrap_or_default();

    writeln!(html, "<header><div class=\"container\">")?;
    writeln!(html, "<h1>VA Senior Rater Claims Analysis</h1>")?;
    writeln!(html, "<p>Veteran: {}</p>", escape_html(&veteran.name))?;
    writeln!(html, "<p>Report ID: {}</p>", escape_html(&veteran.report_id))?;
    writeln!(html, "<p>Source file: {}</p>", escape_html(&veteran.filename))?;
    writeln!(html, "<p>Analysis date: {}</p>", escape_html(analysis_date))?;
    writeln!(html, "</div></header>")
}

fn write_summary(html: &mut String, analysis: &ClaimsAnalysis) -> fmt::Result {
    let summary = &analysis.executive_summary;
    let metrics = [
        (format!("{}%", summary.current_combined_rating), "Current combined rating"),
        (format!("{}%", summary.potential_combined_rating), "Potential combined rating"),
        (format_dollars(summary.current_monthly_compensation), "Current monthly"),
        (format_dollars(summary.potential_monthly_compensation), "Potential monthly"),
        (format_dollars(summary.monthly_increase_potential), "Monthly increase"),
        (format_dollars(summary.annual_increase_potential), "Annual increase"),
    ];

    writeln!(html, "<section><h2>Executive Summary</h2><div class=\"metrics\">")?;
    for (value, label) in metrics {
        writeln!(
            html,
            "<div class=\"metric\"><div class=\"value\">{value}</div><div class=\"label\">{label}</div></div>"
        )?;
    }
    writeln!(html, "</div>")?;

    writeln!(
        html,
        "<p>{} conditions analyzed, {} high-priority opportunities.</p>",
        summary.total_conditions_analyzed, summary.high_priority_opportunities
    )?;
    write_list(html, "Key findings", &summary.key_findings)?;
    writeln!(html, "</section>")
}

fn write_conditions(html: &mut String, analysis: &ClaimsAnalysis) -> fmt::Result {
    let conditions = &analysis.current_service_connected_conditions;
    if conditions.is_empty() {
        return Ok(());
    }

    writeln!(html, "<section><h2>Current Service-Connected Conditions</h2><table>")?;
    writeln!(
        html,
        "<thead><tr><th>Condition</th><th>DC</th><th>Current</th><th>Potential</th>\
         <th>Evidence</th><th>Increase probability</th><th>Action</th><th>Timeline</th></tr></thead><tbody>"
    )?;
    for condition in conditions {
        writeln!(
            html,
            "<tr><td><strong>{}</strong><br><small>{}</small></td><td>{}</td><td>{}</td><td>{}</td>\
             <td class=\"{}\">{}<br><small>{}</small></td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&condition.condition_name),
            escape_html(&condition.cfr_citation),
            escape_html(&condition.diagnostic_code),
            percent(condition.current_rating),
            percent(condition.potential_rating),
            strength_class(&condition.evidence_strength),
            escape_html(&condition.evidence_strength),
            escape_html(&condition.supporting_evidence),
            strength_class(&condition.probability_increase),
            escape_html(&condition.probability_increase),
            escape_html(&condition.action_required),
            escape_html(&condition.timeline),
        )?;
    }
    writeln!(html, "</tbody></table></section>")
}

fn write_opportunities(html: &mut String, analysis: &ClaimsAnalysis) -> fmt::Result {
    let opportunities = &analysis.missed_claiming_opportunities;
    if opportunities.is_empty() {
        return Ok(());
    }

    writeln!(html, "<section><h2>Missed Claiming Opportunities</h2><table>")?;
    writeln!(
        html,
        "<thead><tr><th>Condition</th><th>Connection</th><th>Potential</th><th>Nexus</th>\
         <th>Strategy</th><th>Evidence needed</th><th>Success</th></tr></thead><tbody>"
    )?;
    for opportunity in opportunities {
        let connection = if opportunity.primary_condition.is_empty() {
            escape_html(&opportunity.connection_type)
        } else {
            format!(
                "{} to {}",
                escape_html(&opportunity.connection_type),
                escape_html(&opportunity.primary_condition)
            )
        };
        writeln!(
            html,
            "<tr><td><strong>{}</strong><br><small>DC {} &middot; {}</small></td><td>{}</td><td>{}</td>\
             <td class=\"{}\">{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>",
            escape_html(&opportunity.condition_name),
            escape_html(&opportunity.diagnostic_code),
            escape_html(&opportunity.cfr_citation),
            connection,
            percent(opportunity.potential_rating),
            strength_class(&opportunity.nexus_strength),
            escape_html(&opportunity.nexus_strength),
            escape_html(&opportunity.recommended_strategy),
            escape_html(&opportunity.evidence_needed),
            strength_class(&opportunity.success_probability),
            escape_html(&opportunity.success_probability),
        )?;
    }
    writeln!(html, "</tbody></table></section>")
}

fn write_scenarios(html: &mut String, analysis: &ClaimsAnalysis) -> fmt::Result {
    let scenarios = &analysis.combined_rating_scenarios;
    if scenarios.iter().next().is_none() {
        return Ok(());
    }

    writeln!(html, "<section><h2>Combined Rating Scenarios</h2><table>")?;
    writeln!(
        html,
        "<thead><tr><th>Scenario</th><th>Individual ratings</th><th>Combined</th><th>Monthly</th></tr></thead><tbody>"
    )?;
    for (label, scenario) in scenarios.iter() {
        let ratings: Vec<String> = scenario
            .individual_ratings
            .iter()
            .map(|r| format!("{r}%"))
            .collect();
        writeln!(
            html,
            "<tr><td>{label}</td><td>{}</td><td>{}%</td><td>{}</td></tr>",
            ratings.join(", "),
            scenario.combined_rating,
            format_dollars(scenario.monthly_compensation),
        )?;
    }
    writeln!(html, "</tbody></table>")?;

    if let Some(current) = &scenarios.current_calculation {
        let steps = combination_steps(&current.individual_ratings);
        if !steps.is_empty() {
            writeln!(html, "<h3>How the current rating combines</h3><ol>")?;
            for step in steps {
                writeln!(
                    html,
                    "<li>Apply {}% &rarr; {:.1}% combined</li>",
                    step.rating, step.running_total
                )?;
            }
            writeln!(
                html,
                "</ol><p>Rounded to the nearest 10%: <strong>{}%</strong></p>",
                current.combined_rating
            )?;
        }
    }

    if let Some(tdiu) = &scenarios.tdiu_potential {
        writeln!(html, "<p><strong>TDIU potential:</strong> {}</p>", escape_html(tdiu))?;
    }
    writeln!(html, "</section>")
}

fn write_smc(html: &mut String, analysis: &ClaimsAnalysis) -> fmt::Result {
    let Some(smc) = &analysis.special_monthly_compensation else {
        return Ok(());
    };

    writeln!(html, "<section><h2>Special Monthly Compensation</h2>")?;
    writeln!(
        html,
        "<p><strong>Eligible:</strong> {} &middot; <strong>Type:</strong> {} &middot; \
         <strong>Additional monthly:</strong> {}</p>",
        escape_html(&smc.eligible),
        escape_html(&smc.smc_type),
        format_dollars(smc.additional_monthly),
    )?;
    writeln!(html, "<p>{}</p></section>", escape_html(&smc.requirements_met))
}

fn write_action_plan(html: &mut String, analysis: &ClaimsAnalysis) -> fmt::Result {
    let plan = &analysis.strategic_action_plan;
    if plan.is_empty() {
        return Ok(());
    }

    writeln!(html, "<section><h2>Strategic Action Plan</h2>")?;
    for (title, actions) in [
        ("Immediate actions", &plan.immediate_actions),
        ("Short-term actions", &plan.short_term_actions),
        ("Long-term actions", &plan.long_term_actions),
    ] {
        if actions.is_empty() {
            continue;
        }
        writeln!(html, "<h3>{title}</h3><ul>")?;
        for action in actions {
            write_action(html, action)?;
        }
        writeln!(html, "</ul>")?;
    }
    writeln!(html, "</section>")
}

fn write_action(html: &mut String, action: &ActionItem) -> fmt::Result {
    let when = action
        .deadline
        .as_deref()
        .or(action.timeline.as_deref())
        .unwrap_or_default();

    write!(
        html,
        "<li><span class=\"{}\">[{}]</span> {}",
        strength_class(&action.priority),
        escape_html(&action.priority),
        escape_html(&action.action),
    )?;
    if !when.is_empty() {
        write!(html, " <em>({})</em>", escape_html(when))?;
    }
    if !action.impact.is_empty() {
        write!(html, "<br><small>Impact: {}</small>", escape_html(&action.impact))?;
    }
    writeln!(html, "</li>")
}

fn write_evidence_gaps(html: &mut String, analysis: &ClaimsAnalysis) -> fmt::Result {
    let gaps = &analysis.evidence_gaps_analysis;
    let lists = [
        ("Critical missing evidence", &gaps.critical_missing_evidence),
        ("Medical opinions needed", &gaps.medical_opinions_needed),
        ("Lay statements recommended", &gaps.lay_statements_recommended),
        ("Additional testing suggested", &gaps.additional_testing_suggested),
        ("Contradictory evidence", &gaps.contradictory_evidence),
    ];
    if lists.iter().all(|(_, items)| items.is_empty())
        && gaps.evidence_development_priority.is_empty()
    {
        return Ok(());
    }

    writeln!(html, "<section><h2>Evidence Gaps</h2>")?;
    for (title, items) in lists {
        write_list(html, title, items)?;
    }
    if !gaps.evidence_development_priority.is_empty() {
        writeln!(
            html,
            "<p><strong>Development priority:</strong> {}</p>",
            escape_html(&gaps.evidence_development_priority)
        )?;
    }
    writeln!(html, "</section>")
}

fn write_record_excerpt(html: &mut String, medical_text: &str) -> fmt::Result {
    let excerpt: String = medical_text.chars().take(RECORD_EXCERPT_CHARS).collect();
    let truncated = medical_text.chars().nth(RECORD_EXCERPT_CHARS).is_some();

    writeln!(html, "<section><h2>Records Reviewed (excerpt)</h2>")?;
    writeln!(
        html,
        "<pre>{}{}</pre></section>",
        escape_html(&excerpt),
        if truncated { "\n…" } else { "" }
    )
}

fn write_list(html: &mut String, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(html, "<h3>{title}</h3><ul>")?;
    for item in items {
        writeln!(html, "<li>{}</li>", escape_html(item))?;
    }
    writeln!(html, "</ul>")
}

fn percent(rating: Option<i32>) -> String {
    rating.map(|r| format!("{r}%")).unwrap_or_else(|| "&mdash;".to_string())
}
