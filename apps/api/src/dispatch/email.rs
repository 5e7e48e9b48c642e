use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::analysis::ClaimsAnalysis;
use crate::config::{is_configured, Config};
use crate::dispatch::{ensure_success, DispatchError};
use crate::report::format::{escape_html, format_dollars};
use crate::webhook::VeteranInfo;

/// Tells the veteran their report is ready.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_report(
        &self,
        veteran: &VeteranInfo,
        report_url: &str,
        analysis: &ClaimsAnalysis,
    ) -> Result<(), DispatchError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
    pub content: String,
    pub mail_format: &'static str,
}

/// Builds the notification email for a finished report.
pub fn build_message(
    from: &str,
    veteran: &VeteranInfo,
    report_url: &str,
    analysis: &ClaimsAnalysis,
) -> MailMessage {
    let summary = &analysis.executive_summary;
    let content = format!(
        "<p>Dear {name},</p>\
         <p>Your VA claims analysis (report {report_id}) is ready.</p>\
         <ul>\
         <li>Current combined rating: {current}%</li>\
         <li>Potential combined rating: {potential}%</li>\
         <li>Potential monthly increase: {monthly}</li>\
         <li>Potential annual increase: {annual}</li>\
         </ul>\
         <p><a href=\"{url}\">View your full report</a></p>",
        name = escape_html(&veteran.name),
        report_id = escape_html(&veteran.report_id),
        current = summary.current_combined_rating,
        potential = summary.potential_combined_rating,
        monthly = format_dollars(summary.monthly_increase_potential),
        annual = format_dollars(summary.annual_increase_potential),
        url = escape_html(report_url),
    );

    MailMessage {
        from_address: from.to_string(),
        to_address: veteran.email.clone(),
        subject: format!("Your VA Claims Analysis Report - {}", veteran.report_id),
        content,
        mail_format: "html",
    }
}

/// Sends through the Zoho Mail REST API.
pub struct ZohoMailNotifier {
    client: Client,
    access_token: String,
    api_base: String,
    account_id: String,
    from_address: String,
}

impl ZohoMailNotifier {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            access_token: config.zoho_access_token.clone(),
            api_base: config.zoho_mail_api_base.trim_end_matches('/').to_string(),
            account_id: config.zoho_mail_account_id.clone(),
            from_address: config.zoho_mail_from.clone(),
        }
    }
}

#[async_trait]
impl Notifier for ZohoMailNotifier {
    async fn send_report(
        &self,
        veteran: &VeteranInfo,
        report_url: &str,
        analysis: &ClaimsAnalysis,
    ) -> Result<(), DispatchError> {
        if !is_configured(&self.access_token) || !is_configured(&self.account_id) {
            return Err(DispatchError::NotConfigured("Zoho Mail"));
        }

        let message = build_message(&self.from_address, veteran, report_url, analysis);
        let url = format!("{}/accounts/{}/messages", self.api_base, self.account_id);

        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Zoho-oauthtoken {}", self.access_token),
            )
            .json(&message)
            .send()
            .await?;
        ensure_success("Zoho Mail", response).await?;

        info!("Email notification sent to: {}", veteran.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fallback::fallback_analysis;
    use chrono::Local;

    #[test]
    fn test_message_carries_figures_and_link() {
        let now = Local::now();
        let veteran = VeteranInfo::sample(now);
        let analysis = fallback_analysis(&veteran, "Claude", now);
        let message = build_message(
            "sgt@vetletters.com",
            &veteran,
            "https://files.example.com/reports/r.html",
            &analysis,
        );

        assert_eq!(message.to_address, "james.grant@example.com");
        assert!(message.subject.contains(&veteran.report_id));
        assert!(message.content.contains("$525"));
        assert!(message.content.contains("$6,300"));
        assert!(message.content.contains("https://files.example.com/reports/r.html"));
        assert_eq!(message.mail_format, "html");
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let now = Local::now();
        let veteran = VeteranInfo::sample(now);
        let message = build_message("a@b.c", &veteran, "u", &ClaimsAnalysis::default());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["fromAddress"], "a@b.c");
        assert_eq!(json["mailFormat"], "html");
    }

    #[tokio::test]
    async fn test_unconfigured_mail_is_skipped() {
        let notifier = ZohoMailNotifier::new(Client::new(), &crate::config::test_config());
        let veteran = VeteranInfo::sample(Local::now());
        let result = notifier
            .send_report(&veteran, "u", &ClaimsAnalysis::default())
            .await;
        assert!(matches!(result, Err(DispatchError::NotConfigured(_))));
    }
}
