use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use crate::analysis::ClaimsAnalysis;
use crate::config::{is_configured, Config};
use crate::dispatch::{ensure_success, DispatchError};
use crate::webhook::VeteranInfo;

/// Records the finished analysis against the veteran's CRM contact.
#[async_trait]
pub trait CrmClient: Send + Sync {
    async fn record_analysis(
        &self,
        veteran: &VeteranInfo,
        analysis: &ClaimsAnalysis,
        report_url: &str,
    ) -> Result<(), DispatchError>;
}

/// Upsert body keyed on `Email`, so repeat uploads update the same contact.
pub fn build_upsert(veteran: &VeteranInfo, analysis: &ClaimsAnalysis, report_url: &str) -> Value {
    let summary = &analysis.executive_summary;
    let conditions = analysis.current_service_connected_conditions.len();
    let opportunities = analysis.missed_claiming_opportunities.len();

    json!({
        "data": [{
            "Last_Name": veteran.name,
            "Email": veteran.email,
            "Description": format!(
                "Senior rater analysis {}: {} current conditions reviewed, {} new claim opportunities.",
                veteran.report_id, conditions, opportunities
            ),
            "Combined_Rating": summary.current_combined_rating,
            "Potential_Rating": summary.potential_combined_rating,
            "Monthly_Increase": summary.monthly_increase_potential,
            "Report_URL": report_url,
        }],
        "duplicate_check_fields": ["Email"],
    })
}

/// `<api_base>/<module>/upsert`, the Zoho CRM v2 insert-or-update endpoint.
pub fn upsert_url(api_base: &str, module: &str) -> String {
    format!("{}/{}/upsert", api_base.trim_end_matches('/'), module)
}

/// Zoho CRM v2 REST API.
pub struct ZohoCrmClient {
    client: Client,
    access_token: String,
    api_base: String,
    module: String,
}

impl ZohoCrmClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            access_token: config.zoho_access_token.clone(),
            api_base: config.zoho_crm_api_base.trim_end_matches('/').to_string(),
            module: config.zoho_crm_module.clone(),
        }
    }
}

#[async_trait]
impl CrmClient for ZohoCrmClient {
    async fn record_analysis(
        &self,
        veteran: &VeteranInfo,
        analysis: &ClaimsAnalysis,
        report_url: &str,
    ) -> Result<(), DispatchError> {
        if !is_configured(&self.access_token) {
            return Err(DispatchError::NotConfigured("Zoho CRM"));
        }

        let url = upsert_url(&self.api_base, &self.module);
        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Zoho-oauthtoken {}", self.access_token),
            )
            .json(&build_upsert(veteran, analysis, report_url))
            .send()
            .await?;
        ensure_success("Zoho CRM", response).await?;

        info!(
            "CRM updated for {}: {} conditions reviewed",
            veteran.name,
            analysis.current_service_connected_conditions.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fallback::fallback_analysis;
    use chrono::Local;

    #[test]
    fn test_upsert_body() {
        let now = Local::now();
        let veteran = VeteranInfo::sample(now);
        let analysis = fallback_analysis(&veteran, "Claude", now);
        let body = build_upsert(&veteran, &analysis, "https://r");

        let record = &body["data"][0];
        assert_eq!(record["Email"], "james.grant@example.com");
        assert_eq!(record["Combined_Rating"], 70);
        assert_eq!(record["Potential_Rating"], 90);
        assert_eq!(record["Monthly_Increase"], 525);
        assert_eq!(record["Report_URL"], "https://r");
        assert_eq!(body["duplicate_check_fields"][0], "Email");
    }

    #[test]
    fn test_upsert_url() {
        assert_eq!(
            upsert_url("https://www.zohoapis.com/crm/v2/", "Contacts"),
            "https://www.zohoapis.com/crm/v2/Contacts/upsert"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_crm_is_skipped() {
        let crm = ZohoCrmClient::new(Client::new(), &crate::config::test_config());
        let veteran = VeteranInfo::sample(Local::now());
        let result = crm
            .record_analysis(&veteran, &ClaimsAnalysis::default(), "u")
            .await;
        assert!(matches!(result, Err(DispatchError::NotConfigured(_))));
    }
}
