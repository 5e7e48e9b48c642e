use anyhow::{Context, Result};

/// Default Claude model when `CLAUDE_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Placeholder prefix for optional credentials that were never filled in.
const PLACEHOLDER_PREFIX: &str = "your-";

/// Application configuration loaded from environment variables.
/// Fails at startup only if the Anthropic key is missing; Zoho and storage
/// settings fall back to placeholders and are reported by `/test`.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub claude_model: String,
    pub zoho_access_token: String,
    pub zoho_reports_folder_id: String,
    pub zoho_vetreports_folder_id: String,
    pub zoho_mail_from: String,
    pub zoho_mail_account_id: String,
    pub zoho_mail_api_base: String,
    pub zoho_crm_api_base: String,
    pub zoho_crm_module: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_public_base_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let s3_endpoint = var("S3_ENDPOINT", "http://localhost:9000");
        let s3_bucket = var("S3_BUCKET", "va-reports");
        let s3_public_base_url = lookup("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket));

        Ok(Config {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY")
                .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")?,
            claude_model: var("CLAUDE_MODEL", DEFAULT_MODEL),
            zoho_access_token: var("ZOHO_ACCESS_TOKEN", "your-zoho-token"),
            zoho_reports_folder_id: var("ZOHO_REPORTS_FOLDER_ID", "your-reports-folder-id"),
            zoho_vetreports_folder_id: var(
                "ZOHO_VETREPORTS_FOLDER_ID",
                "your-vetreports-folder-id",
            ),
            zoho_mail_from: var("ZOHO_MAIL_FROM", "sgt@vetletters.com"),
            zoho_mail_account_id: var("ZOHO_MAIL_ACCOUNT_ID", "your-mail-account-id"),
            zoho_mail_api_base: var("ZOHO_MAIL_API_BASE", "https://mail.zoho.com/api"),
            zoho_crm_api_base: var("ZOHO_CRM_API_BASE", "https://www.zohoapis.com/crm/v2"),
            zoho_crm_module: var("ZOHO_CRM_MODULE", "Contacts"),
            s3_bucket,
            s3_endpoint,
            s3_public_base_url,
            aws_access_key_id: var("AWS_ACCESS_KEY_ID", "your-aws-access-key"),
            aws_secret_access_key: var("AWS_SECRET_ACCESS_KEY", "your-aws-secret-key"),
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }

    /// Names of the variables the full pipeline needs that still hold placeholders.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("ANTHROPIC_API_KEY", &self.anthropic_api_key),
            ("ZOHO_ACCESS_TOKEN", &self.zoho_access_token),
            ("ZOHO_REPORTS_FOLDER_ID", &self.zoho_reports_folder_id),
        ]
        .into_iter()
        .filter(|(_, value)| !is_configured(value))
        .map(|(key, _)| key)
        .collect()
    }

    pub fn anthropic_configured(&self) -> bool {
        is_configured(&self.anthropic_api_key)
    }

    pub fn zoho_configured(&self) -> bool {
        is_configured(&self.zoho_access_token)
    }

    pub fn workdrive_configured(&self) -> bool {
        is_configured(&self.zoho_reports_folder_id)
    }

    pub fn mail_configured(&self) -> bool {
        self.zoho_configured() && is_configured(&self.zoho_mail_account_id)
    }

    pub fn storage_configured(&self) -> bool {
        is_configured(&self.aws_access_key_id) && is_configured(&self.aws_secret_access_key)
    }
}

/// A value counts as configured when it is non-empty and not a `your-…` placeholder.
pub fn is_configured(value: &str) -> bool {
    !value.trim().is_empty() && !value.starts_with(PLACEHOLDER_PREFIX)
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "ANTHROPIC_API_KEY" => Some("sk-ant-test".to_string()),
        _ => None,
    })
    .expect("test config")
}
