mod analysis;
mod config;
mod dispatch;
mod documents;
mod errors;
mod llm_client;
mod pipeline;
mod rating;
mod report;
mod routes;
mod state;
mod webhook;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::LlmClaimsAnalyzer;
use crate::config::Config;
use crate::dispatch::{S3ReportStore, ZohoCrmClient, ZohoMailNotifier};
use crate::documents::WorkDriveFetcher;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails on a missing ANTHROPIC_API_KEY; everything else has a placeholder default
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VA Claims API v{}", env!("CARGO_PKG_VERSION"));

    let missing = config.missing_required();
    if !missing.is_empty() {
        warn!("Missing environment variables: {}", missing.join(", "));
        warn!("Some features may not work properly");
    }

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.claude_model.clone())
        .context("failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let fetcher = WorkDriveFetcher::new(config.zoho_access_token.clone())
        .context("failed to build WorkDrive client")?;

    // Mail and CRM share one connection pool
    let http = reqwest::Client::new();

    let state = AppState {
        config: config.clone(),
        fetcher: Arc::new(fetcher),
        analyzer: Arc::new(LlmClaimsAnalyzer::new(llm)),
        store: Arc::new(S3ReportStore::new(
            s3,
            config.s3_bucket.clone(),
            config.s3_public_base_url.clone(),
        )),
        notifier: Arc::new(ZohoMailNotifier::new(http.clone(), &config)),
        crm: Arc::new(ZohoCrmClient::new(http, &config)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "claims-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
