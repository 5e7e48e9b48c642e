use anyhow::anyhow;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::pipeline::{analyze_sample, process_upload, ProcessOutcome, SampleOutcome};
use crate::state::AppState;
use crate::webhook::{inspect, PayloadInspection, WebhookPayload};

#[derive(Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: &'static str,
    pub processing_time: String,
    #[serde(flatten)]
    pub outcome: ProcessOutcome,
}

#[derive(Serialize)]
pub struct WebhookTestResponse {
    pub webhook_received: bool,
    pub timestamp: String,
    #[serde(flatten)]
    pub inspection: PayloadInspection,
    pub system_ready: SystemReady,
}

#[derive(Serialize)]
pub struct SystemReady {
    pub claude_configured: bool,
    pub senior_rater_mode: &'static str,
}

#[derive(Serialize)]
pub struct SampleResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
    #[serde(flatten)]
    pub outcome: SampleOutcome,
}

fn parse_payload(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(WebhookPayload, Value), AppError> {
    let Json(raw) = body?;
    let payload = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::Validation(format!("Invalid webhook payload: {e}")))?;
    Ok((payload, raw))
}

/// POST /process-va-records
/// Runs the whole upload pipeline for one WorkDrive notification.
pub async fn handle_process_records(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProcessResponse>, AppError> {
    let (payload, _) = parse_payload(body)?;
    let outcome = process_upload(&state, &payload)
        .await
        .map_err(|e| AppError::Internal(anyhow!("report rendering failed: {e}")))?;

    Ok(Json(ProcessResponse {
        success: true,
        message: "Senior Rater analysis completed successfully",
        processing_time: Local::now().to_rfc3339(),
        outcome,
    }))
}

/// POST /webhook-test
pub async fn handle_webhook_test(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<WebhookTestResponse>, AppError> {
    let (payload, raw) = parse_payload(body)?;
    Ok(Json(WebhookTestResponse {
        webhook_received: true,
        timestamp: Local::now().to_rfc3339(),
        inspection: inspect(&payload, &raw),
        system_ready: SystemReady {
            claude_configured: state.config.anthropic_configured(),
            senior_rater_mode: "active",
        },
    }))
}

/// POST /analyze-sample
pub async fn handle_analyze_sample(
    State(state): State<AppState>,
) -> Result<Json<SampleResponse>, AppError> {
    let outcome = analyze_sample(&state)
        .await
        .map_err(|e| AppError::Internal(anyhow!("report rendering failed: {e}")))?;

    Ok(Json(SampleResponse {
        success: true,
        message: "Sample analysis completed",
        timestamp: Local::now().to_rfc3339(),
        outcome,
    }))
}
