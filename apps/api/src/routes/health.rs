use axum::{extract::State, Json};
use chrono::Local;
use serde_json::{json, Value};

use crate::state::AppState;

const SERVICE: &str = "VA Claims Analysis System";

const FEATURES: [&str; 8] = [
    "Senior VA Rater Analysis Mode",
    "Comprehensive Medical Record Review",
    "CFR Part 4 Compliance",
    "Combined Rating Calculations",
    "Benefit-of-the-Doubt Application",
    "Responsive HTML Reports",
    "Evidence Gap Analysis",
    "Strategic Action Planning",
];

fn service_status(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "needs_setup"
    }
}

/// GET / and GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "active",
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "ai_backend": state.analyzer.backend(),
        "timestamp": Local::now().to_rfc3339(),
    }))
}

/// GET /test
/// Reports which integrations still hold placeholder credentials.
pub async fn system_status_handler(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "System operational",
        "timestamp": Local::now().to_rfc3339(),
        "services": {
            "anthropic": service_status(config.anthropic_configured()),
            "zoho": service_status(config.zoho_configured()),
            "workdrive": service_status(config.workdrive_configured()),
            "mail": service_status(config.mail_configured()),
            "storage": service_status(config.storage_configured()),
        },
        "version": env!("CARGO_PKG_VERSION"),
        "ai_backend": state.analyzer.backend(),
        "endpoint": "/process-va-records",
        "features": FEATURES,
    }))
}
