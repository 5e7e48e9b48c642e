pub mod health;
pub mod ratings;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        .route("/test", get(health::system_status_handler))
        // WorkDrive webhooks
        .route("/process-va-records", post(webhook::handle_process_records))
        .route("/webhook-test", post(webhook::handle_webhook_test))
        .route("/analyze-sample", post(webhook::handle_analyze_sample))
        // Rating calculator
        .route("/api/v1/ratings/combine", post(ratings::handle_combine))
        .route("/api/v1/ratings/compare", post(ratings::handle_compare))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{fake_state, MemoryStore};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let (state, _) = fake_state(Some("PTSD 70%"), MemoryStore::default(), false);
        build_router(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_active() {
        for uri in ["/", "/health"] {
            let (status, body) = send(app(), get_request(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "active");
            assert_eq!(body["ai_backend"], "Fake");
        }
    }

    #[tokio::test]
    async fn test_system_status_flags_placeholders() {
        let (status, body) = send(app(), get_request("/test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["services"]["anthropic"], "configured");
        assert_eq!(body["services"]["zoho"], "needs_setup");
        assert_eq!(body["services"]["workdrive"], "needs_setup");
        assert_eq!(body["features"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_process_records_runs_pipeline() {
        let payload = json!({
            "webhook_event": "file_uploaded",
            "name": "jane-smith_jane@example.com.pdf",
            "type": "pdf",
            "id": "abcdef123456",
            "download_url": "https://workdrive.test/download/abcdef123456"
        });
        let (status, body) =
            send(app(), post_json("/process-va-records", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["veteran_name"], "Jane Smith");
        assert_eq!(body["webhook_event"], "file_uploaded");
        assert_eq!(body["file_processed"], "jane-smith_jane@example.com.pdf");
        assert_eq!(body["current_rating"], 70);
        assert_eq!(body["potential_rating"], 90);
        assert_eq!(body["email_sent"], true);
        assert_eq!(body["crm_updated"], true);
    }

    #[tokio::test]
    async fn test_process_records_rejects_malformed_json() {
        let (status, body) = send(app(), post_json("/process-va-records", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_webhook_test_inspects_without_processing() {
        let (state, fakes) = fake_state(None, MemoryStore::default(), false);
        let payload = json!({
            "webhook_event": "file_uploaded",
            "name": "records.txt",
            "event_by_user_email_id": "vet@example.com"
        });
        let (status, body) = send(
            build_router(state),
            post_json("/webhook-test", payload.to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["webhook_received"], true);
        assert_eq!(body["file_info"]["name"], "records.txt");
        assert_eq!(body["file_info"]["id"], "unknown");
        assert_eq!(body["user_info"]["email"], "vet@example.com");
        assert_eq!(body["payload_analysis"]["download_url_present"], false);
        assert_eq!(body["system_ready"]["claude_configured"], true);
        assert!(fakes.analyzer.texts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_sample() {
        let (status, body) = send(app(), post_json("/analyze-sample", Body::empty())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["veteran_name"], "James Grant");
        assert_eq!(body["analysis_summary"]["current_rating"], 70);
        assert_eq!(body["analysis_summary"]["monthly_increase"], 525);
    }

    #[tokio::test]
    async fn test_combine_endpoint() {
        let (status, body) = send(
            app(),
            post_json("/api/v1/ratings/combine", json!({"ratings": [10, 50, 30]}).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["combined_rating"], 70);
        assert_eq!(body["monthly_compensation"], 1716);
        let steps = body["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["rating"], 50);
    }

    #[tokio::test]
    async fn test_compare_endpoint() {
        let request = json!({"current": [60], "potential": [100]});
        let (status, body) = send(
            app(),
            post_json("/api/v1/ratings/compare", request.to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_combined_rating"], 60);
        assert_eq!(body["potential_combined_rating"], 100);
        assert_eq!(body["current_monthly"], 1361);
        assert_eq!(body["potential_monthly"], 3737);
        assert_eq!(body["monthly_increase"], 2376);
        assert_eq!(body["annual_increase"], 28512);
    }

    #[tokio::test]
    async fn test_combine_rejects_missing_ratings() {
        let (status, body) = send(
            app(),
            post_json("/api/v1/ratings/combine", json!({"values": [10]}).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
