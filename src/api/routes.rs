//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task::{GeneratedTask, TaskGenerator};

use super::types::*;

/// Shared application state. Immutable after startup.
pub struct AppState {
    pub generator: TaskGenerator,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate-task", post(generate_task))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let generator = TaskGenerator::from_config(&config)?;
    let addr = config.bind_addr();
    let state = Arc::new(AppState { generator });

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.generator.model().to_string(),
        api_key_configured: state.generator.has_credential(),
    })
}

/// Generate a task. Generation failures still answer 200 with the fallback task.
async fn generate_task(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GeneratedTask>, (StatusCode, Json<ErrorResponse>)> {
    let request = GenerateTaskRequest::from_body(&body).map_err(|e| {
        tracing::debug!("Rejected generate-task request: {}", e);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(e)))
    })?;

    let task = state
        .generator
        .generate(request.kind, &request.topic)
        .await;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmClient, OpenAiClient};
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Service without a credential: every generation falls back.
    async fn spawn_unconfigured() -> String {
        let state = Arc::new(AppState {
            generator: TaskGenerator::new(None, "gpt-4o-mini"),
        });
        spawn(router(state)).await
    }

    /// Service whose completion endpoint always answers with `content`.
    async fn spawn_with_model_reply(content: &'static str) -> String {
        let upstream = Router::new().route(
            "/v1/chat/completions",
            post(move || async move {
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}]
                }))
            }),
        );
        let upstream_url = format!("{}/v1/chat/completions", spawn(upstream).await);

        let client = OpenAiClient::new(
            "sk-test".to_string(),
            upstream_url,
            Duration::from_secs(5),
        )
        .unwrap();
        let state = Arc::new(AppState {
            generator: TaskGenerator::new(
                Some(Arc::new(client) as Arc<dyn LlmClient>),
                "gpt-4o-mini",
            ),
        });
        spawn(router(state)).await
    }

    async fn post_json(base: &str, body: Value) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(format!("{}/generate-task", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_missing_topic_is_bad_request() {
        let base = spawn_unconfigured().await;

        let (status, body) = post_json(&base, json!({"taskType": "writing"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing topic in request body"}));
    }

    #[tokio::test]
    async fn test_empty_body_is_bad_request() {
        let base = spawn_unconfigured().await;

        let response = reqwest::Client::new()
            .post(format!("{}/generate-task", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: ErrorResponse = response.json().await.unwrap();
        assert_eq!(body.error, "Missing topic in request body");
    }

    #[tokio::test]
    async fn test_unsupported_task_type() {
        let base = spawn_unconfigured().await;

        let (status, body) =
            post_json(&base, json!({"topic": "travel", "taskType": "essay"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Unsupported task type: essay"}));
    }

    #[tokio::test]
    async fn test_fallback_is_still_ok() {
        let base = spawn_unconfigured().await;

        let (status, body) =
            post_json(&base, json!({"topic": "travel", "taskType": "writing"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["taskTitle"], "Writing about travel");
        assert_eq!(body["difficultyLevel"], 3);
        assert_eq!(body["topic"], "travel");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("ConfigurationError: "));
    }

    #[tokio::test]
    async fn test_omitted_task_type_matches_speaking() {
        let base = spawn_unconfigured().await;

        let (_, omitted) = post_json(&base, json!({"topic": "music"})).await;
        let (_, explicit) = post_json(&base, json!({"topic": "music", "taskType": "speaking"})).await;
        assert_eq!(omitted, explicit);
        assert_eq!(omitted["taskTitle"], "Speaking about music");
    }

    #[tokio::test]
    async fn test_success_passes_model_task_through() {
        let base = spawn_with_model_reply(
            r#"{"taskTitle":"Gap Years","taskDescription":"Should students take a gap year?","suggestedPoints":["Maturity","Cost"],"difficultyLevel":3,"topic":"ignored"}"#,
        )
        .await;

        let (status, body) =
            post_json(&base, json!({"topic": "gap years", "taskType": "writing"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "taskTitle": "Gap Years",
                "taskDescription": "Should students take a gap year?",
                "suggestedPoints": ["Maturity", "Cost"],
                "difficultyLevel": 3,
                "topic": "gap years"
            })
        );
    }

    #[tokio::test]
    async fn test_non_json_model_reply_falls_back() {
        let base = spawn_with_model_reply("I cannot help with that.").await;

        let (status, body) = post_json(&base, json!({"topic": "sleep"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["taskTitle"], "Speaking about sleep");
        assert_eq!(
            body["suggestedPoints"],
            json!(["Personal experience", "Specific examples", "Your opinion"])
        );
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("JSON parsing error:"));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let base = spawn_unconfigured().await;

        let response = reqwest::Client::new()
            .post(format!("{}/generate-task", base))
            .header("Origin", "https://example.com")
            .json(&json!({"topic": "art"}))
            .send()
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_health_reports_missing_key() {
        let base = spawn_unconfigured().await;

        let body: HealthResponse = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.model, "gpt-4o-mini");
        assert!(!body.api_key_configured);
    }
}
