//! HTTP API gateway for Persona.
//!
//! Exposes the agent chat endpoint and a health check:
//!
//! - `POST /api/agent/chat` — Send a message with a role, get the reply
//!   and the thread id to continue the conversation
//! - `GET  /api/health`     — Service health and timestamp
//!
//! Built on Axum. The gateway owns transport concerns only — request
//! parsing, response serialization, status mapping, CORS — and calls the
//! orchestrator's single `generate` operation for everything else.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use persona_agent::{DynamicAgent, GenerationRequest};
use persona_core::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: DynamicAgent,
    /// Name reported by the health endpoint
    pub service_name: String,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied: permissive CORS (any origin, matching the original
/// service surface), a 1 MB body limit, and HTTP trace logging.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/agent/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    host: &str,
    port: u16,
    state: SharedState,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    #[serde(default)]
    message: String,

    #[serde(default)]
    role: String,

    #[serde(default)]
    thread_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    response: String,
    thread_id: String,
    config: RoleConfig,
}

#[derive(Serialize)]
struct RoleConfig {
    role: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(role = %payload.role, "agent/chat request");

    let role = payload.role.clone();
    let result = state
        .agent
        .generate(GenerationRequest {
            message: payload.message,
            role: payload.role,
            thread_id: payload.thread_id,
        })
        .await;

    match result {
        Ok(result) => Ok(Json(ChatResponse {
            response: result.text,
            thread_id: result.thread_id.to_string(),
            config: RoleConfig { role },
        })),
        Err(e @ Error::InvalidInput(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid request".into(),
                message: e.to_string(),
            }),
        )),
        Err(e) => {
            error!(error = %e, "Chat generation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate response".into(),
                    message: e.to_string(),
                }),
            ))
        }
    }
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: state.service_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use persona_core::error::{ProviderError, ServiceError};
    use persona_core::service::{GenerationService, ServiceCall, ServiceReply};
    use tower::ServiceExt;

    struct MockService {
        reply: String,
    }

    #[async_trait]
    impl GenerationService for MockService {
        async fn generate(&self, call: ServiceCall) -> Result<ServiceReply, ServiceError> {
            // Echo the thread id into the reply so tests can see routing.
            Ok(ServiceReply {
                text: format!("{} [{}]", self.reply, call.thread_id),
            })
        }
    }

    struct FailingService;

    #[async_trait]
    impl GenerationService for FailingService {
        async fn generate(&self, _call: ServiceCall) -> Result<ServiceReply, ServiceError> {
            Err(ServiceError::Provider(ProviderError::Network(
                "upstream unreachable".into(),
            )))
        }
    }

    fn test_app(service: Arc<dyn GenerationService>) -> Router {
        build_router(Arc::new(GatewayState {
            agent: DynamicAgent::new(service),
            service_name: "persona-agent".into(),
        }))
    }

    fn chat_request(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/agent/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = test_app(Arc::new(MockService { reply: "hi".into() }));

        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "persona-agent");
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }

    #[tokio::test]
    async fn chat_returns_envelope_with_thread_and_role() {
        let app = test_app(Arc::new(MockService {
            reply: "Arr!".into(),
        }));

        let response = app
            .oneshot(chat_request(&serde_json::json!({
                "message": "Hello",
                "role": "pirate"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["response"].as_str().unwrap().starts_with("Arr!"));
        assert!(!body["threadId"].as_str().unwrap().is_empty());
        assert_eq!(body["config"]["role"], "pirate");
    }

    #[tokio::test]
    async fn supplied_thread_id_is_echoed_back() {
        let app = test_app(Arc::new(MockService { reply: "ok".into() }));

        let response = app
            .oneshot(chat_request(&serde_json::json!({
                "message": "continue",
                "role": "pirate",
                "threadId": "abc123"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["threadId"], "abc123");
        // The mock embeds the routed thread id in its reply.
        assert_eq!(body["response"], "ok [abc123]");
    }

    #[tokio::test]
    async fn empty_message_maps_to_bad_request() {
        let app = test_app(Arc::new(MockService { reply: "no".into() }));

        let response = app
            .oneshot(chat_request(&serde_json::json!({
                "message": "",
                "role": "pirate"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid request");
        assert!(body["message"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_internal_error() {
        let app = test_app(Arc::new(FailingService));

        let response = app
            .oneshot(chat_request(&serde_json::json!({
                "message": "Hello",
                "role": "pirate"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to generate response");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("upstream unreachable")
        );
    }

    #[tokio::test]
    async fn missing_role_defaults_to_empty_string() {
        let app = test_app(Arc::new(MockService { reply: "hi".into() }));

        let response = app
            .oneshot(chat_request(&serde_json::json!({ "message": "Hello" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["config"]["role"], "");
    }
}
