use crate::config::HttpServerConfig;
use crate::error::{ConceptMapError, Result};
use crate::skill::{IntentOrchestrator, RequestEnvelope};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Check if a port is available by attempting to bind to it
async fn check_port_available(addr: &str) -> bool {
    tokio::net::TcpListener::bind(addr).await.is_ok()
}

/// HTTP endpoint receiving skill request envelopes
pub struct SkillServer {
    orchestrator: Arc<IntentOrchestrator>,
    config: HttpServerConfig,
}

impl SkillServer {
    pub fn new(orchestrator: IntentOrchestrator, config: HttpServerConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            config,
        }
    }

    /// Run the HTTP server until it fails
    pub async fn run(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);

        if !check_port_available(&addr).await {
            return Err(ConceptMapError::Config(format!(
                "Port {} is already in use. Stop the other process or set http_server.port in config.toml",
                self.config.port
            )));
        }

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        log::info!("Starting Concept Map skill endpoint on http://{}", addr);
        log::info!("Skill endpoint: http://{}/skill", addr);

        axum::serve(listener, self.create_router()).await?;

        Ok(())
    }

    /// Create the router (exposed for embedding and tests)
    pub fn create_router(&self) -> Router {
        // Empty allowed_origins means no restriction (local dev).
        let cors = if self.config.allowed_origins.is_empty() {
            CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = self
                .config
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/skill", post(handle_skill))
            .route("/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
            .with_state(AppState {
                orchestrator: self.orchestrator.clone(),
            })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    orchestrator: Arc<IntentOrchestrator>,
}

/// Handle POST /skill: one request envelope in, one response envelope out
async fn handle_skill(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    let envelope: RequestEnvelope = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("Rejected malformed skill request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": format!("Invalid request envelope: {}", e)})),
            )
                .into_response();
        }
    };

    match state.orchestrator.handle(&envelope).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(ConceptMapError::InvalidIntent(name)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Invalid Intent",
                "intent": name
            })),
        )
            .into_response(),
        Err(e) => {
            log::error!("Error handling skill request {}: {}", envelope.request.request_id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Internal server error",
                    "details": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// Handle health check endpoint
async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "conceptmap",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}
