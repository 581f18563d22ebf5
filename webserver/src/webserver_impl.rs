//! Router assembly and the HTTP server loop

use std::any::Any;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use shared::logging;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;
use crate::web::{handlers, require_api_key};

const COMPONENT: &str = "webserver";

/// HTTP server over the text and image services
#[derive(Clone)]
pub struct WebServer {
    state: AppState,
    images_dir: PathBuf,
}

impl WebServer {
    pub fn new(state: AppState, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            state,
            images_dir: images_dir.into(),
        }
    }

    /// Build the router with every route and layer attached
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/api/v1/text-generation/generate", post(handlers::generate))
            .route("/api/v1/image-optimization/upscale", post(handlers::upscale))
            .nest_service("/images", ServeDir::new(&self.images_dir))
            .layer(middleware::from_fn_with_state(self.state.clone(), require_api_key))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CatchPanicLayer::custom(panic_response))
                    .layer(CorsLayer::permissive()),
            )
            .with_state(self.state.clone())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self, addr: SocketAddr) -> WebServerResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {addr}: {e}")))?;

        info!(address = %addr, images_dir = %self.images_dir.display(), "Web server listening");

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Server error: {e}")))
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = message, "Request handler panicked");

    WebServerError::Internal(message.to_string()).into_response()
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(COMPONENT, "Received Ctrl+C signal"),
        Err(e) => logging::log_error(COMPONENT, "Signal handling", &e),
    }
}
