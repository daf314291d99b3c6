//! `fil serve` -- HTTP front for the translator.
//!
//! Exposes the translator over `axum` + `tokio`. Translation itself is
//! synchronous and runs on the blocking pool.
//!
//! Endpoints:
//! - GET  /              - Landing page with the sample program
//! - GET  /health        - Server status
//! - GET  /sample        - Sample program as plain text
//! - GET|POST /render    - Generated Python (or diagnostic) as plain text
//! - GET|POST /translate - Generated Python as a `script.py` download
//! - POST /parse         - Typed AST as JSON
//!
//! `/render` and `/translate` take the source in the `fil` query or form
//! field. A failed translation is not an HTTP error: the diagnostic text is
//! returned in place of the script.

mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use fil_codegen::GenerateOptions;
use fil_core::ParseOptions;
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_health, handle_index, handle_not_found, handle_parse, handle_render_form,
    handle_render_query, handle_sample, handle_translate_form, handle_translate_query,
};
use self::middleware::log_requests;
use self::state::AppState;

/// Default maximum source size: 1 MB.
const DEFAULT_MAX_SOURCE_SIZE: usize = 1024 * 1024;

/// Request bodies may carry form encoding overhead on top of the source.
const BODY_LIMIT_FACTOR: usize = 4;

/// File name offered for the generated script.
pub(crate) const DOWNLOAD_FILENAME: &str = "script.py";

/// Media type of the generated script.
pub(crate) const SCRIPT_CONTENT_TYPE: &str = "text/x-python; charset=utf-8";

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Build the router. Split from [`start_server`] so the route table can be
/// inspected without binding a socket.
fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let body_limit = state.max_source_size.saturating_mul(BODY_LIMIT_FACTOR);

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/sample", get(handle_sample))
        .route(
            "/render",
            get(handle_render_query).post(handle_render_form),
        )
        .route(
            "/translate",
            get(handle_translate_query).post(handle_translate_form),
        )
        .route("/parse", post(handle_parse))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn(log_requests))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Start the HTTP server on the given port.
///
/// The source size limit comes from `max_source_size`, then the
/// `FIL_MAX_SOURCE_SIZE` env var, then [`DEFAULT_MAX_SOURCE_SIZE`].
pub async fn start_server(
    port: u16,
    max_source_size: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_source_size = max_source_size
        .or_else(|| {
            std::env::var("FIL_MAX_SOURCE_SIZE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
        })
        .unwrap_or(DEFAULT_MAX_SOURCE_SIZE);
    tracing::info!(max_source_size, "source size limit");

    let state = Arc::new(AppState {
        max_source_size,
        parse_options: ParseOptions::default(),
        generate_options: GenerateOptions::default(),
    });

    let app = router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("FIL translator listening on http://{}", addr);
    eprintln!("FIL translator listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    eprintln!("\nReceived shutdown signal...");
}
