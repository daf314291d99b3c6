//! HTTP route handlers: landing page, health, render, translate, parse.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::state::AppState;
use super::{json_error, DOWNLOAD_FILENAME, SCRIPT_CONTENT_TYPE};
use crate::SAMPLE_PROGRAM;

/// `fil` field carried in the query string or a form body.
#[derive(Debug, Deserialize)]
pub(crate) struct FilParams {
    fil: Option<String>,
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "fil_version": fil_core::FIL_VERSION,
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /sample
pub(crate) async fn handle_sample() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        SAMPLE_PROGRAM,
    )
}

/// GET /
pub(crate) async fn handle_index() -> impl IntoResponse {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>FIL to Python</title></head>
<body>
<h1>FIL to Python</h1>
<form method="post" action="/render">
<textarea name="fil" rows="10" cols="80">{sample}</textarea>
<p>
<button type="submit">Show Python</button>
<button type="submit" formaction="/translate">Download {file}</button>
</p>
</form>
</body>
</html>
"#,
        sample = escape_html(SAMPLE_PROGRAM),
        file = DOWNLOAD_FILENAME,
    ))
}

/// GET /render?fil=...
pub(crate) async fn handle_render_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilParams>,
) -> Response {
    render(state, params).await
}

/// POST /render (form body)
pub(crate) async fn handle_render_form(
    State(state): State<Arc<AppState>>,
    Form(params): Form<FilParams>,
) -> Response {
    render(state, params).await
}

/// GET /translate?fil=...
pub(crate) async fn handle_translate_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilParams>,
) -> Response {
    download(state, params).await
}

/// POST /translate (form body)
pub(crate) async fn handle_translate_form(
    State(state): State<Arc<AppState>>,
    Form(params): Form<FilParams>,
) -> Response {
    download(state, params).await
}

/// POST /parse with `{"source": "..."}`
pub(crate) async fn handle_parse(
    State(state): State<Arc<AppState>>,
    Json(parsed): Json<serde_json::Value>,
) -> Response {
    let source = match parsed.get("source").and_then(|v| v.as_str()) {
        Some(s) => s.to_string(),
        None => {
            return json_error(StatusCode::BAD_REQUEST, "missing 'source' field").into_response()
        }
    };
    if let Err(msg) = state.check_source(&source) {
        tracing::warn!(reason = msg, "rejected parse request");
        return json_error(StatusCode::BAD_REQUEST, msg).into_response();
    }

    let options = state.parse_options;
    let result =
        tokio::task::spawn_blocking(move || fil_core::parse_program_with(&source, &options)).await;

    match result {
        Ok(Ok(program)) => (StatusCode::OK, Json(program)).into_response(),
        Ok(Err(e)) => {
            let err_response = serde_json::json!({
                "error": e.to_string(),
                "details": e.to_json_value(),
            });
            (StatusCode::BAD_REQUEST, Json(err_response)).into_response()
        }
        Err(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("failed to parse: {}", e),
        )
        .into_response(),
    }
}

async fn render(state: Arc<AppState>, params: FilParams) -> Response {
    match run_translation(state, params).await {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        Err(response) => response,
    }
}

async fn download(state: Arc<AppState>, params: FilParams) -> Response {
    match run_translation(state, params).await {
        Ok(text) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, SCRIPT_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
                ),
            ],
            text,
        )
            .into_response(),
        Err(response) => response,
    }
}

/// Validate the request and translate on the blocking pool. A failed
/// translation still yields `Ok` carrying the diagnostic text.
async fn run_translation(state: Arc<AppState>, params: FilParams) -> Result<String, Response> {
    let Some(source) = params.fil else {
        return Err(
            json_error(StatusCode::BAD_REQUEST, "missing 'fil' parameter").into_response(),
        );
    };
    if let Err(msg) = state.check_source(&source) {
        tracing::warn!(reason = msg, "rejected translation request");
        return Err(json_error(StatusCode::BAD_REQUEST, msg).into_response());
    }

    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        fil_codegen::translate(
            &source,
            &worker_state.parse_options,
            &worker_state.generate_options,
        )
    })
    .await;

    match result {
        Ok(Ok(text)) => {
            tracing::info!(bytes = text.len(), "translated");
            Ok(text)
        }
        Ok(Err(e)) => {
            tracing::info!(error = %e, "translation failed");
            Ok(e.to_string())
        }
        Err(e) => Err(json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("failed to translate: {}", e),
        )
        .into_response()),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
