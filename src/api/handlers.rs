use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::admin::csp;
use crate::models::{ClickRecord, ClickStats};
use crate::storage::ClickStore;

pub struct ApiState {
    pub store: Arc<dyn ClickStore>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Upper bound on /api/clicks responses.
pub const RECENT_CLICKS_LIMIT: i64 = 100;

/// Most recent clicks, newest first.
pub async fn list_clicks(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ClickRecord>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.list_recent(RECENT_CLICKS_LIMIT).await {
        Ok(records) => Ok(Json(records)),
        Err(err) => {
            error!(error = %err, "failed to read clicks");
            Err(internal_error())
        }
    }
}

/// Aggregate statistics over the whole table.
pub async fn advanced_stats(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ClickStats>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.stats().await {
        Ok(stats) => Ok(Json(stats)),
        Err(err) => {
            error!(error = %err, "failed to compute stats");
            Err(internal_error())
        }
    }
}

fn internal_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal server error".to_string(),
        }),
    )
}

/// Unauthenticated landing page with links to the tracking link and panel.
pub async fn landing_page() -> Response {
    let nonce = csp::generate_nonce();
    let html = format!(
        r#"<!DOCTYPE html>
<html><head><title>Link Tracker</title>
<style nonce="{nonce}">
    body{{font-family:Arial;text-align:center;padding:50px;background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);color:#fff}}
    a{{display:inline-block;margin:10px;padding:10px 20px;background:rgba(255,255,255,0.2);color:#fff;text-decoration:none;border-radius:5px}}
</style>
</head>
<body>
    <h1>Link Tracker</h1>
    <p>Server up and running</p>
    <div>
        <a href="/">Try the tracking link</a>
        <a href="/admin">Open the admin panel</a>
    </div>
</body></html>
"#
    );

    (
        [(
            header::CONTENT_SECURITY_POLICY,
            csp::csp_header_value(&nonce),
        )],
        Html(html),
    )
        .into_response()
}
