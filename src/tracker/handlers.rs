use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use super::ingest::{record_click, ClickOutcome, Hit};
use crate::geo::{ip, CountryResolver};
use crate::storage::ClickStore;

pub struct TrackerState {
    pub store: Arc<dyn ClickStore>,
    pub resolver: Arc<dyn CountryResolver>,
    pub redirect_url: String,
}

/// The tracking link itself: record the hit in the background, redirect
/// immediately. The 302 goes out no matter what ingestion does.
pub async fn track_and_redirect(
    State(state): State<Arc<TrackerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let ip_address = ip::normalize(&ip::client_ip(&headers, addr));
    let user_agent = header_or(&headers, header::USER_AGENT, "unknown");
    let referer = header_or(&headers, header::REFERER, "direct");

    let hit = Hit {
        ip_address,
        user_agent,
        referer,
    };

    let store = Arc::clone(&state.store);
    let resolver = Arc::clone(&state.resolver);
    tokio::spawn(async move {
        match record_click(store.as_ref(), resolver.as_ref(), hit.clone()).await {
            Ok(ClickOutcome::New { id }) => {
                info!(id, ip = %hit.ip_address, "new click recorded");
            }
            Ok(ClickOutcome::Repeat { id }) => {
                info!(id, ip = %hit.ip_address, "repeat click counted");
            }
            Err(err) => {
                warn!(ip = %hit.ip_address, error = %err, "failed to record click");
            }
        }
    });

    // 302 like the original, not axum's 303/307/308 helpers.
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.redirect_url.clone())],
    )
        .into_response()
}

fn header_or(headers: &HeaderMap, name: header::HeaderName, fallback: &str) -> String {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
