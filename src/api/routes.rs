use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::admin::{self, AdminState};
use crate::config::Config;
use crate::geo::CountryResolver;
use crate::storage::ClickStore;
use crate::tracker::handlers::track_and_redirect;
use crate::tracker::TrackerState;

use super::handlers::{advanced_stats, landing_page, list_clicks, ApiState};
use super::static_files::{serve_static, StaticState};

/// Assemble the whole HTTP surface: tracking link, JSON API, admin panel,
/// landing page, and the static fallback.
pub fn create_router(
    store: Arc<dyn ClickStore>,
    resolver: Arc<dyn CountryResolver>,
    config: &Config,
) -> Router {
    let tracker_state = Arc::new(TrackerState {
        store: Arc::clone(&store),
        resolver,
        redirect_url: config.redirect_url.clone(),
    });
    let api_state = Arc::new(ApiState { store });
    let admin_state = Arc::new(AdminState {
        username: config.admin.username.clone(),
        password: config.admin.password.clone(),
        static_dir: config.static_dir.clone(),
    });
    let static_state = Arc::new(StaticState {
        static_dir: config.static_dir.clone(),
    });

    let tracker = Router::new()
        .route("/", get(track_and_redirect))
        .with_state(tracker_state);

    let api = Router::new()
        .route("/api/clicks", get(list_clicks))
        .route("/api/advanced-stats", get(advanced_stats))
        .route("/api/stats", get(advanced_stats))
        .layer(CorsLayer::permissive())
        .with_state(api_state);

    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_panel))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&admin_state),
            admin::basic_auth,
        ))
        .with_state(admin_state);

    // Static serving doubles as the 404 handler for unmatched routes.
    let static_files = Router::new()
        .fallback(serve_static)
        .with_state(static_state);

    Router::new()
        .merge(tracker)
        .merge(api)
        .merge(admin_routes)
        .route("/inicio", get(landing_page))
        .merge(static_files)
}
