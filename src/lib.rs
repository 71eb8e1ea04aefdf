pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::rate_limit::{LoginRateLimiter, SubmissionRateLimiter};
use crate::state::{AppState, SharedState};
use crate::store::SubmissionStore;

pub fn build_app(config: Config) -> (Router, SharedState) {
    if config.admin.is_none() {
        tracing::warn!("Admin credentials not configured; /get-submissions is unauthenticated");
    }

    let state: SharedState = Arc::new(AppState {
        store: SubmissionStore::open(config.data_path.clone()),
        submission_limiter: SubmissionRateLimiter::new(
            config.submit_rate_limit,
            config.submit_rate_window_secs,
        ),
        login_limiter: LoginRateLimiter::new(),
        config,
    });

    let app = Router::new()
        .merge(routes::submission_routes())
        .nest("/api", routes::submission_routes())
        .merge(routes::admin_routes())
        .route("/health", axum::routing::get(health))
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
