pub mod admin;
pub mod submissions;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

/// Form submission and read-back routes. Mounted at `/` and under `/api`.
pub fn submission_routes() -> Router<SharedState> {
    Router::new()
        .route("/submit-form", post(submissions::submit_form))
        .route("/get-submissions", get(submissions::get_submissions))
}

pub fn admin_routes() -> Router<SharedState> {
    Router::new()
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
}
