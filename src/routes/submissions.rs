use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::extractor::AdminAccess;
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::parser;
use crate::submission::pipeline::{self, PipelineError};

pub async fn submit_form(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, Response> {
    let raw_data = parser::parse(&headers, body)
        .await
        .map_err(|e| AppError::BadRequest(e).into_response())?;

    match pipeline::run(&state, &headers, addr.ip(), raw_data).await {
        // Spam gets the same answer as a real submission.
        Ok(_) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Form submitted successfully",
            })),
        )
            .into_response()),
        Err(PipelineError::Invalid(err)) => Err(AppError::Validation(err).into_response()),
        Err(err @ PipelineError::RateLimited(retry_after)) => Err((
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
            Json(json!({
                "success": false,
                "error": err.to_string(),
            })),
        )
            .into_response()),
        Err(PipelineError::Store(err)) => {
            tracing::error!("Error processing form submission: {err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to process form submission",
                })),
            )
                .into_response())
        }
    }
}

pub async fn get_submissions(
    admin: AdminAccess,
    State(state): State<SharedState>,
) -> Response {
    match state.store.read_all().await {
        Ok(submissions) => {
            tracing::debug!(
                count = submissions.len(),
                admin = admin.username.as_deref().unwrap_or("-"),
                "Submissions listed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "submissions": submissions,
                })),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!("Error retrieving submissions: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to retrieve submissions",
                })),
            )
                .into_response()
        }
    }
}
