use std::net::IpAddr;

use axum::http::HeaderMap;
use serde_json::Value;

use crate::models::Submission;
use crate::state::SharedState;
use crate::store::StoreError;

use super::client_ip;
use super::honeypot;
use super::validator::{self, ValidationError};

pub enum PipelineOutcome {
    Stored(Submission),
    /// Honeypot tripped. Nothing was written.
    Spam,
}

#[derive(Debug)]
pub enum PipelineError {
    RateLimited(u64),
    Invalid(ValidationError),
    Store(StoreError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::RateLimited(secs) => {
                write!(f, "Too many submissions. Retry after {secs}s")
            }
            PipelineError::Invalid(err) => write!(f, "{err}"),
            PipelineError::Store(err) => write!(f, "{err}"),
        }
    }
}

pub async fn run(
    state: &SharedState,
    headers: &HeaderMap,
    peer: IpAddr,
    raw_data: Value,
) -> Result<PipelineOutcome, PipelineError> {
    let ip = client_ip::resolve(headers, peer, &state.config.trusted_proxies);

    state
        .submission_limiter
        .check(ip)
        .map_err(PipelineError::RateLimited)?;

    if honeypot::is_spam(&raw_data, state.config.honeypot_field.as_deref()) {
        tracing::info!(%ip, "Honeypot field filled, discarding submission");
        return Ok(PipelineOutcome::Spam);
    }

    let validated = if state.config.strict_validation {
        validator::validate_strict(&raw_data)
    } else {
        validator::validate(&raw_data)
    }
    .map_err(PipelineError::Invalid)?;

    let submission = state
        .store
        .append(validated)
        .await
        .map_err(PipelineError::Store)?;

    tracing::info!(
        email = %submission.email,
        company = %submission.company_name,
        timestamp = %submission.timestamp,
        "Form submission saved"
    );

    Ok(PipelineOutcome::Stored(submission))
}
