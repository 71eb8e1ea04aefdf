use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::{LoginRateLimiter, SubmissionRateLimiter};
use crate::store::SubmissionStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: SubmissionStore,
    pub submission_limiter: SubmissionRateLimiter,
    pub login_limiter: LoginRateLimiter,
}
