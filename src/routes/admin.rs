use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::auth::extractor::ACCESS_COOKIE;
use crate::auth::jwt::{encode_token, Claims, TOKEN_TTL_MINUTES};
use crate::auth::password;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn access_cookie(access_token: &str) -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(TOKEN_TTL_MINUTES))
        .build();

    CookieJar::new().add(access)
}

fn clear_access_cookie() -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access)
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let Some(admin) = state.config.admin.as_ref() else {
        return Err(AppError::NotFound("Admin login is not enabled".to_string()));
    };

    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Please enter both username and password".to_string(),
        ));
    }

    if state.login_limiter.check(&req.username).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let username_ok: bool = req
        .username
        .as_bytes()
        .ct_eq(admin.username.as_bytes())
        .into();

    // Always run the hash so a wrong username costs the same as a wrong password.
    let password_ok =
        password::verify(&req.password, &admin.password_hash).map_err(AppError::Internal)?;

    if !(username_ok && password_ok) {
        state.login_limiter.record_failure(&req.username);
        tracing::warn!(username = %req.username, "Admin login failed");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    state.login_limiter.clear(&req.username);

    let access_token =
        encode_token(&Claims::new(&admin.username), &admin.jwt_secret).map_err(AppError::Internal)?;

    tracing::info!(username = %admin.username, "Admin logged in");

    Ok((access_cookie(&access_token), Json(LoginResponse { access_token })))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_access_cookie(),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
