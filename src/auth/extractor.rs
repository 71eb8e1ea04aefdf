use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "access_token";

/// Grants access to admin-only reads.
///
/// With no admin credentials configured the gate is open and `username` is
/// `None`. Otherwise a valid token is required, from the `Authorization`
/// header or the access cookie.
#[derive(Debug, Clone)]
pub struct AdminAccess {
    pub username: Option<String>,
}

impl FromRequestParts<SharedState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(admin) = state.config.admin.as_ref() else {
            return Ok(AdminAccess { username: None });
        };

        let token = bearer_token(parts)?.or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(ACCESS_COOKIE)
                .map(|c| c.value().to_string())
        });

        let Some(token) = token else {
            return Err(AppError::Unauthorized(
                "Missing authentication token".to_string(),
            ));
        };

        let claims = jwt::decode_token(&token, &admin.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        if claims.sub != admin.username {
            return Err(AppError::Unauthorized("Invalid or expired token".to_string()));
        }

        Ok(AdminAccess {
            username: Some(claims.sub),
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get("authorization") else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    Ok(auth_str.strip_prefix("Bearer ").map(str::to_string))
}
