//! Authentication middleware
//!
//! Validates the bearer token, rejects revoked (disabled) accounts and
//! injects [`CurrentUser`] into request extensions for the handlers.

use axum::extract::{Request, State};
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;

use super::jwt::{CurrentUser, JwtError};
use crate::core::ServerState;
use crate::utils::AppError;

/// Paths reachable without a token
fn is_public_path(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    if !path.starts_with("/api") {
        return true;
    }
    matches!(
        path,
        "/api/auth/login" | "/api/auth/register" | "/api/health"
    )
}

pub async fn require_auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_path(request.method(), request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token =
        crate::auth::JwtService::extract_from_header(header_value).ok_or(AppError::Unauthorized)?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| match e {
        JwtError::ExpiredToken => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })?;

    let user = CurrentUser::try_from(claims).map_err(|_| AppError::InvalidToken)?;

    // Token may predate a role change; the gate tracks live state.
    if state.session_gate.is_revoked(user.id) {
        tracing::info!(member_id = user.id, "Rejected request from disabled account");
        return Err(AppError::AccountDisabled);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Guard for admin-only handlers; call at the top of the handler body
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Admin role required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path(&Method::POST, "/api/auth/login"));
        assert!(is_public_path(&Method::POST, "/api/auth/register"));
        assert!(is_public_path(&Method::GET, "/api/health"));
        assert!(is_public_path(&Method::OPTIONS, "/api/members"));
        assert!(is_public_path(&Method::GET, "/favicon.ico"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public_path(&Method::GET, "/api/members"));
        assert!(!is_public_path(&Method::POST, "/api/members/1/unlock"));
        assert!(!is_public_path(&Method::GET, "/api/quota"));
        assert!(!is_public_path(&Method::POST, "/api/auth/logout"));
    }
}
