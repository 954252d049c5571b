//! Auth endpoints: register, login, me, logout

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::models::{Member, MemberCreate, Role};
use validator::Validate;

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::member as member_repo;
use crate::services::MemberEvent;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub member: Member,
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AppResponse<AuthResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    if member_repo::find_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let member = member_repo::create(
        &state.pool,
        MemberCreate {
            name: payload.name,
            email: payload.email,
            company: payload.company,
            position: payload.position,
            phone: payload.phone,
        },
        Role::Basic.as_str(),
        Some(hash),
    )
    .await?;

    state.broadcast_member(MemberEvent::created(member.clone()));
    tracing::info!(member_id = member.id, "Member registered");

    let token = state
        .jwt_service
        .generate_token(member.id, &member.email, &member.name, member.role())
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(ok(AuthResponse { token, member }))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<AuthResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let member = member_repo::find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let stored_hash = member
        .password_hash
        .as_deref()
        .ok_or_else(AppError::invalid_credentials)?;
    if !verify_password(&payload.password, stored_hash)? {
        tracing::info!(member_id = member.id, "Login failed: bad password");
        return Err(AppError::invalid_credentials());
    }

    if member.role().is_disabled() {
        tracing::info!(member_id = member.id, "Login rejected: account disabled");
        return Err(AppError::AccountDisabled);
    }

    let token = state
        .jwt_service
        .generate_token(member.id, &member.email, &member.name, member.role())
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(member_id = member.id, "Member logged in");
    Ok(ok(AuthResponse { token, member }))
}

pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Member>>> {
    let member = member_repo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::MemberNotFound(user.id))?;
    Ok(ok(member))
}

/// Tokens are stateless; logout exists so clients have a uniform
/// endpoint to call when clearing their local session.
pub async fn logout(
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<()>>> {
    tracing::info!(member_id = user.id, "Member logged out");
    Ok(ok_with_message((), "Logged out"))
}
