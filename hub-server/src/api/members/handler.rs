//! Member directory and account management endpoints

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::models::{Member, MemberCreate, MemberUpdate, QuotaState, Role, UnlockGrant};
use validator::Validate;

use crate::auth::{CurrentUser, hash_password, require_admin};
use crate::core::ServerState;
use crate::db::repository::member as member_repo;
use crate::directory::{self, DirectoryEntry};
use crate::services::MemberEvent;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    /// Case-insensitive substring over name, company and position
    pub search: Option<String>,
}

/// GET /api/members
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DirectoryQuery>,
) -> AppResult<Json<AppResponse<Vec<DirectoryEntry>>>> {
    let entries = directory::build_directory(&state.pool, &user, query.search.as_deref()).await?;
    Ok(ok(entries))
}

/// GET /api/members/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<DirectoryEntry>>> {
    let member = member_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::MemberNotFound(id))?;
    let entry = directory::build_entry(&state.pool, &user, member).await?;
    Ok(ok(entry))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    /// Defaults to `basic`; unknown values also map to `basic`
    pub role: Option<String>,
}

/// POST /api/members (admin)
///
/// Creates a member without credentials; the member sets a password
/// through registration with the same email later.
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AdminCreateRequest>,
) -> AppResult<Json<AppResponse<Member>>> {
    require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    if member_repo::find_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let role = Role::parse(payload.role.as_deref().unwrap_or("basic"));
    let member = member_repo::create(
        &state.pool,
        MemberCreate {
            name: payload.name,
            email: payload.email,
            company: payload.company,
            position: payload.position,
            phone: payload.phone,
        },
        role.as_str(),
        None,
    )
    .await?;

    state.broadcast_member(MemberEvent::created(member.clone()));
    tracing::info!(member_id = member.id, admin_id = user.id, "Member created by admin");
    Ok(ok(member))
}

/// PUT /api/members/me
pub async fn update_me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<AppResponse<Member>>> {
    let member = member_repo::update_profile(&state.pool, user.id, payload).await?;
    state.broadcast_member(MemberEvent::updated(member.clone()));
    Ok(ok(member))
}

#[derive(Debug, Deserialize)]
pub struct RoleChangeRequest {
    pub role: String,
}

/// PUT /api/members/{id}/role (admin)
pub async fn update_role(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleChangeRequest>,
) -> AppResult<Json<AppResponse<Member>>> {
    require_admin(&user)?;

    let normalized = payload.role.trim().to_lowercase();
    if !matches!(normalized.as_str(), "basic" | "pro" | "admin" | "disabled") {
        return Err(AppError::validation(format!(
            "Unknown role: {}",
            payload.role
        )));
    }
    if id == user.id && normalized == "disabled" {
        return Err(AppError::validation("Cannot disable your own account"));
    }

    let member = member_repo::update_role(&state.pool, id, &normalized).await?;
    // The session gate picks this up and revokes or restores access.
    state.broadcast_member(MemberEvent::updated(member.clone()));
    tracing::info!(member_id = id, admin_id = user.id, role = %normalized, "Role changed");
    Ok(ok(member))
}

/// DELETE /api/members/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    require_admin(&user)?;
    if id == user.id {
        return Err(AppError::validation("Cannot delete your own account"));
    }

    if !member_repo::delete(&state.pool, id).await? {
        return Err(AppError::MemberNotFound(id));
    }
    state.broadcast_member(MemberEvent::deleted(id));
    tracing::info!(member_id = id, admin_id = user.id, "Member deleted");
    Ok(ok_with_message((), "Member deleted"))
}

/// GET /api/quota
pub async fn quota(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<QuotaState>>> {
    let quota = state.quota.state(user.id).await?;
    Ok(ok(quota))
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub grant: UnlockGrant,
    pub quota: QuotaState,
    /// False when an active grant was refreshed for free
    pub charged: bool,
}

/// POST /api/members/{id}/unlock
///
/// Spends one monthly credit to reveal the target's contact details
/// for the grant window. Pro members only; admins see everything
/// already and basic members must upgrade first.
pub async fn unlock(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<UnlockResponse>>> {
    if user.role != Role::Pro {
        return Err(AppError::forbidden("Unlocking contacts requires a pro membership"));
    }

    let outcome = state.unlock.unlock_contact(user.id, id).await?;
    Ok(ok(UnlockResponse {
        grant: outcome.grant,
        quota: outcome.quota,
        charged: outcome.charged,
    }))
}
