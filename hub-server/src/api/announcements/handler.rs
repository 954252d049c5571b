//! Announcement endpoints

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::models::{Announcement, AnnouncementCreate};

use crate::auth::{CurrentUser, require_admin};
use crate::core::ServerState;
use crate::db::repository::announcement as announcement_repo;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/announcements (pinned first, then newest first)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Announcement>>>> {
    let announcements = announcement_repo::find_all(&state.pool).await?;
    Ok(ok(announcements))
}

/// POST /api/announcements (admin)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AnnouncementCreate>,
) -> AppResult<Json<AppResponse<Announcement>>> {
    require_admin(&user)?;
    if payload.text.trim().is_empty() {
        return Err(AppError::validation("Announcement text is required"));
    }

    let announcement = announcement_repo::create(&state.pool, payload, &user.name).await?;
    tracing::info!(announcement_id = announcement.id, admin_id = user.id, "Announcement posted");
    Ok(ok(announcement))
}

/// PUT /api/announcements/{id}/pin (admin, toggles)
pub async fn toggle_pin(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Announcement>>> {
    require_admin(&user)?;
    let announcement = announcement_repo::toggle_pin(&state.pool, id).await?;
    Ok(ok(announcement))
}

/// DELETE /api/announcements/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    require_admin(&user)?;
    if !announcement_repo::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Announcement {id} not found")));
    }
    Ok(ok_with_message((), "Announcement deleted"))
}
