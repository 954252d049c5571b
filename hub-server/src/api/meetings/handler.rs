//! Meeting endpoints, including the AI notes summarizer

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::models::{Meeting, MeetingCreate, MeetingUpdate};
use validator::Validate;

use crate::auth::{CurrentUser, require_admin};
use crate::core::ServerState;
use crate::db::repository::{meeting as meeting_repo, member as member_repo};
use crate::services::notes_ai;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use crate::utils::time::{parse_date, validate_time};

/// GET /api/meetings
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Meeting>>>> {
    let meetings = meeting_repo::find_all(&state.pool).await?;
    Ok(ok(meetings))
}

/// GET /api/meetings/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Meeting>>> {
    let meeting = meeting_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Meeting {id} not found")))?;
    Ok(ok(meeting))
}

fn validate_schedule(date: Option<&str>, time: Option<&str>) -> AppResult<()> {
    if let Some(date) = date {
        parse_date(date)?;
    }
    if let Some(time) = time {
        validate_time(time)?;
    }
    Ok(())
}

/// POST /api/meetings (admin)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<MeetingCreate>,
) -> AppResult<Json<AppResponse<Meeting>>> {
    require_admin(&user)?;
    if payload.title.trim().is_empty() {
        return Err(AppError::validation("Meeting title is required"));
    }
    validate_schedule(Some(&payload.date), payload.time.as_deref())?;

    let meeting = meeting_repo::create(&state.pool, payload).await?;
    tracing::info!(meeting_id = meeting.id, admin_id = user.id, "Meeting created");
    Ok(ok(meeting))
}

/// PUT /api/meetings/{id} (admin)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MeetingUpdate>,
) -> AppResult<Json<AppResponse<Meeting>>> {
    require_admin(&user)?;
    validate_schedule(payload.date.as_deref(), payload.time.as_deref())?;

    let meeting = meeting_repo::update(&state.pool, id, payload).await?;
    Ok(ok(meeting))
}

/// DELETE /api/meetings/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    require_admin(&user)?;
    if !meeting_repo::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Meeting {id} not found")));
    }
    Ok(ok_with_message((), "Meeting deleted"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SummarizeRequest {
    #[validate(length(min = 1, max = 20000))]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    /// Names as the model reported them
    pub participants: Vec<String>,
    /// Roster members matched against those names
    pub participant_ids: Vec<i64>,
}

/// POST /api/meetings/summarize (admin)
///
/// Runs raw notes through the AI analyzer and matches the reported
/// participant names against the member roster. Nothing is persisted;
/// the client reviews the result and saves it as a meeting.
pub async fn summarize(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SummarizeRequest>,
) -> AppResult<Json<AppResponse<SummarizeResponse>>> {
    require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let analysis = state.analyzer.analyze(&payload.notes).await?;
    let roster = member_repo::find_all(&state.pool).await?;
    let participant_ids = notes_ai::match_roster(&analysis.participants, &roster);

    tracing::info!(
        admin_id = user.id,
        matched = participant_ids.len(),
        reported = analysis.participants.len(),
        "Meeting notes summarized"
    );

    Ok(ok(SummarizeResponse {
        summary: analysis.summary,
        participants: analysis.participants,
        participant_ids,
    }))
}
