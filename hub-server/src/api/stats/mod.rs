//! Dashboard stats
//!
//! Community-wide counts plus the viewer's personal figures. Sections
//! degrade independently: a failing count logs a warning and reports as
//! absent instead of failing the whole dashboard.

use std::collections::HashSet;

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{announcement as announcement_repo, meeting as meeting_repo, member as member_repo};
use crate::utils::time::is_upcoming;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meetings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_meetings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcements: Option<i64>,
    /// Viewer's unlock credits left this month
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<i64>,
    /// Meetings the viewer is listed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meetings_attended: Option<i64>,
    /// Distinct other members the viewer has shared a meeting with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people_met: Option<i64>,
}

/// GET /api/stats
pub async fn get_stats(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<StatsResponse>>> {
    let members = match member_repo::count(&state.pool).await {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(error = %e, "Member count unavailable");
            None
        }
    };

    let (meetings, upcoming_meetings, meetings_attended, people_met) =
        match meeting_repo::find_all(&state.pool).await {
            Ok(all) => {
                let upcoming = all.iter().filter(|m| is_upcoming(&m.date)).count() as i64;
                let attended: Vec<_> = all
                    .iter()
                    .filter(|m| m.participants.contains(&user.id))
                    .collect();
                let met: HashSet<i64> = attended
                    .iter()
                    .flat_map(|m| m.participants.iter().copied())
                    .filter(|id| *id != user.id)
                    .collect();
                (
                    Some(all.len() as i64),
                    Some(upcoming),
                    Some(attended.len() as i64),
                    Some(met.len() as i64),
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "Meeting counts unavailable");
                (None, None, None, None)
            }
        };

    let announcements = match announcement_repo::count(&state.pool).await {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(error = %e, "Announcement count unavailable");
            None
        }
    };

    let credits_remaining = match state.quota.state(user.id).await {
        Ok(q) => Some(q.credits_remaining()),
        Err(e) => {
            tracing::warn!(error = %e, "Quota state unavailable");
            None
        }
    };

    Ok(ok(StatsResponse {
        members,
        meetings,
        upcoming_meetings,
        announcements,
        credits_remaining,
        meetings_attended,
        people_met,
    }))
}
