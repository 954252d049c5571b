//! Unlock Grant Repository
//!
//! Grants are never deleted on expiry; reads filter on `expires_at`
//! (lazy expiry). The per-member grant count is bounded by cumulative
//! credits ever granted, so a full scan of the member's namespace is
//! fine.

use super::RepoResult;
use shared::models::UnlockGrant;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find(
    executor: impl SqliteExecutor<'_>,
    member_id: i64,
    target_id: i64,
) -> RepoResult<Option<UnlockGrant>> {
    let row = sqlx::query_as::<_, UnlockGrant>(
        "SELECT member_id, target_id, unlocked_at, expires_at FROM unlock_grant WHERE member_id = ? AND target_id = ?",
    )
    .bind(member_id)
    .bind(target_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Target ids with a currently active grant for this member
pub async fn list_active_targets(
    executor: impl SqliteExecutor<'_>,
    member_id: i64,
    now: i64,
) -> RepoResult<Vec<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT target_id FROM unlock_grant WHERE member_id = ? AND expires_at > ?",
    )
    .bind(member_id)
    .bind(now)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Create or overwrite the single grant row for (member, target)
pub async fn upsert(
    executor: impl SqliteExecutor<'_>,
    member_id: i64,
    target_id: i64,
    unlocked_at: i64,
    expires_at: i64,
) -> RepoResult<UnlockGrant> {
    sqlx::query(
        "INSERT INTO unlock_grant (member_id, target_id, unlocked_at, expires_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(member_id, target_id) DO UPDATE SET unlocked_at = excluded.unlocked_at, expires_at = excluded.expires_at",
    )
    .bind(member_id)
    .bind(target_id)
    .bind(unlocked_at)
    .bind(expires_at)
    .execute(executor)
    .await?;
    Ok(UnlockGrant {
        member_id,
        target_id,
        unlocked_at,
        expires_at,
    })
}

/// Extend an existing grant without touching `unlocked_at`
pub async fn refresh_expiry(
    pool: &SqlitePool,
    member_id: i64,
    target_id: i64,
    expires_at: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE unlock_grant SET expires_at = ?1 WHERE member_id = ?2 AND target_id = ?3",
    )
    .bind(expires_at)
    .bind(member_id)
    .bind(target_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
