//! Announcement Repository

use super::{RepoError, RepoResult};
use shared::models::{Announcement, AnnouncementCreate};
use sqlx::SqlitePool;

const ANNOUNCEMENT_SELECT: &str = "SELECT id, text, is_pinned, author, date FROM announcement";

/// Pinned first, then newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Announcement>> {
    let sql = format!("{} ORDER BY is_pinned DESC, date DESC", ANNOUNCEMENT_SELECT);
    let rows = sqlx::query_as::<_, Announcement>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Announcement>> {
    let sql = format!("{} WHERE id = ?", ANNOUNCEMENT_SELECT);
    let row = sqlx::query_as::<_, Announcement>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    data: AnnouncementCreate,
    author: &str,
) -> RepoResult<Announcement> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO announcement (id, text, is_pinned, author, date) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(&data.text)
    .bind(data.is_pinned)
    .bind(author)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create announcement".into()))
}

pub async fn toggle_pin(pool: &SqlitePool, id: i64) -> RepoResult<Announcement> {
    let rows = sqlx::query("UPDATE announcement SET is_pinned = NOT is_pinned WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Announcement {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Announcement {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM announcement WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM announcement")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
