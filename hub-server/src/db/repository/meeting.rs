//! Meeting Repository
//!
//! `participants` is stored as a JSON array of member ids; entries are
//! soft references and are not validated against live member rows.

use super::{RepoError, RepoResult};
use shared::models::{Meeting, MeetingCreate, MeetingUpdate};
use sqlx::SqlitePool;

/// Raw row; `participants` decoded from JSON on the way out
#[derive(sqlx::FromRow)]
struct MeetingRow {
    id: i64,
    title: String,
    date: String,
    time: Option<String>,
    location: Option<String>,
    summary: Option<String>,
    participants: String,
    created_at: i64,
}

impl MeetingRow {
    fn into_meeting(self) -> Meeting {
        let participants = serde_json::from_str(&self.participants).unwrap_or_else(|e| {
            tracing::warn!(meeting_id = self.id, error = %e, "Corrupt participants JSON, treating as empty");
            Vec::new()
        });
        Meeting {
            id: self.id,
            title: self.title,
            date: self.date,
            time: self.time,
            location: self.location,
            summary: self.summary,
            participants,
            created_at: self.created_at,
        }
    }
}

const MEETING_SELECT: &str =
    "SELECT id, title, date, time, location, summary, participants, created_at FROM meeting";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Meeting>> {
    let sql = format!("{} ORDER BY date DESC, created_at DESC", MEETING_SELECT);
    let rows = sqlx::query_as::<_, MeetingRow>(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(MeetingRow::into_meeting).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Meeting>> {
    let sql = format!("{} WHERE id = ?", MEETING_SELECT);
    let row = sqlx::query_as::<_, MeetingRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MeetingRow::into_meeting))
}

pub async fn create(pool: &SqlitePool, data: MeetingCreate) -> RepoResult<Meeting> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let participants = serde_json::to_string(&data.participants)
        .map_err(|e| RepoError::Validation(format!("Invalid participants: {e}")))?;
    sqlx::query(
        "INSERT INTO meeting (id, title, date, time, location, summary, participants, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.date)
    .bind(&data.time)
    .bind(&data.location)
    .bind(&data.summary)
    .bind(&participants)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create meeting".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MeetingUpdate) -> RepoResult<Meeting> {
    let participants = match &data.participants {
        Some(p) => Some(
            serde_json::to_string(p)
                .map_err(|e| RepoError::Validation(format!("Invalid participants: {e}")))?,
        ),
        None => None,
    };
    let rows = sqlx::query(
        "UPDATE meeting SET title = COALESCE(?1, title), date = COALESCE(?2, date), time = COALESCE(?3, time), location = COALESCE(?4, location), summary = COALESCE(?5, summary), participants = COALESCE(?6, participants) WHERE id = ?7",
    )
    .bind(&data.title)
    .bind(&data.date)
    .bind(&data.time)
    .bind(&data.location)
    .bind(&data.summary)
    .bind(&participants)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Meeting {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Meeting {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM meeting WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
