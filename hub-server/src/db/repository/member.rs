//! Member Repository
//!
//! Holds the quota-ledger mutations as well: `reset_quota` and
//! `consume_credit` are conditional UPDATEs (compare-and-swap on the
//! period / used count) so two concurrent sessions for the same member
//! cannot double-spend or double-reset. Functions that participate in
//! the unlock transaction take any executor so they run against either
//! the pool or an open transaction.

use super::RepoResult;
use shared::models::{Member, MemberCreate, MemberUpdate};
use sqlx::{SqlitePool, SqliteExecutor};

const MEMBER_SELECT: &str = "SELECT id, name, email, password_hash, role, company, position, phone, description, quota_period, quota_used, created_at, updated_at FROM member";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Member>> {
    let sql = format!("{} ORDER BY name COLLATE NOCASE ASC", MEMBER_SELECT);
    let rows = sqlx::query_as::<_, Member>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<Member>> {
    let sql = format!("{} WHERE id = ?", MEMBER_SELECT);
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Member>> {
    let sql = format!("{} WHERE email = ? COLLATE NOCASE", MEMBER_SELECT);
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Ids of all members whose stored role reads as `disabled`
/// (session gate seed)
pub async fn list_disabled_ids(pool: &SqlitePool) -> RepoResult<Vec<i64>> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT id FROM member WHERE lower(trim(role)) = 'disabled'")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn create(
    pool: &SqlitePool,
    data: MemberCreate,
    role: &str,
    password_hash: Option<String>,
) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO member (id, name, email, password_hash, role, company, position, phone, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(role)
    .bind(&data.company)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create member".into()))
}

pub async fn update_profile(pool: &SqlitePool, id: i64, data: MemberUpdate) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET name = COALESCE(?1, name), company = COALESCE(?2, company), position = COALESCE(?3, position), phone = COALESCE(?4, phone), description = COALESCE(?5, description), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.company)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(&data.description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(super::RepoError::NotFound(format!("Member {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::NotFound(format!("Member {id} not found")))
}

pub async fn update_role(pool: &SqlitePool, id: i64, role: &str) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE member SET role = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(role)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(super::RepoError::NotFound(format!("Member {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::NotFound(format!("Member {id} not found")))
}

pub async fn set_password_hash(pool: &SqlitePool, id: i64, hash: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE member SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM member WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM member")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

// ========== Quota ledger ==========

/// CAS reset of the quota window: zero the counter and move the period
/// token forward, but only if the stored period still matches what the
/// caller observed. Concurrent resets collapse to a single winner; the
/// losers see 0 rows affected, which is fine — the row is already
/// current.
pub async fn reset_quota(
    executor: impl SqliteExecutor<'_>,
    id: i64,
    observed_period: Option<&str>,
    current_period: &str,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET quota_period = ?1, quota_used = 0, updated_at = ?2 WHERE id = ?3 AND quota_period IS ?4",
    )
    .bind(current_period)
    .bind(now)
    .bind(id)
    .bind(observed_period)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Atomic credit consumption: a single conditional UPDATE keyed on the
/// current period and the cap. 0 rows affected means either the cap is
/// reached, the period moved, or the member vanished — the caller
/// re-reads to tell which.
pub async fn consume_credit(
    executor: impl SqliteExecutor<'_>,
    id: i64,
    current_period: &str,
    max_credits: i64,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET quota_used = quota_used + 1, updated_at = ?1 WHERE id = ?2 AND quota_period = ?3 AND quota_used < ?4",
    )
    .bind(now)
    .bind(id)
    .bind(current_period)
    .bind(max_credits)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}
