//! Monthly unlock quota
//!
//! The ledger lives on the member row (`quota_period`, `quota_used`)
//! and resets lazily: nothing runs at month boundaries, a stale period
//! simply reads as a fresh allowance and is rewritten on the next
//! consume. All mutations are conditional UPDATEs so concurrent
//! sessions cannot double-spend.

use shared::models::QuotaState;
use shared::util::current_period;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::member as member_repo;
use crate::utils::{AppError, AppResult};

pub struct QuotaService {
    pool: SqlitePool,
    max_credits: i64,
}

impl QuotaService {
    pub fn new(pool: SqlitePool, max_credits: i64) -> Self {
        Self { pool, max_credits }
    }

    /// Effective quota state for a member. A missing or stale period
    /// reads as an untouched allowance; no write happens here.
    pub async fn state(&self, member_id: i64) -> AppResult<QuotaState> {
        Self::read_state(&self.pool, member_id, self.max_credits).await
    }

    pub async fn read_state(
        pool: &SqlitePool,
        member_id: i64,
        max_credits: i64,
    ) -> AppResult<QuotaState> {
        let member = member_repo::find_by_id(pool, member_id)
            .await?
            .ok_or(AppError::MemberNotFound(member_id))?;

        let period = current_period();
        let used = match member.quota_period.as_deref() {
            Some(stored) if stored == period => member.quota_used,
            _ => 0,
        };
        Ok(QuotaState {
            period,
            used_count: used,
            max_credits,
        })
    }

    /// Consume one credit for the current period, resetting the window
    /// first if it is stale. Takes a bare connection so the unlock flow
    /// can run it inside its transaction.
    pub async fn consume(
        conn: &mut SqliteConnection,
        member_id: i64,
        max_credits: i64,
    ) -> AppResult<QuotaState> {
        let period = current_period();

        let member = member_repo::find_by_id(&mut *conn, member_id)
            .await?
            .ok_or(AppError::MemberNotFound(member_id))?;

        // Roll the window forward if the stored period is stale. A CAS
        // loss here means another writer already rolled it; proceed.
        if member.quota_period.as_deref() != Some(period.as_str()) {
            member_repo::reset_quota(
                &mut *conn,
                member_id,
                member.quota_period.as_deref(),
                &period,
            )
            .await?;
        }

        let rows = member_repo::consume_credit(&mut *conn, member_id, &period, max_credits).await?;
        if rows == 0 {
            // Tell exhaustion apart from a vanished member or a period
            // that moved underneath us.
            let member = member_repo::find_by_id(&mut *conn, member_id)
                .await?
                .ok_or(AppError::MemberNotFound(member_id))?;
            if member.quota_period.as_deref() == Some(period.as_str()) {
                return Err(AppError::QuotaExhausted);
            }
            // Stored period still stale: the earlier reset lost its CAS
            // to a writer on an even older period token. One more
            // reset-then-consume round settles it.
            member_repo::reset_quota(
                &mut *conn,
                member_id,
                member.quota_period.as_deref(),
                &period,
            )
            .await?;
            let rows =
                member_repo::consume_credit(&mut *conn, member_id, &period, max_credits).await?;
            if rows == 0 {
                return Err(AppError::QuotaExhausted);
            }
        }

        let member = member_repo::find_by_id(&mut *conn, member_id)
            .await?
            .ok_or(AppError::MemberNotFound(member_id))?;
        Ok(QuotaState {
            period,
            used_count: member.quota_used,
            max_credits,
        })
    }

    pub async fn consume_one(&self, member_id: i64) -> AppResult<QuotaState> {
        let mut conn = self.pool.acquire().await.map_err(AppError::from)?;
        Self::consume(&mut conn, member_id, self.max_credits).await
    }

    pub fn max_credits(&self) -> i64 {
        self.max_credits
    }
}
