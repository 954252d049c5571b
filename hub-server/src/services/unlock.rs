//! Contact unlock flow
//!
//! Spending a credit and recording the grant happen in one SQLite
//! transaction, so a crash between the two cannot charge a member
//! without giving them the contact. Re-unlocking a target whose grant
//! is still active costs nothing and just pushes the expiry out.

use shared::models::{QuotaState, UnlockGrant};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::quota::QuotaService;
use crate::db::repository::{grant as grant_repo, member as member_repo};
use crate::utils::{AppError, AppResult};

/// Outcome of an unlock request
#[derive(Debug)]
pub struct UnlockOutcome {
    pub grant: UnlockGrant,
    pub quota: QuotaState,
    /// False when the grant was already active and no credit was spent
    pub charged: bool,
}

pub struct UnlockService {
    pool: SqlitePool,
    max_credits: i64,
    grant_duration_ms: i64,
}

impl UnlockService {
    pub fn new(pool: SqlitePool, max_credits: i64, grant_duration_ms: i64) -> Self {
        Self {
            pool,
            max_credits,
            grant_duration_ms,
        }
    }

    pub async fn unlock_contact(&self, member_id: i64, target_id: i64) -> AppResult<UnlockOutcome> {
        if member_id == target_id {
            return Err(AppError::validation("Cannot unlock your own contact"));
        }

        member_repo::find_by_id(&self.pool, target_id)
            .await?
            .ok_or(AppError::MemberNotFound(target_id))?;

        let now = now_millis();
        let expires_at = now + self.grant_duration_ms;

        // Active grant: free refresh, no ledger touch.
        if let Some(existing) = grant_repo::find(&self.pool, member_id, target_id).await? {
            if existing.is_active(now) {
                grant_repo::refresh_expiry(&self.pool, member_id, target_id, expires_at).await?;
                tracing::debug!(member_id, target_id, "Refreshed active unlock grant");
                let quota =
                    QuotaService::read_state(&self.pool, member_id, self.max_credits).await?;
                return Ok(UnlockOutcome {
                    grant: UnlockGrant {
                        member_id,
                        target_id,
                        unlocked_at: existing.unlocked_at,
                        expires_at,
                    },
                    quota,
                    charged: false,
                });
            }
        }

        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let quota = QuotaService::consume(&mut tx, member_id, self.max_credits).await?;
        let grant = grant_repo::upsert(&mut *tx, member_id, target_id, now, expires_at).await?;

        tx.commit().await.map_err(AppError::from)?;

        tracing::info!(
            member_id,
            target_id,
            used = quota.used_count,
            max = quota.max_credits,
            "Contact unlocked"
        );

        Ok(UnlockOutcome {
            grant,
            quota,
            charged: true,
        })
    }
}
