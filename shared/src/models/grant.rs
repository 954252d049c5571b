//! Unlock Grant Model

use serde::{Deserialize, Serialize};

/// Time-bounded contact-visibility grant, keyed by (member, target).
///
/// Created only as a side effect of spending an unlock credit. Never
/// deleted on expiry; reads filter on `expires_at` instead (lazy
/// expiry). At most one row exists per (member, target) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UnlockGrant {
    /// Owning member (who spent the credit)
    pub member_id: i64,
    /// Member whose contact details become visible
    pub target_id: i64,
    /// Creation time, unix millis
    pub unlocked_at: i64,
    /// Inactive from this instant on, unix millis
    pub expires_at: i64,
}

impl UnlockGrant {
    /// Active iff `now < expires_at`
    pub fn is_active(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_activity_window() {
        let hour = 3_600_000;
        let grant = UnlockGrant {
            member_id: 1,
            target_id: 2,
            unlocked_at: 0,
            expires_at: 24 * hour,
        };
        assert!(grant.is_active(hour)); // +1h
        assert!(!grant.is_active(25 * hour)); // +25h
        assert!(!grant.is_active(24 * hour)); // boundary is exclusive
    }
}
