//! Quota Ledger State

use serde::{Deserialize, Serialize};

/// Snapshot of a member's monthly unlock-credit ledger.
///
/// Derived from the `quota_period` / `quota_used` fields on the member
/// row after the lazy reset rule has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Billing window this state belongs to (`"YYYY-MM"`)
    pub period: String,
    /// Credits consumed this period
    pub used_count: i64,
    /// Monthly allowance in effect
    pub max_credits: i64,
}

impl QuotaState {
    /// Fresh, untouched state for the given period
    pub fn zero(period: impl Into<String>, max_credits: i64) -> Self {
        Self {
            period: period.into(),
            used_count: 0,
            max_credits,
        }
    }

    /// Credits left this period, floored at 0
    pub fn credits_remaining(&self) -> i64 {
        (self.max_credits - self.used_count).max(0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used_count >= self.max_credits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits_remaining_floors_at_zero() {
        let mut q = QuotaState::zero("2024-06", 5);
        assert_eq!(q.credits_remaining(), 5);
        q.used_count = 5;
        assert_eq!(q.credits_remaining(), 0);
        assert!(q.is_exhausted());
        // Over-count from legacy data still floors at 0
        q.used_count = 7;
        assert_eq!(q.credits_remaining(), 0);
    }
}
