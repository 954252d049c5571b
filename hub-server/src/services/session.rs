//! Session gate
//!
//! Disabling a member must take effect immediately, not at token
//! expiry. The gate keeps the set of disabled member ids in memory;
//! the auth middleware consults it on every request. It is seeded from
//! the database at startup and kept current from the member watch.

use dashmap::DashMap;
use sqlx::SqlitePool;

use super::watch::{MemberEvent, MemberEventKind};
use crate::db::repository::member as member_repo;
use crate::utils::AppResult;

#[derive(Debug, Default)]
pub struct SessionGate {
    disabled: DashMap<i64, ()>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the disabled set from the database (startup)
    pub async fn seed(&self, pool: &SqlitePool) -> AppResult<()> {
        let ids = member_repo::list_disabled_ids(pool).await?;
        for id in &ids {
            self.disabled.insert(*id, ());
        }
        if !ids.is_empty() {
            tracing::info!(count = ids.len(), "Seeded session gate with disabled accounts");
        }
        Ok(())
    }

    pub fn is_revoked(&self, member_id: i64) -> bool {
        self.disabled.contains_key(&member_id)
    }

    /// React to a member change event
    pub fn apply(&self, event: &MemberEvent) {
        match event.kind {
            MemberEventKind::Deleted => {
                self.disabled.remove(&event.member_id);
            }
            MemberEventKind::Created | MemberEventKind::Updated => {
                let is_disabled = event
                    .member
                    .as_ref()
                    .map(|m| m.role().is_disabled())
                    .unwrap_or(false);
                if is_disabled {
                    if self.disabled.insert(event.member_id, ()).is_none() {
                        tracing::info!(member_id = event.member_id, "Account disabled, sessions revoked");
                    }
                } else {
                    self.disabled.remove(&event.member_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Member;

    fn member_with_role(id: i64, role: &str) -> Member {
        Member {
            id,
            name: "T".into(),
            email: format!("t{id}@example.com"),
            password_hash: None,
            role: role.into(),
            company: None,
            position: None,
            phone: None,
            description: None,
            quota_period: None,
            quota_used: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_disable_then_reenable() {
        let gate = SessionGate::new();
        assert!(!gate.is_revoked(1));

        gate.apply(&MemberEvent::updated(member_with_role(1, "disabled")));
        assert!(gate.is_revoked(1));

        gate.apply(&MemberEvent::updated(member_with_role(1, "pro")));
        assert!(!gate.is_revoked(1));
    }

    #[test]
    fn test_deletion_clears_gate_entry() {
        let gate = SessionGate::new();
        gate.apply(&MemberEvent::updated(member_with_role(2, "disabled")));
        assert!(gate.is_revoked(2));
        gate.apply(&MemberEvent::deleted(2));
        assert!(!gate.is_revoked(2));
    }
}
