//! Member directory projection
//!
//! Builds the per-viewer directory: every member row is reduced to a
//! [`DirectoryEntry`] whose contact fields are present or absent
//! according to the visibility policy. The policy itself is the pure
//! [`decide_visibility`] function; this module gathers its inputs
//! (grants, shared meetings) and applies it.

use std::collections::HashSet;

use serde::Serialize;
use shared::models::{Member, Role, VisibilityLevel, decide_visibility};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::{grant as grant_repo, meeting as meeting_repo, member as member_repo};
use crate::utils::AppResult;

/// One directory row, shaped for the viewer
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub id: i64,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub visibility: VisibilityLevel,
    /// Contact fields, only populated at Full visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Viewer could unlock this entry by spending a credit
    pub unlockable: bool,
    /// Viewer needs a pro upgrade before unlocking is possible
    pub upgrade_required: bool,
    /// Viewer and this member attended a meeting together
    pub met_in_meeting: bool,
}

/// Inputs the visibility decision needs, precomputed once per request
struct ViewerContext {
    viewer_id: i64,
    viewer_role: Role,
    unlocked_targets: HashSet<i64>,
    people_met: HashSet<i64>,
}

impl ViewerContext {
    async fn load(pool: &SqlitePool, viewer: &CurrentUser) -> AppResult<Self> {
        let unlocked_targets: HashSet<i64> = if viewer.role == Role::Pro {
            grant_repo::list_active_targets(pool, viewer.id, now_millis())
                .await?
                .into_iter()
                .collect()
        } else {
            HashSet::new()
        };

        let mut people_met = HashSet::new();
        for meeting in meeting_repo::find_all(pool).await? {
            if meeting.participants.contains(&viewer.id) {
                people_met.extend(meeting.participants);
            }
        }
        people_met.remove(&viewer.id);

        Ok(Self {
            viewer_id: viewer.id,
            viewer_role: viewer.role,
            unlocked_targets,
            people_met,
        })
    }

    fn entry_for(&self, member: Member) -> DirectoryEntry {
        let is_self = member.id == self.viewer_id;
        let met = self.people_met.contains(&member.id);
        let visibility = decide_visibility(
            self.viewer_role,
            is_self,
            self.unlocked_targets.contains(&member.id),
            met,
        );
        let full = visibility == VisibilityLevel::Full;
        let locked = !full;

        DirectoryEntry {
            id: member.id,
            name: member.name,
            role: member.role,
            company: member.company,
            position: member.position,
            visibility,
            email: if full { Some(member.email) } else { None },
            phone: if full { member.phone } else { None },
            description: if full { member.description } else { None },
            unlockable: locked && self.viewer_role == Role::Pro,
            upgrade_required: locked && self.viewer_role == Role::Basic,
            met_in_meeting: met,
        }
    }
}

/// Full directory for the viewer, optionally filtered by a search term
/// (case-insensitive substring over name, company and position)
pub async fn build_directory(
    pool: &SqlitePool,
    viewer: &CurrentUser,
    search: Option<&str>,
) -> AppResult<Vec<DirectoryEntry>> {
    let ctx = ViewerContext::load(pool, viewer).await?;
    let members = member_repo::find_all(pool).await?;

    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

    let entries = members
        .into_iter()
        .filter(|m| match &needle {
            None => true,
            Some(n) => matches_search(m, n),
        })
        .map(|m| ctx.entry_for(m))
        .collect();
    Ok(entries)
}

/// One member, shaped for the viewer
pub async fn build_entry(
    pool: &SqlitePool,
    viewer: &CurrentUser,
    member: Member,
) -> AppResult<DirectoryEntry> {
    let ctx = ViewerContext::load(pool, viewer).await?;
    Ok(ctx.entry_for(member))
}

fn matches_search(member: &Member, needle: &str) -> bool {
    let hit = |field: &str| field.to_lowercase().contains(needle);
    hit(&member.name)
        || member.company.as_deref().is_some_and(hit)
        || member.position.as_deref().is_some_and(hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, name: &str, role: &str) -> Member {
        Member {
            id,
            name: name.into(),
            email: format!("m{id}@example.com"),
            password_hash: None,
            role: role.into(),
            company: Some("Acme".into()),
            position: Some("Engineer".into()),
            phone: Some("555-0101".into()),
            description: None,
            quota_period: None,
            quota_used: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn ctx(viewer_id: i64, role: Role) -> ViewerContext {
        ViewerContext {
            viewer_id,
            viewer_role: role,
            unlocked_targets: HashSet::new(),
            people_met: HashSet::new(),
        }
    }

    #[test]
    fn test_locked_entry_hides_contact_fields() {
        let entry = ctx(1, Role::Basic).entry_for(member(2, "Ana", "basic"));
        assert_eq!(entry.visibility, VisibilityLevel::Locked);
        assert!(entry.email.is_none());
        assert!(entry.phone.is_none());
        assert!(!entry.unlockable);
        assert!(entry.upgrade_required);
    }

    #[test]
    fn test_self_entry_is_full() {
        let entry = ctx(2, Role::Basic).entry_for(member(2, "Ana", "basic"));
        assert_eq!(entry.visibility, VisibilityLevel::Full);
        assert_eq!(entry.email.as_deref(), Some("m2@example.com"));
        assert!(!entry.unlockable);
        assert!(!entry.upgrade_required);
    }

    #[test]
    fn test_pro_with_grant_sees_contact() {
        let mut c = ctx(1, Role::Pro);
        c.unlocked_targets.insert(2);
        let entry = c.entry_for(member(2, "Ana", "basic"));
        assert_eq!(entry.visibility, VisibilityLevel::Full);
        assert!(entry.phone.is_some());
    }

    #[test]
    fn test_pro_without_grant_is_unlockable() {
        let entry = ctx(1, Role::Pro).entry_for(member(2, "Ana", "basic"));
        assert_eq!(entry.visibility, VisibilityLevel::Locked);
        assert!(entry.unlockable);
        assert!(!entry.upgrade_required);
    }

    #[test]
    fn test_shared_meeting_overrides_lock() {
        let mut c = ctx(1, Role::Basic);
        c.people_met.insert(2);
        let entry = c.entry_for(member(2, "Ana", "basic"));
        assert_eq!(entry.visibility, VisibilityLevel::Full);
        assert!(entry.met_in_meeting);
    }

    #[test]
    fn test_search_matches_name_company_position() {
        let m = member(2, "Ana Gomez", "basic");
        assert!(matches_search(&m, "gomez"));
        assert!(matches_search(&m, "acme"));
        assert!(matches_search(&m, "engineer"));
        assert!(!matches_search(&m, "zurich"));
    }
}
