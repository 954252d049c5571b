//! Contact Visibility Policy
//!
//! Pure decision function for the member directory. Given what is known
//! about the viewer and one target, decides whether the target's contact
//! details (email, phone, description) are revealed. Locked entries
//! still expose directory-level identity (name, position, company).

use serde::{Deserialize, Serialize};

use super::member::Role;

/// How much of a target's profile the viewer may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityLevel {
    /// Email, phone and description revealed
    Full,
    /// Name, position, company only
    Locked,
}

impl VisibilityLevel {
    pub fn is_full(&self) -> bool {
        matches!(self, VisibilityLevel::Full)
    }
}

/// Decide the visibility of one target for one viewer.
///
/// Evaluated top to bottom, first match wins:
/// 1. Disabled viewers see nothing elevated (their session is being
///    terminated elsewhere; this function just refuses to reveal).
/// 2. Admin sees everything. So does the member looking at themselves.
/// 3. A pro viewer holding an active unlock grant for this target.
/// 4. Shared-meeting override: viewer and target co-occur in at least
///    one meeting's participant set, any non-disabled tier.
/// 5. Everyone else is locked.
pub fn decide_visibility(
    viewer_role: Role,
    is_self: bool,
    has_active_grant: bool,
    shares_meeting: bool,
) -> VisibilityLevel {
    if viewer_role.is_disabled() {
        return VisibilityLevel::Locked;
    }
    if viewer_role.is_admin() || is_self {
        return VisibilityLevel::Full;
    }
    if viewer_role == Role::Pro && has_active_grant {
        return VisibilityLevel::Full;
    }
    if shares_meeting {
        return VisibilityLevel::Full;
    }
    VisibilityLevel::Locked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_sees_full_regardless_of_state() {
        for grant in [false, true] {
            for met in [false, true] {
                assert_eq!(
                    decide_visibility(Role::Admin, false, grant, met),
                    VisibilityLevel::Full
                );
            }
        }
    }

    #[test]
    fn test_self_is_always_full() {
        assert_eq!(
            decide_visibility(Role::Basic, true, false, false),
            VisibilityLevel::Full
        );
        assert_eq!(
            decide_visibility(Role::Pro, true, false, false),
            VisibilityLevel::Full
        );
    }

    #[test]
    fn test_pro_with_active_grant() {
        assert_eq!(
            decide_visibility(Role::Pro, false, true, false),
            VisibilityLevel::Full
        );
        assert_eq!(
            decide_visibility(Role::Pro, false, false, false),
            VisibilityLevel::Locked
        );
    }

    #[test]
    fn test_grant_does_not_elevate_basic() {
        // Grants are pro-tier currency; a demoted member keeps the rows
        // but they no longer unlock anything.
        assert_eq!(
            decide_visibility(Role::Basic, false, true, false),
            VisibilityLevel::Locked
        );
    }

    #[test]
    fn test_shared_meeting_override_applies_to_basic() {
        assert_eq!(
            decide_visibility(Role::Basic, false, false, true),
            VisibilityLevel::Full
        );
        assert_eq!(
            decide_visibility(Role::Pro, false, false, true),
            VisibilityLevel::Full
        );
    }

    #[test]
    fn test_disabled_viewer_is_always_locked() {
        for is_self in [false, true] {
            for grant in [false, true] {
                for met in [false, true] {
                    assert_eq!(
                        decide_visibility(Role::Disabled, is_self, grant, met),
                        VisibilityLevel::Locked
                    );
                }
            }
        }
    }
}
