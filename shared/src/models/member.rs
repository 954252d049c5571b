//! Member Model

use serde::{Deserialize, Serialize};

/// Membership tier / role.
///
/// Role values are free-form strings at the storage boundary; they are
/// normalized (trim + lowercase) here, and anything unrecognized reads
/// as `Basic`. The legacy `socio7x7` value from early data therefore
/// lands on `Basic` as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Basic,
    Pro,
    Admin,
    Disabled,
}

impl Role {
    /// Normalize a stored role string into a role.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "pro" => Role::Pro,
            "disabled" => Role::Disabled,
            _ => Role::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Basic => "basic",
            Role::Pro => "pro",
            Role::Admin => "admin",
            Role::Disabled => "disabled",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Role::Disabled)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member entity
///
/// `role` is kept as the raw stored string; use [`Member::role`] for the
/// normalized value. Quota ledger fields (`quota_period`, `quota_used`)
/// live directly on the member row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    /// Quota period token (`"YYYY-MM"`); None until first persisted reset
    pub quota_period: Option<String>,
    /// Credits consumed in `quota_period`
    pub quota_used: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Member {
    /// Normalized role
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }
}

/// Create member payload (admin manual add; no credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
}

/// Update member profile payload (self-service fields only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_normalization() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("  Admin "), Role::Admin);
        assert_eq!(Role::parse("PRO"), Role::Pro);
        assert_eq!(Role::parse("disabled"), Role::Disabled);
        assert_eq!(Role::parse("basic"), Role::Basic);
    }

    #[test]
    fn test_unknown_roles_read_as_basic() {
        assert_eq!(Role::parse("socio7x7"), Role::Basic);
        assert_eq!(Role::parse(""), Role::Basic);
        assert_eq!(Role::parse("superuser"), Role::Basic);
    }
}
