//! Announcement Model

use serde::{Deserialize, Serialize};

/// Announcement entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Announcement {
    pub id: i64,
    pub text: String,
    pub is_pinned: bool,
    pub author: String,
    /// Publication time, unix millis
    pub date: i64,
}

/// Create announcement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementCreate {
    pub text: String,
    #[serde(default)]
    pub is_pinned: bool,
}
