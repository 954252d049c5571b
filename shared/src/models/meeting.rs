//! Meeting Model

use serde::{Deserialize, Serialize};

/// Meeting record with participant tracking.
///
/// `participants` holds member ids as soft references; nothing ties
/// them to live member rows at write time. The set drives the
/// shared-meeting visibility override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    /// Calendar date (`YYYY-MM-DD`)
    pub date: String,
    /// Optional clock time (`HH:MM`)
    pub time: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub participants: Vec<i64>,
    pub created_at: i64,
}

/// Create meeting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCreate {
    pub title: String,
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub participants: Vec<i64>,
}

/// Update meeting payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub participants: Option<Vec<i64>>,
}
