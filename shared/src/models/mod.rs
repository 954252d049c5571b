//! Data models
//!
//! Shared between hub-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod announcement;
pub mod grant;
pub mod meeting;
pub mod member;
pub mod quota;
pub mod visibility;

// Re-exports
pub use announcement::*;
pub use grant::*;
pub use meeting::*;
pub use member::*;
pub use quota::*;
pub use visibility::*;
