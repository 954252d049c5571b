//! Shared types for the Nexo Hub membership server
//!
//! Domain models and small pure helpers used by the server (and by API
//! consumers via the wire shapes). No I/O lives here; the visibility
//! policy in particular is a pure function so it can be tested without
//! a database.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::visibility::{VisibilityLevel, decide_visibility};
