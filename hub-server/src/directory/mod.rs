//! Per-viewer member directory

pub mod view;

pub use view::{DirectoryEntry, build_directory, build_entry};
