//! Nexo Hub - membership community server
//!
//! # Architecture overview
//!
//! - **Auth** (`auth`): JWT + Argon2 authentication, role gate
//! - **Database** (`db`): embedded SQLite storage (sqlx, WAL)
//! - **Services** (`services`): quota ledger, unlock grants, member
//!   watch, session gate, AI notes analyzer
//! - **Directory** (`directory`): visibility-policy-redacted member views
//! - **HTTP API** (`api`): RESTful surface
//!
//! # Module layout
//!
//! ```text
//! hub-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, passwords, middleware
//! ├── db/            # pool + repositories
//! ├── services/      # quota / unlock / watch / session / AI
//! ├── directory/     # visibility view assembly
//! ├── api/           # routes and handlers
//! └── utils/         # errors, logging, time helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod directory;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare process environment: dotenv, work dir, logging.
pub fn setup_environment() -> std::io::Result<()> {
    let _ = dotenv::dotenv();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    _   __
   / | / /__  _  ______
  /  |/ / _ \| |/_/ __ \
 / /|  /  __/>  </ /_/ /
/_/ |_/\___/_/|_|\____/
    __  __      __
   / / / /_  __/ /_
  / /_/ / / / / __ \
 / __  / /_/ / /_/ /
/_/ /_/\__,_/_.___/
    "#
    );
}
