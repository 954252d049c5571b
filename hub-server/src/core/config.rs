//! Server configuration (environment-driven)

use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub http_port: u16,
    /// Working directory for the database and logs
    pub work_dir: PathBuf,
    /// `development` or `production`
    pub environment: String,
    pub jwt: JwtConfig,
    /// Unlock credits granted per calendar month
    pub monthly_credits: i64,
    /// Lifetime of an unlock grant, in hours
    pub grant_duration_hours: i64,
    /// Base URL of the generative-AI API (empty disables summarize)
    pub ai_base_url: String,
    pub ai_api_key: String,
    pub ai_model: String,
    /// Timeout for one AI request
    pub ai_timeout_ms: u64,
    /// Global per-request timeout
    pub request_timeout_ms: u64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string());
        let work_dir = PathBuf::from(work_dir);
        std::fs::create_dir_all(&work_dir)
            .map_err(|e| AppError::internal(format!("Cannot create work dir: {e}")))?;

        let monthly_credits = env_parse("MONTHLY_UNLOCK_CREDITS", 5_i64);
        if monthly_credits < 1 {
            return Err(AppError::internal(
                "MONTHLY_UNLOCK_CREDITS must be at least 1",
            ));
        }
        let grant_duration_hours = env_parse("GRANT_DURATION_HOURS", 24_i64);
        if grant_duration_hours < 1 {
            return Err(AppError::internal("GRANT_DURATION_HOURS must be at least 1"));
        }

        Ok(Self {
            http_port: env_parse("HTTP_PORT", 3000_u16),
            work_dir,
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            jwt: JwtConfig::default(),
            monthly_credits,
            grant_duration_hours,
            ai_base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            ai_api_key: std::env::var("AI_API_KEY").unwrap_or_default(),
            ai_model: std::env::var("AI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            ai_timeout_ms: env_parse("AI_TIMEOUT_MS", 30_000_u64),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000_u64),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.work_dir.join("hub.db")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Grant lifetime in milliseconds
    pub fn grant_duration_millis(&self) -> i64 {
        crate::utils::time::hours_to_millis(self.grant_duration_hours)
    }
}
