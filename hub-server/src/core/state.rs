//! Shared server state
//!
//! One [`ServerState`] is built at startup and cloned into every
//! handler. Everything inside is `Arc`-wrapped or already cheap to
//! clone.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{MemberEvent, MemberWatch, NotesAnalyzer, QuotaService, SessionGate, UnlockService};
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub watch: Arc<MemberWatch>,
    pub session_gate: Arc<SessionGate>,
    pub quota: Arc<QuotaService>,
    pub unlock: Arc<UnlockService>,
    pub analyzer: Arc<NotesAnalyzer>,
}

impl ServerState {
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path()).await?;
        Self::with_pool(config.clone(), db.pool).await
    }

    /// Build state over an existing pool (tests use an in-memory one)
    pub async fn with_pool(config: Config, pool: SqlitePool) -> AppResult<Self> {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let watch = Arc::new(MemberWatch::new());

        let session_gate = Arc::new(SessionGate::new());
        session_gate.seed(&pool).await?;

        let quota = Arc::new(QuotaService::new(pool.clone(), config.monthly_credits));
        let unlock = Arc::new(UnlockService::new(
            pool.clone(),
            config.monthly_credits,
            config.grant_duration_millis(),
        ));
        let analyzer = Arc::new(NotesAnalyzer::new(
            &config.ai_base_url,
            &config.ai_api_key,
            &config.ai_model,
            config.ai_timeout_ms,
        ));

        let state = Self {
            config: Arc::new(config),
            pool,
            jwt_service,
            watch,
            session_gate,
            quota,
            unlock,
            analyzer,
        };
        state.start_background_tasks();
        Ok(state)
    }

    /// Spawn the watch consumer that keeps the session gate current
    fn start_background_tasks(&self) {
        let gate = self.session_gate.clone();
        let mut rx = self.watch.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => gate.apply(&event),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session gate lagged behind member events");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Publish a member change to watchers (directory clients, gate)
    pub fn broadcast_member(&self, event: MemberEvent) {
        self.watch.publish(event);
    }
}
