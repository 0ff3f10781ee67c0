use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::repository::{CallContext, SeaRepository};
use crate::services::SessionService;
use crate::utils::SharedRng;

/// Shared application state available to all request handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub sessions: Arc<SessionService>,
    /// Parent of every request's cancellation token.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire the session service over `SeaORM` using the configured rules and seed.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let repo = Arc::new(SeaRepository::new(db.clone()));
        let random = Arc::new(SharedRng::new(config.rng_seed));
        let sessions = SessionService::new(repo, random, config.balance.clone())
            .with_code_attempts(config.code_attempts);

        Self {
            db,
            config,
            sessions: Arc::new(sessions),
            shutdown: CancellationToken::new(),
        }
    }

    /// Tie request cancellation to a process-wide shutdown token.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Fresh call context bounded by the configured operation timeout.
    #[must_use]
    pub fn call_context(&self) -> CallContext {
        CallContext::new(self.config.operation_timeout, self.shutdown.child_token())
    }
}
