use std::sync::Arc;
use std::time::Duration;

use crate::backend_client::PortfolioBackend;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable backend. Default: `HttpPortfolioBackend` against `BACKEND_UPLOAD_URL`.
    pub backend: Arc<dyn PortfolioBackend>,
    /// Page state per browser session. Each session's container is locked
    /// briefly to begin and to complete a submission; never held across the
    /// backend call.
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn PortfolioBackend>) -> Self {
        let sessions = SessionStore::new(
            config.form_variant,
            Duration::from_secs(config.session_idle_secs),
        );
        Self {
            config,
            backend,
            sessions: Arc::new(sessions),
        }
    }
}
