pub mod auth;
pub mod aws;
pub mod charts;
pub mod config;
pub mod session;
pub mod web;

use std::sync::Arc;

use auth::AuthClient;
use aws::{AwsDataSource, CloudDataSource};
use config::AppConfig;
use session::SessionStore;

/// Shared application state passed to every page handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    /// In-memory browser sessions (profile + AWS keys). Gone on restart.
    pub sessions: Arc<SessionStore>,
    /// Identity-provider client (authorize URL, token exchange, userinfo).
    pub auth: Arc<AuthClient>,
    /// Cloud adapter seam. Handlers never name the SDK directly.
    pub cloud: Arc<dyn CloudDataSource>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let auth = Arc::new(AuthClient::new(config.auth.clone())?);
        Ok(Self {
            config,
            sessions: Arc::new(SessionStore::new()),
            auth,
            cloud: Arc::new(AwsDataSource::new()),
            started_at: std::time::Instant::now(),
        })
    }

    /// Replace the cloud adapter with another implementation.
    pub fn with_cloud(mut self, cloud: Arc<dyn CloudDataSource>) -> Self {
        self.cloud = cloud;
        self
    }
}
