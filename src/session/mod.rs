//! Per-browser sessions.
//!
//! Each browser gets a UUID cookie on first contact; the id keys an
//! in-memory entry holding the authenticated profile, the AWS keys from the
//! profile form, and the last dashboard refresh time. Entries live until
//! logout; nothing survives a restart.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::UserProfile;
use crate::aws::AwsKeys;

pub const SESSION_COOKIE: &str = "cloudlens_session";

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<UserProfile>,
    /// Stored verbatim from the profile form. Plaintext, in memory only.
    pub aws_keys: Option<AwsKeys>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

pub struct SessionStore {
    entries: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a fresh empty session and returns its id.
    pub async fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.entries
            .write()
            .await
            .insert(id.clone(), Session::default());
        id
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn set_user(&self, id: &str, user: UserProfile) {
        if let Some(session) = self.entries.write().await.get_mut(id) {
            session.user = Some(user);
        }
    }

    pub async fn set_aws_keys(&self, id: &str, keys: AwsKeys) {
        if let Some(session) = self.entries.write().await.get_mut(id) {
            session.aws_keys = Some(keys);
        }
    }

    pub async fn touch_refreshed(&self, id: &str, at: DateTime<Utc>) {
        if let Some(session) = self.entries.write().await.get_mut(id) {
            session.last_refreshed = Some(at);
        }
    }

    /// Drops the whole session (logout). Profile, keys, everything.
    pub async fn remove(&self, id: &str) {
        self.entries.write().await.remove(id);
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}
