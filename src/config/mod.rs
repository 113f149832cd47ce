//! Layered configuration.
//!
//! Priority (highest to lowest):
//!   1. CLI / env — passed as `Some(value)` from clap
//!   2. TOML file (`--config`, default `./config.toml`)
//!   3. Built-in defaults
//!
//! Identity-provider settings have no defaults: missing ones are a startup
//! error, since the login flow cannot run without them.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}` — set it in config.toml [auth] or the environment")]
    Missing(&'static str),
}

// ─── Resolved config ──────────────────────────────────────────────────────────

/// Identity-provider settings, fully resolved.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Provider domain, e.g. `my-tenant.auth0.com`. A bare domain is reached
    /// over https; an explicit `http://` / `https://` prefix is honored.
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    /// Where the provider redirects back with `?code=...`.
    pub callback_url: String,
    /// Where the provider sends the browser after logout (`returnTo`).
    pub logout_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub bind_address: String,
    pub log: String,
    pub auth: AuthSettings,
}

impl AppConfig {
    pub fn new(
        port: Option<u16>,
        bind_address: Option<String>,
        log: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or_else(default_config_path);
        let file = load_toml(&path).unwrap_or_default();

        let port = port.or(file.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(file.log).unwrap_or_else(|| "info".to_string());
        let bind_address = bind_address
            .or(file.bind_address)
            .unwrap_or_else(default_bind_address);

        let auth_file = file.auth.unwrap_or_default();
        let auth = AuthSettings {
            domain: pick(env("AUTH_DOMAIN"), auth_file.domain)
                .ok_or(ConfigError::Missing("AUTH_DOMAIN"))?,
            client_id: pick(env("AUTH_CLIENT_ID"), auth_file.client_id)
                .ok_or(ConfigError::Missing("AUTH_CLIENT_ID"))?,
            client_secret: pick(env("AUTH_CLIENT_SECRET"), auth_file.client_secret)
                .ok_or(ConfigError::Missing("AUTH_CLIENT_SECRET"))?,
            callback_url: pick(env("AUTH_CALLBACK_URL"), auth_file.callback_url)
                .ok_or(ConfigError::Missing("AUTH_CALLBACK_URL"))?,
            logout_url: pick(env("AUTH_LOGOUT_URL"), auth_file.logout_url)
                .ok_or(ConfigError::Missing("AUTH_LOGOUT_URL"))?,
        };

        Ok(Self {
            port,
            bind_address,
            log,
            auth,
        })
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Environment wins over the file layer.
fn pick(env_val: Option<String>, file_val: Option<String>) -> Option<String> {
    env_val.or(file_val)
}

// ─── TOML file layer ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub log: Option<String>,
    pub auth: Option<FileAuth>,
}

/// `[auth]` section of config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct FileAuth {
    pub domain: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
    pub logout_url: Option<String>,
}

fn load_toml(path: &Path) -> Option<FileConfig> {
    let raw = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&raw) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!("warn: ignoring invalid config file {}: {e}", path.display());
            None
        }
    }
}
