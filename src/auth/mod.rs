//! Login against the hosted identity provider.
//!
//! Authorization-code flow: the login page links to the provider's
//! `/authorize` endpoint; the provider redirects back to `/callback?code=...`;
//! the code is exchanged for an access token and the token used to fetch the
//! user profile from `/userinfo`. The profile is all this service keeps —
//! no refresh tokens, no expiry tracking, no state parameter.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::AuthSettings;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid provider domain: {0}")]
    BadDomain(String),
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("token response carried no access token")]
    MissingAccessToken,
    #[error("userinfo fetch failed: {0}")]
    Userinfo(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Profile returned by the provider's userinfo endpoint. `name` and `email`
/// are optional claims; pages fall back to "Unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

pub struct AuthClient {
    http: reqwest::Client,
    base: reqwest::Url,
    settings: AuthSettings,
}

impl AuthClient {
    pub fn new(settings: AuthSettings) -> Result<Self, AuthError> {
        // Bare provider domains are reached over https; an explicit scheme wins.
        let origin = if settings.domain.starts_with("http://")
            || settings.domain.starts_with("https://")
        {
            settings.domain.clone()
        } else {
            format!("https://{}", settings.domain)
        };
        let base = reqwest::Url::parse(&origin).map_err(|e| AuthError::BadDomain(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base,
            settings,
        })
    }

    fn endpoint(&self, path: &str) -> reqwest::Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }

    fn endpoint_with(&self, path: &str, pairs: &[(&str, &str)]) -> String {
        let mut url = self.endpoint(path);
        url.query_pairs_mut().extend_pairs(pairs.iter().copied());
        url.to_string()
    }

    /// Authorization URL the login page links to. Pure construction —
    /// nothing happens until the user clicks.
    pub fn authorize_url(&self) -> String {
        self.endpoint_with(
            "/authorize",
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid profile email"),
            ],
        )
    }

    /// Provider logout URL the browser is redirected to after the local
    /// session is dropped.
    pub fn logout_url(&self) -> String {
        self.endpoint_with(
            "/v2/logout",
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("returnTo", self.settings.logout_url.as_str()),
            ],
        )
    }

    /// Completes the provider callback.
    ///
    /// A missing code means the page was loaded without going through the
    /// provider — expected on a plain visit, not an error. No network call
    /// is made in that case.
    pub async fn complete_callback(
        &self,
        code: Option<&str>,
    ) -> Result<Option<UserProfile>, AuthError> {
        let Some(code) = code else {
            return Ok(None);
        };
        let access_token = self.exchange_code(code).await?;
        let profile = self.fetch_profile(&access_token).await?;
        debug!(sub = %profile.sub, "authenticated");
        Ok(Some(profile))
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let url = self.endpoint("/oauth/token");
        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({
                "grant_type": "authorization_code",
                "client_id": self.settings.client_id,
                "client_secret": self.settings.client_secret,
                "code": code,
                "redirect_uri": self.settings.callback_url,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!("{status}: {body}")));
        }

        let tokens: TokenResponse = resp.json().await?;
        tokens
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingAccessToken)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        let url = self.endpoint("/userinfo");
        let resp = self.http.get(url).bearer_auth(access_token).send().await?;
        if !resp.status().is_success() {
            return Err(AuthError::Userinfo(format!("status {}", resp.status())));
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AuthSettings {
        AuthSettings {
            domain: "tenant.example.com".into(),
            client_id: "client-123".into(),
            client_secret: "shh".into(),
            callback_url: "http://localhost:8080/callback".into(),
            logout_url: "http://localhost:8080/".into(),
        }
    }

    #[test]
    fn authorize_url_carries_code_flow_params() {
        let client = AuthClient::new(settings()).unwrap();
        let url = client.authorize_url();
        assert!(url.starts_with("https://tenant.example.com/authorize?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback"));
        assert!(url.contains("scope=openid"));
    }

    #[test]
    fn logout_url_carries_return_to() {
        let client = AuthClient::new(settings()).unwrap();
        let url = client.logout_url();
        assert!(url.starts_with("https://tenant.example.com/v2/logout?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("returnTo=http%3A%2F%2Flocalhost%3A8080%2F"));
    }

    #[test]
    fn explicit_scheme_is_honored() {
        let mut s = settings();
        s.domain = "http://127.0.0.1:9999".into();
        let client = AuthClient::new(s).unwrap();
        assert!(client.authorize_url().starts_with("http://127.0.0.1:9999/authorize?"));
    }

    #[tokio::test]
    async fn callback_without_code_is_no_identity() {
        // No server anywhere near this test: the early return must not
        // touch the network.
        let client = AuthClient::new(settings()).unwrap();
        let result = client.complete_callback(None).await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn token_response_tolerates_missing_access_token() {
        let tokens: TokenResponse = serde_json::from_str(r#"{"token_type":"Bearer"}"#).unwrap();
        assert!(tokens.access_token.is_none());
    }
}
