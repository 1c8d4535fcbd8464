//! REST backend configuration

use std::time::Duration;

use crate::error::{RemoteError, RemoteResult};

/// Connection settings for a PostgREST/Supabase project.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL (e.g., "https://abc.supabase.co"). `/rest/v1` is appended.
    pub base_url: String,

    /// Project api key, sent as the `apikey` header
    pub api_key: String,

    /// Signed-in user's JWT. The api key is used as the bearer when absent.
    pub access_token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            timeout: 30,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// `<base_url>/rest/v1/`, ready for `Url::join`.
    pub fn rest_root(&self) -> RemoteResult<url::Url> {
        if self.api_key.trim().is_empty() {
            return Err(RemoteError::Config("api key is required".to_string()));
        }

        let base = url::Url::parse(self.base_url.trim_end_matches('/'))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::Config(format!("not a base URL: {}", self.base_url)));
        }

        Ok(base.join(&format!("{}/rest/v1/", base.path().trim_end_matches('/')))?)
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.as_deref().unwrap_or(&self.api_key))
    }
}
