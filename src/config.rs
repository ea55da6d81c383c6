//! Cloudflare adapter configuration
//!
//! Credentials are captured once and passed to [`CloudflareClient::new`].
//! Reading the process environment happens only in [`CloudflareConfig::from_env`],
//! which the binary calls at startup before applying command-line overrides.
//! An empty token is rejected when the client is built, not when it is read.
//!
//! [`CloudflareClient::new`]: crate::cloudflare::CloudflareClient::new

use std::env;

use crate::error::CloudflareError;

/// Default v4 REST API base
pub const CLOUDFLARE_API: &str = "https://api.cloudflare.com/client/v4";

pub const TOKEN_ENV: &str = "CLOUDFLARE_API_TOKEN";
pub const ACCOUNT_ID_ENV: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const API_BASE_ENV: &str = "CLOUDFLARE_API_BASE";

/// Immutable credentials and endpoint for one adapter instance.
#[derive(Clone)]
pub struct CloudflareConfig {
    /// API token sent as `Authorization: Bearer <token>`
    pub api_token: String,
    /// Account used by account-scoped tools when the caller omits one
    pub account_id: Option<String>,
    /// Base URL every relative path is joined to
    pub api_base: String,
}

impl CloudflareConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            account_id: None,
            api_base: CLOUDFLARE_API.to_string(),
        }
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Point the adapter at another base URL (proxies, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Build from `CLOUDFLARE_API_TOKEN`, `CLOUDFLARE_ACCOUNT_ID` and
    /// `CLOUDFLARE_API_BASE`. An unset token is left empty; [`validate`](Self::validate)
    /// reports it.
    pub fn from_env() -> Self {
        let api_token = env::var(TOKEN_ENV).unwrap_or_default();
        let mut config = Self::new(api_token);

        if let Some(account_id) = non_empty_var(ACCOUNT_ID_ENV) {
            config = config.with_account_id(account_id);
        }
        if let Some(api_base) = non_empty_var(API_BASE_ENV) {
            config = config.with_api_base(api_base);
        }
        config
    }

    /// Replace the token, e.g. from a `--token` flag.
    pub fn with_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = api_token.into();
        self
    }

    /// Reject a config that cannot authenticate.
    pub fn validate(&self) -> Result<(), CloudflareError> {
        if self.api_token.trim().is_empty() {
            return Err(CloudflareError::MissingToken);
        }
        Ok(())
    }
}

impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
