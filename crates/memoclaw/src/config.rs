//! Configuration for the MemoClaw client.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthContext, WalletSigner};
use crate::error::{MemoClawError, Result};
use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.memoclaw.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings and credentials.
#[derive(Clone)]
pub struct MemoClawConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Session token; wins over any wallet credentials
    pub session_token: Option<String>,
    /// Wallet address for signed or plain wallet auth
    pub wallet_address: Option<String>,
    /// Signing capability for wallet auth. Not serializable, never read from env.
    pub signer: Option<Arc<dyn WalletSigner>>,
    /// Per-attempt timeout (`None` = wait forever)
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl MemoClawConfig {
    /// Create a config for `base_url` with no credentials yet.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token: None,
            wallet_address: None,
            signer: None,
            timeout: Some(DEFAULT_TIMEOUT),
            retry: RetryPolicy::default(),
        }
    }

    /// Create config from environment variables.
    ///
    /// Optional: `MEMOCLAW_URL` (default: https://api.memoclaw.com)
    /// Optional: `MEMOCLAW_SESSION_TOKEN`
    /// Optional: `MEMOCLAW_WALLET`
    ///
    /// At least one of the credential variables must be set. Attach a signer
    /// afterwards with [`MemoClawConfig::with_signer`].
    pub fn from_env() -> Result<Self> {
        let base_url = non_empty_env("MEMOCLAW_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let session_token = non_empty_env("MEMOCLAW_SESSION_TOKEN");
        let wallet_address = non_empty_env("MEMOCLAW_WALLET");

        if session_token.is_none() && wallet_address.is_none() {
            return Err(MemoClawError::Config(
                "neither MEMOCLAW_SESSION_TOKEN nor MEMOCLAW_WALLET is set".into(),
            ));
        }

        Ok(Self {
            session_token,
            wallet_address,
            ..Self::new(base_url)
        })
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_wallet(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn WalletSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Set the per-attempt timeout; `None` disables it.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Shorthand for changing only the retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Resolve credentials into an auth strategy.
    pub fn auth_context(&self) -> Result<AuthContext> {
        AuthContext::resolve(
            self.session_token.clone(),
            self.wallet_address.clone(),
            self.signer.clone(),
        )
    }
}

impl Default for MemoClawConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl std::fmt::Debug for MemoClawConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoClawConfig")
            .field("base_url", &self.base_url)
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("wallet_address", &self.wallet_address)
            .field("signer", &self.signer.as_ref().map(|_| "Some(WalletSigner)"))
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
