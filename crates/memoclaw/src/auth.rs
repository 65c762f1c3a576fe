//! Authentication header construction.
//!
//! Three interchangeable strategies, resolved once at construction with fixed
//! precedence: session token > signed wallet > plain wallet.
//!
//! | Strategy       | Header           | Value                              |
//! |----------------|------------------|------------------------------------|
//! | Session token  | `Authorization`  | `Bearer <token>`                   |
//! | Signed wallet  | `x-wallet-auth`  | `<address>:<timestamp>:<signature>`|
//! | Plain wallet   | `x-wallet-auth`  | `<address>`                        |
//!
//! Signed-wallet headers are recomputed for every attempt: the signed message
//! `memoclaw-auth:<unix-seconds>` bounds the replay window, so signatures are
//! never cached.
//!
//! Timestamps have whole-second resolution. Two attempts signed within the
//! same second carry the same message, and with a deterministic signer the
//! same header. The timestamp always tracks the wall clock and is never
//! nudged forward to make consecutive headers distinct.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::warn;

use crate::error::{MemoClawError, Result};

/// Namespace prefix of the signed auth message.
pub const AUTH_MESSAGE_PREFIX: &str = "memoclaw-auth";

pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const WALLET_AUTH_HEADER: &str = "x-wallet-auth";

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Injected wallet signing capability (e.g. an EIP-191 personal_sign).
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Sign `message` and return the encoded signature.
    async fn sign(&self, message: &str) -> std::result::Result<String, BoxError>;
}

/// Resolved credential strategy.
#[derive(Clone)]
pub enum AuthContext {
    SessionToken(String),
    SignedWallet {
        address: String,
        signer: Arc<dyn WalletSigner>,
    },
    /// Address only. Authenticates nothing cryptographically; trust-on-first-use
    /// fallback kept for older deployments.
    Wallet(String),
}

impl AuthContext {
    /// Pick a strategy from whatever credentials are configured.
    ///
    /// Fails with [`MemoClawError::Config`] when nothing usable is present.
    pub fn resolve(
        session_token: Option<String>,
        wallet_address: Option<String>,
        signer: Option<Arc<dyn WalletSigner>>,
    ) -> Result<Self> {
        let session_token = session_token.filter(|t| !t.trim().is_empty());
        let wallet_address = wallet_address.filter(|a| !a.trim().is_empty());

        if let Some(token) = session_token {
            return Ok(AuthContext::SessionToken(token));
        }
        match (wallet_address, signer) {
            (Some(address), Some(signer)) => Ok(AuthContext::SignedWallet { address, signer }),
            (Some(address), None) => {
                warn!("No signer configured; falling back to unsigned wallet auth");
                Ok(AuthContext::Wallet(address))
            }
            (None, Some(_)) => Err(MemoClawError::Config(
                "a wallet signer requires a wallet address".into(),
            )),
            (None, None) => Err(MemoClawError::Config(
                "no credentials configured: set a session token or a wallet address".into(),
            )),
        }
    }

    pub fn header_name(&self) -> &'static str {
        match self {
            AuthContext::SessionToken(_) => AUTHORIZATION_HEADER,
            AuthContext::SignedWallet { .. } | AuthContext::Wallet(_) => WALLET_AUTH_HEADER,
        }
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthContext::SessionToken(_) => f.write_str("SessionToken(<redacted>)"),
            AuthContext::SignedWallet { address, .. } => f
                .debug_struct("SignedWallet")
                .field("address", address)
                .field("signer", &"<signer>")
                .finish(),
            AuthContext::Wallet(address) => f.debug_tuple("Wallet").field(address).finish(),
        }
    }
}

/// Header name/value pair produced for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub name: &'static str,
    pub value: String,
}

type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Computes a fresh auth header per attempt.
#[derive(Clone)]
pub struct AuthProvider {
    context: AuthContext,
    clock: Clock,
}

impl AuthProvider {
    pub fn new(context: AuthContext) -> Self {
        Self {
            context,
            clock: Arc::new(unix_now),
        }
    }

    /// Replace the unix-seconds clock used for signed messages.
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    /// Build the header for one attempt. A signer rejection fails the whole
    /// request with [`MemoClawError::Signer`]; it is never retried.
    pub async fn compute_auth_header(&self) -> Result<AuthHeader> {
        let value = match &self.context {
            AuthContext::SessionToken(token) => format!("Bearer {}", token),
            AuthContext::SignedWallet { address, signer } => {
                let timestamp = (self.clock)();
                let signature = signer
                    .sign(&auth_message(timestamp))
                    .await
                    .map_err(|e| MemoClawError::Signer(e.to_string()))?;
                format!("{}:{}:{}", address, timestamp, signature)
            }
            AuthContext::Wallet(address) => address.clone(),
        };

        Ok(AuthHeader {
            name: self.context.header_name(),
            value,
        })
    }
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// The time-bound message a wallet signs.
pub fn auth_message(timestamp: u64) -> String {
    format!("{}:{}", AUTH_MESSAGE_PREFIX, timestamp)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
