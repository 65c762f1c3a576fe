//! Error types for MemoClaw operations.
//!
//! Every non-2xx response is turned into an [`ApiError`] whose [`ApiErrorKind`]
//! is derived from the HTTP status alone. Callers switch on the kind instead of
//! matching message text.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Machine code used when the server did not send a usable error body.
pub const UNKNOWN_CODE: &str = "UNKNOWN";

/// Closed set of API failure kinds, keyed by HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400 / 422
    Validation,
    /// 401
    Authentication,
    /// 402
    PaymentRequired,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 429
    RateLimit,
    /// 500 / 502 / 503 / 504
    InternalServer,
    /// Any other non-2xx status
    Other,
}

impl ApiErrorKind {
    /// Map an HTTP status code to its error kind. Total over all codes.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ApiErrorKind::Validation,
            401 => ApiErrorKind::Authentication,
            402 => ApiErrorKind::PaymentRequired,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            429 => ApiErrorKind::RateLimit,
            500 | 502 | 503 | 504 => ApiErrorKind::InternalServer,
            _ => ApiErrorKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::Validation => "validation",
            ApiErrorKind::Authentication => "authentication",
            ApiErrorKind::PaymentRequired => "payment_required",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not_found",
            ApiErrorKind::RateLimit => "rate_limit",
            ApiErrorKind::InternalServer => "internal_server",
            ApiErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed API call, materialized from a non-2xx response.
///
/// Displays as `[status] code: message`, followed by a hint line for
/// well-known failures.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{status}] {code}: {message}{}", hint_line(.status, .code))]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status code of the response
    pub status: u16,
    /// Machine-readable code from the server (e.g. `NOT_FOUND`)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Optional structured details from the server
    pub details: Option<Value>,
}

/// `{ "error": { "code": ..., "message": ..., "details": ... } }`
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<Value>,
}

impl ApiError {
    /// Build the typed error for a status code. Pure; never fails.
    pub fn classify(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> Self {
        Self {
            kind: ApiErrorKind::from_status(status),
            status,
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    /// Decode a raw error body. Non-JSON or incomplete bodies degrade to
    /// code `UNKNOWN` and message `HTTP <status>`.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let error = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_default();

        Self::classify(
            status,
            error.code.unwrap_or_else(|| UNKNOWN_CODE.to_string()),
            error.message.unwrap_or_else(|| format!("HTTP {}", status)),
            error.details,
        )
    }

    /// Actionable hint for well-known failures.
    pub fn suggestion(&self) -> Option<&'static str> {
        suggestion_for(self.status, &self.code)
    }
}

fn suggestion_for(status: u16, code: &str) -> Option<&'static str> {
    match (status, code) {
        (401, "AUTH_ERROR") => Some(
            "Check that your credentials are correct and the signature hasn't expired. Ensure the system clock is synced.",
        ),
        (402, "PAYMENT_REQUIRED") => Some(
            "Free tier exhausted. Configure a payment handler or upgrade your plan.",
        ),
        (404, "NOT_FOUND") => Some(
            "The memory ID may have been deleted or never existed. Use list() to verify.",
        ),
        (422, "VALIDATION_ERROR") => Some(
            "Check the request payload: content max length is 8192 chars, importance must be 0.0-1.0.",
        ),
        (429, "RATE_LIMITED") => Some(
            "Too many requests. The client retries automatically, but consider spacing out batch operations.",
        ),
        (500, "INTERNAL_ERROR") => Some(
            "Server error, usually transient. The client retries automatically.",
        ),
        _ => None,
    }
}

fn hint_line(status: &u16, code: &str) -> String {
    suggestion_for(*status, code)
        .map(|hint| format!("\n  hint: {}", hint))
        .unwrap_or_default()
}

/// Errors that can occur when talking to MemoClaw.
#[derive(Error, Debug)]
pub enum MemoClawError {
    /// The server answered with a non-2xx status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response was received (network failure, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The caller's cancellation token fired
    #[error("Request cancelled")]
    Cancelled,

    /// The injected wallet signer rejected the auth message
    #[error("Signer error: {0}")]
    Signer(String),

    /// Local precondition failed before any network activity
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (missing credentials, bad base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MemoClawError {
    /// The typed API error, if this failure came from an HTTP response.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            MemoClawError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Kind of the API error, if any.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        self.api().map(|e| e.kind)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, MemoClawError::Cancelled)
    }
}

/// Result type for MemoClaw operations.
pub type Result<T> = std::result::Result<T, MemoClawError>;
