//! Request execution engine.
//!
//! Every API call passes through [`RequestExecutor::execute`]:
//!
//! ```text
//! Building ─► Authenticating ─► Sending ─┬─► Succeeded
//!                  ▲                     ├─► Retrying ─(sleep)─┐
//!                  └─────────────────────┼─────────────────────┘
//!                                        └─► Failed
//! ```
//!
//! Before-request hooks run once during Building. The auth header is
//! recomputed on every attempt because signed messages are time-bound.
//! Transport failures (other than malformed headers) and retryable statuses
//! loop back through Retrying until the policy is exhausted; the last observed
//! error is then returned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};

use crate::auth::AuthProvider;
use crate::error::{ApiError, MemoClawError, Result};
use crate::hooks::SharedHooks;
use crate::retry::RetryPolicy;
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// One API call: method, path relative to the base URL, optional JSON body,
/// query parameters and an optional cancellation token.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub cancel: Option<CancellationToken>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            cancel: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path).body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a cancellation token.
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Supplies payment headers when the server answers 402.
///
/// When headers are returned, the same request is re-issued once with them.
#[async_trait]
pub trait PaymentHandler: Send + Sync {
    async fn payment_headers(&self, response: &HttpResponse) -> Option<Vec<(String, String)>>;
}

/// Outcome of a single attempt.
enum Attempt {
    Done(Value),
    Retryable {
        cause: MemoClawError,
        /// Raw `Retry-After` header, if the server sent one
        retry_after: Option<String>,
    },
    Fail(MemoClawError),
}

/// Orchestrates URL building, hooks, auth, transport and retries.
#[derive(Clone)]
pub struct RequestExecutor {
    base_url: String,
    transport: Arc<dyn Transport>,
    auth: AuthProvider,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    hooks: SharedHooks,
    payment: Option<Arc<dyn PaymentHandler>>,
}

impl RequestExecutor {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, auth: AuthProvider) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            auth,
            retry: RetryPolicy::default(),
            timeout: None,
            hooks: SharedHooks::default(),
            payment: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Per-attempt timeout. Expiry counts as a transport failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_hooks(mut self, hooks: SharedHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_payment_handler(mut self, handler: Arc<dyn PaymentHandler>) -> Self {
        self.payment = Some(handler);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn hooks(&self) -> &SharedHooks {
        &self.hooks
    }

    /// Execute a call and decode the (hook-processed) result into `T`.
    ///
    /// A result that does not decode into `T` is a terminal failure and is
    /// reported to the error hooks like any other.
    pub async fn execute<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let (method, path) = (spec.method.clone(), spec.path.clone());
        let value = self.execute_value(spec).await?;
        serde_json::from_value(value).map_err(|e| {
            let err = MemoClawError::from(e);
            warn!(http.method = %method, http.route = %path, error = %err, "Response did not decode");
            self.hooks.snapshot().run_on_error(&method, &path, &err);
            err
        })
    }

    /// Execute a call and return the decoded JSON result.
    pub async fn execute_value(&self, spec: RequestSpec) -> Result<Value> {
        let span = info_span!(
            "memoclaw.request",
            http.method = %spec.method,
            http.route = %spec.path,
        );
        self.run(spec).instrument(span).await
    }

    async fn run(&self, spec: RequestSpec) -> Result<Value> {
        let RequestSpec {
            method,
            path,
            body,
            query,
            cancel,
        } = spec;
        let cancel = cancel.as_ref();

        // Building
        let url = self.build_url(&path, &query)?;
        let hooks = self.hooks.snapshot();
        let body = hooks.run_before_request(&method, &path, body);
        let payload = body.as_ref().map(serde_json::to_vec).transpose()?;

        let mut attempt: u32 = 0;
        loop {
            match self.attempt(&method, &url, payload.as_deref(), cancel).await {
                Attempt::Done(value) => {
                    debug!(attempt, "Request succeeded");
                    return Ok(hooks.run_after_response(&method, &path, value));
                }
                Attempt::Retryable { cause, retry_after } if self.retry.has_attempts_left(attempt) => {
                    let delay = self.retry.delay_with_retry_after(attempt, retry_after.as_deref());
                    debug!(
                        attempt = attempt + 1,
                        max_attempts = self.retry.max_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %cause,
                        "Retrying request"
                    );
                    cancellable(cancel, tokio::time::sleep(delay)).await?;
                    attempt += 1;
                }
                Attempt::Retryable { cause, .. } | Attempt::Fail(cause) => {
                    if !cause.is_cancelled() {
                        warn!(attempt, error = %cause, "Request failed");
                        hooks.run_on_error(&method, &path, &cause);
                    }
                    return Err(cause);
                }
            }
        }
    }

    /// Authenticating → Sending → classification, for one attempt.
    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        payload: Option<&[u8]>,
        cancel: Option<&CancellationToken>,
    ) -> Attempt {
        let auth = match cancellable(cancel, self.auth.compute_auth_header()).await {
            Ok(Ok(header)) => header,
            Ok(Err(e)) | Err(e) => return Attempt::Fail(e),
        };

        let mut headers = vec![(auth.name.to_string(), auth.value)];
        if payload.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        let request = HttpRequest {
            method: method.clone(),
            url: url.clone(),
            headers,
            body: payload.map(<[u8]>::to_vec),
        };

        let retry_request = self.payment.as_ref().map(|_| request.clone());
        let mut response = match self.send(request, cancel).await {
            Ok(response) => response,
            Err(outcome) => return outcome,
        };

        if response.status == 402 {
            if let (Some(handler), Some(mut request)) = (&self.payment, retry_request) {
                if let Some(extra) = handler.payment_headers(&response).await {
                    debug!("Payment required; re-issuing with payment headers");
                    request.headers.extend(extra);
                    response = match self.send(request, cancel).await {
                        Ok(response) => response,
                        Err(outcome) => return outcome,
                    };
                }
            }
        }

        self.classify(response)
    }

    async fn send(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> std::result::Result<HttpResponse, Attempt> {
        let call = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, self.transport.send(request))
                    .await
                    .unwrap_or(Err(TransportError::Timeout(limit))),
                None => self.transport.send(request).await,
            }
        };

        match cancellable(cancel, call).await {
            Ok(Ok(response)) => Ok(response),
            // Malformed headers fail without retry.
            Ok(Err(e @ TransportError::InvalidHeader(_))) => Err(Attempt::Fail(e.into())),
            Ok(Err(e)) => Err(Attempt::Retryable {
                cause: e.into(),
                retry_after: None,
            }),
            Err(cancelled) => Err(Attempt::Fail(cancelled)),
        }
    }

    fn classify(&self, response: HttpResponse) -> Attempt {
        if response.is_success() {
            if response.body.iter().all(u8::is_ascii_whitespace) {
                return Attempt::Done(Value::Object(Default::default()));
            }
            return match serde_json::from_slice(&response.body) {
                Ok(value) => Attempt::Done(value),
                Err(e) => Attempt::Fail(e.into()),
            };
        }

        let error = ApiError::from_body(response.status, &response.body);
        if self.retry.is_retryable_status(response.status) {
            Attempt::Retryable {
                cause: error.into(),
                retry_after: response.header("retry-after").map(str::to_string),
            }
        } else {
            Attempt::Fail(error.into())
        }
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| MemoClawError::Config(format!("invalid URL for {}: {}", path, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("hooks", &self.hooks)
            .field("payment", &self.payment.as_ref().map(|_| "Some(PaymentHandler)"))
            .finish()
    }
}

/// Race `fut` against the token; cancellation wins ties.
async fn cancellable<F: Future>(cancel: Option<&CancellationToken>, fut: F) -> Result<F::Output> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(MemoClawError::Cancelled),
            out = fut => Ok(out),
        },
        None => Ok(fut.await),
    }
}
