//! Common test utilities: a scripted in-memory transport and client builders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use memoclaw::{
    HttpRequest, HttpResponse, MemoClawClient, MemoClawConfig, RetryPolicy, Transport,
    TransportError,
};
use serde_json::Value;

/// One scripted outcome for a `send` call.
#[allow(dead_code)]
pub enum Step {
    Respond(HttpResponse),
    Fail(TransportError),
    /// Never completes; used for timeout and cancellation tests.
    Hang,
}

/// Pops one [`Step`] per call and records every request it saw.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Transport with no scripted steps; any call fails.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport answering every call in `responses` with JSON.
    pub fn json(responses: impl IntoIterator<Item = (u16, Value)>) -> Arc<Self> {
        Self::new(
            responses
                .into_iter()
                .map(|(status, body)| Step::Respond(HttpResponse::json(status, &body))),
        )
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => futures::future::pending().await,
            None => Err(TransportError::Other("script exhausted".into())),
        }
    }
}

/// Session-token config with a fast retry policy.
#[allow(dead_code)]
pub fn config(max_retries: u32) -> MemoClawConfig {
    MemoClawConfig::new("https://api.test")
        .with_session_token("tok_test")
        .with_retry(RetryPolicy::new(max_retries, Duration::from_millis(1)))
}

/// Client over `transport` allowing `max_retries` retries.
pub fn client(transport: &Arc<ScriptedTransport>, max_retries: u32) -> MemoClawClient {
    let transport: Arc<dyn Transport> = transport.clone();
    MemoClawClient::with_transport(config(max_retries), transport)
        .expect("failed to create test client")
}

/// An error body in the server's envelope format.
#[allow(dead_code)]
pub fn error_body(code: &str, message: &str) -> Value {
    serde_json::json!({ "error": { "code": code, "message": message } })
}
