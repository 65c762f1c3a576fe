//! Before-request / after-response / on-error hook pipeline.
//!
//! Hooks run in registration order. Before-request and after-response hooks
//! return `Some(replacement)` to swap the payload for the next hook (and
//! ultimately the wire or the caller), or `None` to pass it through untouched.
//! Error hooks are observational only.
//!
//! Hooks never see retried attempts: before-request hooks run once per call,
//! after-response hooks run once on the final 2xx, error hooks run once on the
//! terminal failure.

use std::sync::{Arc, RwLock};

use reqwest::Method;
use serde_json::Value;

use crate::error::MemoClawError;

pub type BeforeRequestHook =
    Arc<dyn Fn(&Method, &str, Option<&Value>) -> Option<Value> + Send + Sync>;
pub type AfterResponseHook = Arc<dyn Fn(&Method, &str, &Value) -> Option<Value> + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&Method, &str, &MemoClawError) + Send + Sync>;

/// Ordered hook lists, one per phase.
#[derive(Clone, Default)]
pub struct HookPipeline {
    before_request: Vec<BeforeRequestHook>,
    after_response: Vec<AfterResponseHook>,
    on_error: Vec<ErrorHook>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a before-request hook. Returns `self` for chaining.
    pub fn on_before_request<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Method, &str, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.before_request.push(Arc::new(hook));
        self
    }

    /// Append an after-response hook. Returns `self` for chaining.
    pub fn on_after_response<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Method, &str, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.after_response.push(Arc::new(hook));
        self
    }

    /// Append an error hook. Returns `self` for chaining.
    pub fn on_error<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Method, &str, &MemoClawError) + Send + Sync + 'static,
    {
        self.on_error.push(Arc::new(hook));
        self
    }

    pub fn run_before_request(&self, method: &Method, path: &str, body: Option<Value>) -> Option<Value> {
        let mut current = body;
        for hook in &self.before_request {
            if let Some(replacement) = hook(method, path, current.as_ref()) {
                current = Some(replacement);
            }
        }
        current
    }

    pub fn run_after_response(&self, method: &Method, path: &str, result: Value) -> Value {
        let mut current = result;
        for hook in &self.after_response {
            if let Some(replacement) = hook(method, path, &current) {
                current = replacement;
            }
        }
        current
    }

    pub fn run_on_error(&self, method: &Method, path: &str, error: &MemoClawError) {
        for hook in &self.on_error {
            hook(method, path, error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before_request.is_empty() && self.after_response.is_empty() && self.on_error.is_empty()
    }
}

impl std::fmt::Debug for HookPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookPipeline")
            .field("before_request", &self.before_request.len())
            .field("after_response", &self.after_response.len())
            .field("on_error", &self.on_error.len())
            .finish()
    }
}

/// Hook pipeline shared between a client and its executor.
///
/// Registration takes the write lock briefly; dispatch clones a snapshot so no
/// lock is held across an await.
#[derive(Clone, Default, Debug)]
pub struct SharedHooks(Arc<RwLock<HookPipeline>>);

impl SharedHooks {
    pub fn new(pipeline: HookPipeline) -> Self {
        Self(Arc::new(RwLock::new(pipeline)))
    }

    /// Mutate the pipeline under the write lock.
    pub fn update(&self, f: impl FnOnce(&mut HookPipeline)) {
        let mut guard = self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
    }

    /// Copy of the current hook lists.
    pub fn snapshot(&self) -> HookPipeline {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
