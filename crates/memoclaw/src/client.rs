//! MemoClaw client: typed wrappers over the request executor.
//!
//! Every operation validates its inputs locally first. Validation failures
//! return [`MemoClawError::InvalidInput`] without touching the network, the
//! hooks or the retry loop.

use std::sync::Arc;

use futures::Stream;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use urlencoding::encode;

use crate::auth::AuthProvider;
use crate::config::MemoClawConfig;
use crate::error::{MemoClawError, Result};
use crate::executor::{PaymentHandler, RequestExecutor, RequestSpec};
use crate::graph::{self, RelationGraph};
use crate::pagination::{self, Page};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    ConsolidateRequest, ConsolidateResult, CreateRelationRequest, DeleteResult, Direction,
    ExtractRequest, ExtractResult, FreeTierStatus, IngestRequest, IngestResult, ListFilter,
    ListResponse, Memory, RecallRequest, RecallResponse, Relation, RelationType, RelationWithMemory,
    RelationsResponse, StoreBatchResult, StoreRequest, StoreResult, SuggestedQuery,
    SuggestedResponse, UpdateRequest,
};

/// Largest batch accepted by `store_batch`.
pub const MAX_BATCH_SIZE: usize = 100;

/// Page size used by `list_all` when callers have no preference.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Client for the MemoClaw memory API.
///
/// Cheap to clone; clones share the transport and the hook pipeline.
#[derive(Clone, Debug)]
pub struct MemoClawClient {
    executor: RequestExecutor,
}

impl MemoClawClient {
    /// Create a client backed by the default HTTP transport.
    pub fn new(config: MemoClawConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client from `MEMOCLAW_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(MemoClawConfig::from_env()?)
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: MemoClawConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let auth = AuthProvider::new(config.auth_context()?);
        let executor = RequestExecutor::new(config.base_url, transport, auth)
            .with_retry(config.retry)
            .with_timeout(config.timeout);
        Ok(Self { executor })
    }

    /// Wrap an already-configured executor.
    pub fn from_executor(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Answer 402 responses with payment headers from `handler`.
    pub fn with_payment_handler(mut self, handler: Arc<dyn PaymentHandler>) -> Self {
        self.executor = self.executor.with_payment_handler(handler);
        self
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    // ── Hooks ───────────────────────────────────────────────────────────────

    /// Register a hook that may replace the outgoing body.
    pub fn on_before_request<F>(&self, hook: F) -> &Self
    where
        F: Fn(&Method, &str, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.executor.hooks().update(|pipeline| {
            pipeline.on_before_request(hook);
        });
        self
    }

    /// Register a hook that may replace the decoded result.
    pub fn on_after_response<F>(&self, hook: F) -> &Self
    where
        F: Fn(&Method, &str, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.executor.hooks().update(|pipeline| {
            pipeline.on_after_response(hook);
        });
        self
    }

    /// Register an observer for terminal failures.
    pub fn on_error<F>(&self, hook: F) -> &Self
    where
        F: Fn(&Method, &str, &MemoClawError) + Send + Sync + 'static,
    {
        self.executor.hooks().update(|pipeline| {
            pipeline.on_error(hook);
        });
        self
    }

    /// Run a raw request, e.g. one carrying a cancellation token.
    pub async fn request<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        self.executor.execute(spec).await
    }

    // ── Store ───────────────────────────────────────────────────────────────

    pub async fn store(&self, request: StoreRequest) -> Result<StoreResult> {
        validate_store(&request)?;
        self.post("/v1/store", &request).await
    }

    /// Store up to [`MAX_BATCH_SIZE`] memories in one call.
    pub async fn store_batch(&self, memories: Vec<StoreRequest>) -> Result<StoreBatchResult> {
        if memories.is_empty() {
            return Err(MemoClawError::InvalidInput("memories list must not be empty".into()));
        }
        if memories.len() > MAX_BATCH_SIZE {
            return Err(MemoClawError::InvalidInput(format!(
                "batch size {} exceeds maximum of {}",
                memories.len(),
                MAX_BATCH_SIZE
            )));
        }
        for memory in &memories {
            validate_store(memory)?;
        }
        self.post("/v1/store/batch", &json!({ "memories": memories })).await
    }

    /// Store any number of memories, [`MAX_BATCH_SIZE`] per call.
    ///
    /// Every item is validated before the first call. Results are merged; an
    /// empty input returns an empty result without touching the network. A
    /// failing chunk stops the run, and earlier chunks stay stored.
    pub async fn store_batch_chunked(
        &self,
        memories: Vec<StoreRequest>,
    ) -> Result<StoreBatchResult> {
        for memory in &memories {
            validate_store(memory)?;
        }

        let mut merged = StoreBatchResult::default();
        for chunk in memories.chunks(MAX_BATCH_SIZE) {
            let result = self.store_batch(chunk.to_vec()).await?;
            merged.ids.extend(result.ids);
            merged.tokens_used += result.tokens_used;
            merged.deduplicated_count += result.deduplicated_count;
            merged.stored = true;
        }
        merged.count = merged.ids.len() as u64;
        Ok(merged)
    }

    // ── Recall / list / get ─────────────────────────────────────────────────

    pub async fn recall(&self, request: RecallRequest) -> Result<RecallResponse> {
        require_non_empty(&request.query, "query")?;
        require_unit_range(request.min_similarity, "min_similarity")?;
        self.post("/v1/recall", &request).await
    }

    /// One page of memories.
    pub async fn list(&self, filter: &ListFilter, limit: u32, offset: u64) -> Result<ListResponse> {
        let mut spec = RequestSpec::get("/v1/memories")
            .query("limit", limit.to_string())
            .query("offset", offset.to_string());
        spec.query.extend(filter.to_query());
        self.executor.execute(spec).await
    }

    /// Every memory matching `filter`, fetched lazily `batch_size` at a time.
    ///
    /// A zero `batch_size` yields a single `InvalidInput` error.
    pub fn list_all(
        &self,
        filter: ListFilter,
        batch_size: u32,
    ) -> impl Stream<Item = Result<Memory>> + '_ {
        pagination::paginate(batch_size, move |limit, offset| {
            let filter = filter.clone();
            async move {
                if limit == 0 {
                    return Err(MemoClawError::InvalidInput("batch_size must be positive".into()));
                }
                self.list(&filter, limit, offset).await.map(Page::from)
            }
        })
    }

    pub async fn get(&self, memory_id: &str) -> Result<Memory> {
        require_non_empty(memory_id, "memory_id")?;
        let path = format!("/v1/memories/{}", encode(memory_id));
        self.executor.execute(RequestSpec::get(path)).await
    }

    // ── Update / delete ─────────────────────────────────────────────────────

    pub async fn update(&self, memory_id: &str, request: UpdateRequest) -> Result<Memory> {
        require_non_empty(memory_id, "memory_id")?;
        if let Some(content) = &request.content {
            require_non_empty(content, "content")?;
        }
        require_unit_range(request.importance, "importance")?;
        let path = format!("/v1/memories/{}", encode(memory_id));
        let body = serde_json::to_value(&request)?;
        self.executor.execute(RequestSpec::patch(path, body)).await
    }

    pub async fn delete(&self, memory_id: &str) -> Result<DeleteResult> {
        require_non_empty(memory_id, "memory_id")?;
        let path = format!("/v1/memories/{}", encode(memory_id));
        self.executor.execute(RequestSpec::delete(path)).await
    }

    // ── Ingest / extract / consolidate ──────────────────────────────────────

    /// Auto-extract and store facts. Needs messages or text.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestResult> {
        let has_messages = request.messages.as_ref().is_some_and(|m| !m.is_empty());
        let has_text = request.text.as_ref().is_some_and(|t| !t.trim().is_empty());
        if !has_messages && !has_text {
            return Err(MemoClawError::InvalidInput(
                "either messages or text must be provided".into(),
            ));
        }
        self.post("/v1/ingest", &request).await
    }

    pub async fn extract(&self, request: ExtractRequest) -> Result<ExtractResult> {
        if request.messages.is_empty() {
            return Err(MemoClawError::InvalidInput("messages must not be empty".into()));
        }
        self.post("/v1/memories/extract", &request).await
    }

    pub async fn consolidate(&self, request: ConsolidateRequest) -> Result<ConsolidateResult> {
        require_unit_range(request.min_similarity, "min_similarity")?;
        self.post("/v1/memories/consolidate", &request).await
    }

    pub async fn suggested(&self, query: &SuggestedQuery) -> Result<SuggestedResponse> {
        let mut spec = RequestSpec::get("/v1/suggested");
        spec.query.extend(query.to_query());
        self.executor.execute(spec).await
    }

    // ── Relations ───────────────────────────────────────────────────────────

    pub async fn create_relation(
        &self,
        memory_id: &str,
        target_id: &str,
        relation_type: RelationType,
        metadata: Option<Map<String, Value>>,
    ) -> Result<Relation> {
        require_non_empty(memory_id, "memory_id")?;
        require_non_empty(target_id, "target_id")?;
        let request = CreateRelationRequest {
            target_id: target_id.to_string(),
            relation_type,
            metadata,
        };
        self.post(&format!("/v1/memories/{}/relations", encode(memory_id)), &request)
            .await
    }

    pub async fn list_relations(&self, memory_id: &str) -> Result<Vec<RelationWithMemory>> {
        require_non_empty(memory_id, "memory_id")?;
        let path = format!("/v1/memories/{}/relations", encode(memory_id));
        let response: RelationsResponse = self.executor.execute(RequestSpec::get(path)).await?;
        Ok(response.relations)
    }

    pub async fn delete_relation(&self, memory_id: &str, relation_id: &str) -> Result<DeleteResult> {
        require_non_empty(memory_id, "memory_id")?;
        require_non_empty(relation_id, "relation_id")?;
        let path = format!(
            "/v1/memories/{}/relations/{}",
            encode(memory_id),
            encode(relation_id)
        );
        self.executor.execute(RequestSpec::delete(path)).await
    }

    /// Relations of `memory_id` up to `depth` hops, keyed by memory ID.
    pub async fn memory_graph(&self, memory_id: &str, depth: u32) -> Result<RelationGraph> {
        require_non_empty(memory_id, "memory_id")?;
        graph::traverse(memory_id, depth, move |id: String| async move {
            self.list_relations(&id).await
        })
        .await
    }

    /// Relations of `memory_id`, optionally narrowed by type and direction.
    pub async fn find_related(
        &self,
        memory_id: &str,
        relation_type: Option<RelationType>,
        direction: Option<Direction>,
    ) -> Result<Vec<RelationWithMemory>> {
        let relations = self.list_relations(memory_id).await?;
        Ok(graph::filter_relations(relations, relation_type, direction))
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Free-tier usage for the authenticated wallet.
    pub async fn status(&self) -> Result<FreeTierStatus> {
        self.executor.execute(RequestSpec::get("/v1/free-tier/status")).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.executor.execute(RequestSpec::post(path, body)).await
    }
}

fn validate_store(request: &StoreRequest) -> Result<()> {
    require_non_empty(&request.content, "content")?;
    require_unit_range(request.importance, "importance")
}

/// Scores and thresholds live in `0.0..=1.0`; NaN is rejected too.
fn require_unit_range(value: Option<f64>, name: &str) -> Result<()> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(MemoClawError::InvalidInput(format!(
            "{} must be between 0.0 and 1.0, got {}",
            name, v
        ))),
        _ => Ok(()),
    }
}

fn require_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MemoClawError::InvalidInput(format!(
            "{} must be a non-empty string",
            name
        )));
    }
    Ok(())
}
