//! Request and response payloads for the MemoClaw API.
//!
//! Requests use builder-style setters; unset optional fields are omitted from
//! the wire body. Responses are lenient: anything the server may leave out
//! has a serde default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Kind of memory being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Correction,
    Preference,
    Decision,
    Project,
    Observation,
    #[default]
    General,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Correction => "correction",
            MemoryType::Preference => "preference",
            MemoryType::Decision => "decision",
            MemoryType::Project => "project",
            MemoryType::Observation => "observation",
            MemoryType::General => "general",
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label on a directed edge between two memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    RelatedTo,
    DerivedFrom,
    Contradicts,
    Supersedes,
    Supports,
}

/// Edge direction relative to the memory whose relations were listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedCategory {
    Stale,
    Fresh,
    Hot,
    Decaying,
}

impl SuggestedCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestedCategory::Stale => "stale",
            SuggestedCategory::Fresh => "fresh",
            SuggestedCategory::Hot => "hot",
            SuggestedCategory::Decaying => "decaying",
        }
    }
}

/// Conversation turn used by ingest/extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

// ── Memories ────────────────────────────────────────────────────────────────

/// A stored memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub embedding_model: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub memory_type: MemoryType,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub accessed_at: String,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Summary of the memory on the other end of a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedMemorySummary {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub memory_type: String,
    #[serde(default)]
    pub namespace: String,
}

/// A relation as listed from one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationWithMemory {
    pub id: String,
    pub relation_type: RelationType,
    pub direction: Direction,
    pub memory: RelatedMemorySummary,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub created_at: String,
}

/// A created relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation_type: RelationType,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationsResponse {
    #[serde(default)]
    pub relations: Vec<RelationWithMemory>,
}

// ── Store ───────────────────────────────────────────────────────────────────

/// Memory to store, alone or as part of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<MemoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    /// Free-form metadata; tags are folded in under `metadata.tags`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl StoreRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn memory_type(mut self, memory_type: MemoryType) -> Self {
        self.memory_type = Some(memory_type);
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }

    /// ISO 8601 expiry.
    pub fn expires_at(mut self, ts: impl Into<String>) -> Self {
        self.expires_at = Some(ts.into());
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    /// Set one metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Set tags (stored as `metadata.tags`).
    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.metadata("tags", Value::Array(tags))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreResult {
    pub id: String,
    #[serde(default)]
    pub stored: bool,
    #[serde(default)]
    pub deduplicated: bool,
    #[serde(default)]
    pub tokens_used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreBatchResult {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub stored: bool,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub deduplicated_count: u64,
    #[serde(default)]
    pub tokens_used: u64,
}

// ── Recall ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecallFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Only memories created after this ISO 8601 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<MemoryType>,
}

/// Semantic recall query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecallRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_relations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<RecallFilters>,
}

impl RecallRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn min_similarity(mut self, min: f64) -> Self {
        self.min_similarity = Some(min);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }

    pub fn include_relations(mut self, on: bool) -> Self {
        self.include_relations = Some(on);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.get_or_insert_with(Default::default).tags =
            Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn after(mut self, ts: impl Into<String>) -> Self {
        self.filters.get_or_insert_with(Default::default).after = Some(ts.into());
        self
    }

    pub fn memory_type(mut self, memory_type: MemoryType) -> Self {
        self.filters.get_or_insert_with(Default::default).memory_type = Some(memory_type);
        self
    }
}

/// Per-signal breakdown of a recall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallSignals {
    pub vector: f64,
    pub keyword: f64,
    pub recency: f64,
    pub base_importance: f64,
    pub effective_importance: f64,
    pub context_importance: f64,
    pub relation_count: u64,
    pub type_decay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallMemory {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub memory_type: MemoryType,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub relations: Option<Vec<RelationWithMemory>>,
    #[serde(default, rename = "_signals")]
    pub signals: Option<RecallSignals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallResponse {
    #[serde(default)]
    pub memories: Vec<RecallMemory>,
    #[serde(default)]
    pub query_tokens: u64,
}

// ── List ────────────────────────────────────────────────────────────────────

/// Scoping shared by list and paginated iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub namespace: Option<String>,
    pub tags: Option<Vec<String>>,
    pub session_id: Option<String>,
    pub agent_id: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }

    /// Query parameters for the set fields; tags are comma-joined.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ns) = &self.namespace {
            query.push(("namespace".to_string(), ns.clone()));
        }
        if let Some(tags) = &self.tags {
            query.push(("tags".to_string(), tags.join(",")));
        }
        if let Some(id) = &self.session_id {
            query.push(("session_id".to_string(), id.clone()));
        }
        if let Some(id) = &self.agent_id {
            query.push(("agent_id".to_string(), id.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub memories: Vec<Memory>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

// ── Update / delete ─────────────────────────────────────────────────────────

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<MemoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    /// `Some(None)` clears the expiry (sent as `null`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Option<String>>,
}

impl UpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn memory_type(mut self, memory_type: MemoryType) -> Self {
        self.memory_type = Some(memory_type);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn expires_at(mut self, ts: impl Into<String>) -> Self {
        self.expires_at = Some(Some(ts.into()));
        self
    }

    pub fn clear_expiry(mut self) -> Self {
        self.expires_at = Some(None);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub id: Option<String>,
}

// ── Ingest / extract ────────────────────────────────────────────────────────

/// Auto-extract facts from a conversation or raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_relate: Option<bool>,
}

impl IngestRequest {
    pub fn messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Some(messages),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }

    pub fn auto_relate(mut self, on: bool) -> Self {
        self.auto_relate = Some(on);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResult {
    #[serde(default)]
    pub memory_ids: Vec<String>,
    #[serde(default)]
    pub facts_extracted: u64,
    #[serde(default)]
    pub facts_stored: u64,
    #[serde(default)]
    pub facts_deduplicated: u64,
    #[serde(default)]
    pub relations_created: u64,
    #[serde(default)]
    pub tokens_used: u64,
}

/// LLM fact extraction over a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl ExtractRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    #[serde(default)]
    pub memory_ids: Vec<String>,
    #[serde(default)]
    pub facts_extracted: u64,
    #[serde(default)]
    pub facts_stored: u64,
    #[serde(default)]
    pub facts_deduplicated: u64,
    #[serde(default)]
    pub tokens_used: u64,
}

// ── Consolidate ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsolidateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl ConsolidateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn min_similarity(mut self, min: f64) -> Self {
        self.min_similarity = Some(min);
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = Some(on);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub memory_ids: Vec<String>,
    pub similarity: f64,
    #[serde(default)]
    pub merged_into: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidateResult {
    #[serde(default)]
    pub clusters_found: u64,
    #[serde(default)]
    pub memories_merged: u64,
    #[serde(default)]
    pub memories_created: u64,
    #[serde(default)]
    pub clusters: Vec<ClusterInfo>,
}

// ── Suggested ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestedQuery {
    pub limit: Option<u32>,
    pub namespace: Option<String>,
    pub session_id: Option<String>,
    pub agent_id: Option<String>,
    pub category: Option<SuggestedCategory>,
}

impl SuggestedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn category(mut self, category: SuggestedCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(ns) = &self.namespace {
            query.push(("namespace".to_string(), ns.clone()));
        }
        if let Some(id) = &self.session_id {
            query.push(("session_id".to_string(), id.clone()));
        }
        if let Some(id) = &self.agent_id {
            query.push(("agent_id".to_string(), id.clone()));
        }
        if let Some(category) = self.category {
            query.push(("category".to_string(), category.as_str().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedMemory {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub memory_type: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub accessed_at: String,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub relation_count: u64,
    pub category: SuggestedCategory,
    #[serde(default)]
    pub review_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedResponse {
    #[serde(default)]
    pub suggested: Vec<SuggestedMemory>,
    #[serde(default)]
    pub categories: HashMap<String, u64>,
    #[serde(default)]
    pub total: u64,
}

// ── Relations / status ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRelationRequest {
    pub target_id: String,
    pub relation_type: RelationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Free-tier usage for the authenticated wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTierStatus {
    pub wallet: String,
    pub free_tier_remaining: u64,
    pub free_tier_total: u64,
    pub free_tier_used: u64,
}
