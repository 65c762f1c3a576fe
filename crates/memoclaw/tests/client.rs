//! Client operations against a scripted transport.
//!
//! Run with: cargo test -p memoclaw --test client

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{client, ScriptedTransport};
use futures::TryStreamExt;
use memoclaw::types::ConsolidateRequest;
use memoclaw::{
    Direction, ExtractRequest, IngestRequest, ListFilter, MemoClawError, Message, RecallRequest,
    RelationType, StoreRequest, SuggestedCategory, SuggestedQuery, UpdateRequest, MAX_BATCH_SIZE,
};
use reqwest::Method;
use serde_json::{json, Value};

fn memory(id: &str) -> Value {
    json!({"id": id, "content": format!("content of {}", id), "namespace": "default"})
}

fn page(ids: &[&str], total: u64) -> Value {
    json!({
        "memories": ids.iter().map(|id| memory(id)).collect::<Vec<_>>(),
        "total": total,
        "limit": 2,
        "offset": 0
    })
}

fn relation(target: &str, relation_type: &str, direction: &str) -> Value {
    json!({
        "id": format!("rel-{}", target),
        "relation_type": relation_type,
        "direction": direction,
        "memory": {"id": target, "content": "", "importance": 0.5, "memory_type": "general", "namespace": "default"},
        "created_at": "2025-01-01T00:00:00Z"
    })
}

fn relations(items: Vec<Value>) -> Value {
    json!({ "relations": items })
}

fn assert_invalid(err: MemoClawError) {
    assert!(matches!(err, MemoClawError::InvalidInput(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_store_posts_body() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(201, json!({"id": "m1", "stored": true, "tokens_used": 12}))]);
    let client = client(&transport, 0);

    let result = client
        .store(StoreRequest::new("prefers tabs").importance(0.7).tags(["style"]))
        .await?;

    assert_eq!(result.id, "m1");
    assert_eq!(result.tokens_used, 12);
    let request = transport.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url.as_str(), "https://api.test/v1/store");
    assert_eq!(
        request.json_body(),
        Some(json!({"content": "prefers tabs", "importance": 0.7, "metadata": {"tags": ["style"]}}))
    );
    Ok(())
}

#[tokio::test]
async fn test_validation_happens_before_network_and_hooks() {
    let transport = ScriptedTransport::empty();
    let client = client(&transport, 2);
    let hook_calls = Arc::new(AtomicUsize::new(0));
    let before = hook_calls.clone();
    let on_error = hook_calls.clone();
    client
        .on_before_request(move |_, _, _| {
            before.fetch_add(1, Ordering::SeqCst);
            None
        })
        .on_error(move |_, _, _| {
            on_error.fetch_add(1, Ordering::SeqCst);
        });

    assert_invalid(client.store(StoreRequest::new("   ")).await.unwrap_err());
    assert_invalid(client.recall(RecallRequest::new("")).await.unwrap_err());
    assert_invalid(client.get("").await.unwrap_err());
    assert_invalid(client.delete(" ").await.unwrap_err());
    assert_invalid(client.update("m1", UpdateRequest::new().content("")).await.unwrap_err());
    assert_invalid(client.ingest(IngestRequest::default()).await.unwrap_err());
    assert_invalid(client.extract(ExtractRequest::new(vec![])).await.unwrap_err());
    assert_invalid(client.delete_relation("m1", "").await.unwrap_err());
    assert_invalid(client.memory_graph("", 2).await.unwrap_err());

    assert_eq!(transport.calls(), 0);
    assert_eq!(hook_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_batch_limits() {
    let transport = ScriptedTransport::empty();
    let client = client(&transport, 0);

    assert_invalid(client.store_batch(vec![]).await.unwrap_err());

    let too_many = (0..=MAX_BATCH_SIZE)
        .map(|i| StoreRequest::new(format!("memory {}", i)))
        .collect();
    let err = client.store_batch(too_many).await.unwrap_err();
    assert!(err.to_string().contains("101"));

    let with_blank = vec![StoreRequest::new("ok"), StoreRequest::new("")];
    assert_invalid(client.store_batch(with_blank).await.unwrap_err());

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_store_batch_wraps_memories() -> anyhow::Result<()> {
    let transport =
        ScriptedTransport::json([(201, json!({"ids": ["a", "b"], "stored": true, "count": 2}))]);
    let client = client(&transport, 0);

    let result = client
        .store_batch(vec![StoreRequest::new("one"), StoreRequest::new("two").pinned(true)])
        .await?;

    assert_eq!(result.count, 2);
    let request = transport.last();
    assert_eq!(request.url.path(), "/v1/store/batch");
    assert_eq!(
        request.json_body(),
        Some(json!({"memories": [{"content": "one"}, {"content": "two", "pinned": true}]}))
    );
    Ok(())
}

#[tokio::test]
async fn test_scores_outside_unit_range_rejected() {
    let transport = ScriptedTransport::empty();
    let client = client(&transport, 0);

    assert_invalid(client.store(StoreRequest::new("x").importance(1.5)).await.unwrap_err());
    assert_invalid(client.store(StoreRequest::new("x").importance(-0.1)).await.unwrap_err());
    assert_invalid(client.store(StoreRequest::new("x").importance(f64::NAN)).await.unwrap_err());
    assert_invalid(
        client
            .store_batch(vec![StoreRequest::new("ok"), StoreRequest::new("x").importance(2.0)])
            .await
            .unwrap_err(),
    );
    assert_invalid(
        client
            .recall(RecallRequest::new("auth").min_similarity(1.01))
            .await
            .unwrap_err(),
    );
    assert_invalid(
        client
            .consolidate(ConsolidateRequest::new().min_similarity(-1.0))
            .await
            .unwrap_err(),
    );
    assert_invalid(
        client
            .update("m1", UpdateRequest::new().importance(f64::NAN))
            .await
            .unwrap_err(),
    );

    let err = client.store(StoreRequest::new("x").importance(1.5)).await.unwrap_err();
    assert!(err.to_string().contains("importance"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_store_batch_chunked_splits_and_merges() -> anyhow::Result<()> {
    let chunk_reply = |prefix: &str, n: usize| {
        let ids: Vec<String> = (0..n).map(|i| format!("{}{}", prefix, i)).collect();
        (
            201,
            json!({"ids": ids, "stored": true, "count": n, "deduplicated_count": 1, "tokens_used": 10}),
        )
    };
    let transport = ScriptedTransport::json([
        chunk_reply("a", 100),
        chunk_reply("b", 100),
        chunk_reply("c", 50),
    ]);
    let client = client(&transport, 0);

    let memories = (0..250)
        .map(|i| StoreRequest::new(format!("memory {}", i)))
        .collect();
    let result = client.store_batch_chunked(memories).await?;

    assert!(result.stored);
    assert_eq!(result.count, 250);
    assert_eq!(result.ids.len(), 250);
    assert_eq!(result.ids[0], "a0");
    assert_eq!(result.ids[249], "c49");
    assert_eq!(result.deduplicated_count, 3);
    assert_eq!(result.tokens_used, 30);

    let sizes: Vec<usize> = transport
        .requests()
        .iter()
        .map(|r| r.json_body().unwrap()["memories"].as_array().unwrap().len())
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    Ok(())
}

#[tokio::test]
async fn test_store_batch_chunked_validates_everything_first() -> anyhow::Result<()> {
    let transport = ScriptedTransport::empty();
    let client = client(&transport, 0);

    let mut memories: Vec<StoreRequest> = (0..150)
        .map(|i| StoreRequest::new(format!("memory {}", i)))
        .collect();
    memories.push(StoreRequest::new(""));
    assert_invalid(client.store_batch_chunked(memories).await.unwrap_err());
    assert_eq!(transport.calls(), 0);

    let empty = client.store_batch_chunked(vec![]).await?;
    assert!(!empty.stored);
    assert_eq!(empty.count, 0);
    assert!(empty.ids.is_empty());
    assert_eq!(transport.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_list_query_string() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(200, page(&["m1"], 1))]);
    let client = client(&transport, 0);

    let filter = ListFilter::new().namespace("work").tags(["a", "b"]).session_id("s1");
    let response = client.list(&filter, 10, 20).await?;

    assert_eq!(response.memories.len(), 1);
    let request = transport.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.url.query(),
        Some("limit=10&offset=20&namespace=work&tags=a%2Cb&session_id=s1")
    );
    assert!(request.body.is_none());
    Ok(())
}

#[tokio::test]
async fn test_list_all_pages_lazily() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(200, page(&["m1", "m2"], 3)), (200, page(&["m3"], 3))]);
    let client = client(&transport, 0);

    let ids: Vec<String> = client
        .list_all(ListFilter::new(), 2)
        .map_ok(|memory| memory.id)
        .try_collect()
        .await?;

    assert_eq!(ids, vec!["m1", "m2", "m3"]);
    let offsets: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|r| r.url.query().map(str::to_string))
        .collect();
    assert_eq!(
        offsets,
        vec![Some("limit=2&offset=0".to_string()), Some("limit=2&offset=2".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn test_list_all_zero_batch_size() {
    let transport = ScriptedTransport::empty();
    let client = client(&transport, 0);

    let result: Result<Vec<_>, _> = client.list_all(ListFilter::new(), 0).try_collect().await;

    assert_invalid(result.unwrap_err());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_update_sends_patch() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(200, memory("m1"))]);
    let client = client(&transport, 0);

    let updated = client
        .update("m1", UpdateRequest::new().importance(0.9).clear_expiry())
        .await?;

    assert_eq!(updated.id, "m1");
    let request = transport.last();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.url.path(), "/v1/memories/m1");
    assert_eq!(request.json_body(), Some(json!({"importance": 0.9, "expires_at": null})));
    Ok(())
}

#[tokio::test]
async fn test_ids_are_path_encoded() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(200, json!({"deleted": true}))]);
    let client = client(&transport, 0);

    let result = client.delete_relation("m 1", "r/2").await?;

    assert!(result.deleted);
    assert_eq!(transport.last().url.path(), "/v1/memories/m%201/relations/r%2F2");
    Ok(())
}

#[tokio::test]
async fn test_ingest_and_extract_paths() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([
        (200, json!({"memory_ids": ["a"], "facts_extracted": 1, "facts_stored": 1})),
        (200, json!({"memory_ids": ["b"], "facts_extracted": 2})),
        (200, json!({"clusters_found": 0})),
    ]);
    let client = client(&transport, 0);

    let ingested = client
        .ingest(IngestRequest::text("we deploy on fridays").auto_relate(true))
        .await?;
    assert_eq!(ingested.facts_stored, 1);

    let extracted = client
        .extract(ExtractRequest::new(vec![Message::user("hi"), Message::assistant("hello")]))
        .await?;
    assert_eq!(extracted.facts_extracted, 2);

    let consolidated = client
        .consolidate(ConsolidateRequest::new().dry_run(true))
        .await?;
    assert_eq!(consolidated.clusters_found, 0);

    let paths: Vec<String> = transport
        .requests()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/v1/ingest", "/v1/memories/extract", "/v1/memories/consolidate"]);
    Ok(())
}

#[tokio::test]
async fn test_suggested_query() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(200, json!({"suggested": [], "total": 0}))]);
    let client = client(&transport, 0);

    client
        .suggested(&SuggestedQuery::new().limit(5).category(SuggestedCategory::Stale))
        .await?;

    assert_eq!(transport.last().url.query(), Some("limit=5&category=stale"));
    Ok(())
}

#[tokio::test]
async fn test_create_relation_body() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(201, json!({
        "id": "r1", "source_id": "m1", "target_id": "m2", "relation_type": "supersedes"
    }))]);
    let client = client(&transport, 0);

    let relation = client
        .create_relation("m1", "m2", RelationType::Supersedes, None)
        .await?;

    assert_eq!(relation.target_id, "m2");
    let request = transport.last();
    assert_eq!(request.url.path(), "/v1/memories/m1/relations");
    assert_eq!(
        request.json_body(),
        Some(json!({"target_id": "m2", "relation_type": "supersedes"}))
    );
    Ok(())
}

#[tokio::test]
async fn test_memory_graph_does_not_refetch_root() -> anyhow::Result<()> {
    // root → a, b; a → root
    let transport = ScriptedTransport::json([
        (200, relations(vec![
            relation("a", "related_to", "outgoing"),
            relation("b", "supports", "outgoing"),
        ])),
        (200, relations(vec![relation("root", "related_to", "incoming")])),
        (200, relations(vec![])),
    ]);
    let client = client(&transport, 0);

    let graph = client.memory_graph("root", 2).await?;

    assert_eq!(graph.len(), 3);
    assert_eq!(graph["root"].len(), 2);
    let paths: Vec<String> = transport
        .requests()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/v1/memories/root/relations",
            "/v1/memories/a/relations",
            "/v1/memories/b/relations",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_find_related_filters() -> anyhow::Result<()> {
    let transport = ScriptedTransport::json([(200, relations(vec![
        relation("a", "contradicts", "outgoing"),
        relation("b", "contradicts", "incoming"),
        relation("c", "supports", "incoming"),
    ]))]);
    let client = client(&transport, 0);

    let found = client
        .find_related("m1", Some(RelationType::Contradicts), Some(Direction::Incoming))
        .await?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].memory.id, "b");
    Ok(())
}
