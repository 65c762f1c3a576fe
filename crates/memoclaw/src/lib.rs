//! MemoClaw SDK: typed client for the wallet-authenticated memory API.
//!
//! Store, recall and relate memories over HTTP. Every call goes through one
//! request executor that authenticates, runs hooks, retries transient failures
//! and maps error responses onto a typed taxonomy.
//!
//! # Key Features
//!
//! - **Auth** - session token, signed wallet (`address:timestamp:signature`) or plain wallet
//! - **Retries** - exponential backoff with jitter, `Retry-After` honored
//! - **Hooks** - before-request / after-response / on-error interceptors
//! - **Pagination** - `list_all` streams every memory lazily
//! - **Graph** - breadth-first walk over memory relations
//! - **Cancellation** - attach a `CancellationToken` to any request
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use memoclaw::{ListFilter, MemoClawClient, MemoClawConfig, RecallRequest, StoreRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MemoClawConfig::from_env()?;
//!     let client = MemoClawClient::new(config)?;
//!
//!     client.on_error(|method, path, err| eprintln!("{} {} failed: {}", method, path, err));
//!
//!     let stored = client
//!         .store(StoreRequest::new("we use JWT tokens").tags(["auth"]).importance(0.8))
//!         .await?;
//!     println!("stored {}", stored.id);
//!
//!     let recalled = client.recall(RecallRequest::new("how do we handle auth?").limit(5)).await?;
//!     println!("found {} memories", recalled.memories.len());
//!
//!     let all: Vec<_> = client
//!         .list_all(ListFilter::new().namespace("project"), 50)
//!         .try_collect()
//!         .await?;
//!     println!("{} memories in namespace", all.len());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod graph;
pub mod hooks;
pub mod pagination;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use auth::{AuthContext, AuthHeader, AuthProvider, WalletSigner};
pub use client::{MemoClawClient, MAX_BATCH_SIZE};
pub use config::MemoClawConfig;
pub use error::{ApiError, ApiErrorKind, MemoClawError, Result};
pub use executor::{PaymentHandler, RequestExecutor, RequestSpec};
pub use graph::RelationGraph;
pub use hooks::HookPipeline;
pub use pagination::Page;
pub use retry::RetryPolicy;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use types::{
    ConsolidateRequest, Direction, ExtractRequest, IngestRequest, ListFilter, Memory, MemoryType,
    Message, RecallRequest, RelationType, RelationWithMemory, StoreRequest, SuggestedCategory,
    SuggestedQuery, UpdateRequest,
};

// Cancellation tokens are part of the public request API.
pub use tokio_util::sync::CancellationToken;
