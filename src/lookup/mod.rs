//! Remote lookups: item name -> entity id, and entity id -> related claims.
//!
//! Both seams swallow every remote failure and hand back `None`; the
//! orchestrator alone decides what the user hears.

mod client;
mod fetcher;
mod resolver;

pub use client::{build_client, RetryPolicy};
pub use fetcher::HttpClaimsFetcher;
pub use resolver::HttpEntityResolver;

use async_trait::async_trait;

/// Maps a spoken item name to an external entity identifier.
#[async_trait]
pub trait EntityResolver: Send + Sync {
    /// `None` when the service fails, the body is empty or malformed,
    /// or the identifier is missing/null.
    async fn resolve(&self, item_name: &str) -> Option<String>;
}

/// Fetches the one-hop traversal document for an entity and relationship.
#[async_trait]
pub trait ClaimsFetcher: Send + Sync {
    /// Raw traversal document, or `None` on network failure, timeout,
    /// non-success status or an empty body.
    async fn fetch_claims(&self, entity_id: &str, relationship_id: &str) -> Option<String>;
}
