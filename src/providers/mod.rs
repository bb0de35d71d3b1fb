//! The seam between the orchestrator and the platform-specific clients.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::future::Future;

use crate::errors::ResolveError;
use crate::models::Song;

/// One streaming platform's lookup surface. Implementations normalize
/// their platform's payloads into [`Song`] descriptors; they never panic
/// on malformed input and report failures as [`ResolveError`].
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Resolves a URL addressing a single item.
    async fn fetch_track(&self, url: &str) -> Result<Song, ResolveError>;

    /// Resolves a URL addressing a collection, preserving the source
    /// member order. Members that fail to resolve are skipped, not fatal.
    async fn fetch_collection(&self, url: &str) -> Result<Vec<Song>, ResolveError>;
}

/// Runs the supplied futures with at most `limit` in flight, yielding
/// outputs in the order the futures were supplied regardless of
/// completion order.
pub(crate) async fn buffered_ordered<I, F, T>(futures: I, limit: usize) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    stream::iter(futures).buffered(limit.max(1)).collect().await
}
