//! The catalog collaborator the walker pulls data from.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AlbumDetail, AlbumSummary};

/// Paginated access to a music catalog.
///
/// Implementations own transport concerns such as authentication,
/// timeouts and retries.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch up to `page_size` album summaries starting at `offset`.
    ///
    /// An empty page marks the end of the catalog.
    async fn fetch_album_page(&self, page_size: u32, offset: u32) -> Result<Vec<AlbumSummary>>;

    /// Fetch an album together with its songs, `None` when the album is unknown.
    async fn fetch_album_detail(&self, album_id: &str) -> Result<Option<AlbumDetail>>;
}
