//! Sequential walk over a paginated catalog.
//!
//! Album pages are requested at increasing offsets until an empty page
//! comes back, then each album is expanded into its songs. Requests are
//! never issued in parallel.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::progress::{ProgressPhase, ProgressTracker};
use super::source::CatalogSource;
use crate::error::{Result, WrappedError};
use crate::models::{AlbumDetail, AlbumSummary};

/// Album count the paging progress is scaled against.
const EXPECTED_ALBUMS: f64 = 5000.0;

/// Tunables for a catalog walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Albums requested per page.
    pub page_size: u32,
    /// Pause after each album page.
    pub page_delay: Duration,
    /// Pause after each album detail request.
    pub album_delay: Duration,
    /// Emit a song-phase progress event every this many albums.
    pub progress_every: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            page_delay: Duration::from_millis(100),
            album_delay: Duration::from_millis(50),
            progress_every: 50,
        }
    }
}

impl WalkerConfig {
    /// Config with no pauses, for local sources and tests.
    pub fn unpaced() -> Self {
        Self {
            page_delay: Duration::ZERO,
            album_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_album_delay(mut self, delay: Duration) -> Self {
        self.album_delay = delay;
        self
    }

    pub fn with_progress_every(mut self, albums: usize) -> Self {
        self.progress_every = albums.max(1);
        self
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Walks a [`CatalogSource`] from the first page.
///
/// A walker holds no cursor; every call to [`walk`](Self::walk) starts over.
pub struct CatalogWalker<'a, S: CatalogSource + ?Sized> {
    source: &'a S,
    config: &'a WalkerConfig,
}

impl<'a, S: CatalogSource + ?Sized> CatalogWalker<'a, S> {
    pub fn new(source: &'a S, config: &'a WalkerConfig) -> Self {
        Self { source, config }
    }

    /// Collect every album summary, page by page.
    ///
    /// # Errors
    ///
    /// `CatalogUnreachable` if the first page fails, `PageFetchFailed`
    /// for any later page.
    pub async fn fetch_album_summaries(
        &self,
        progress: &mut ProgressTracker<'_>,
    ) -> Result<Vec<AlbumSummary>> {
        let page_size = self.config.page_size.max(1);
        let mut albums: Vec<AlbumSummary> = Vec::new();
        let mut offset: u32 = 0;

        progress.report(0.0, "Starting album scan", ProgressPhase::Albums);
        loop {
            let page = match self.source.fetch_album_page(page_size, offset).await {
                Ok(page) => page,
                Err(e) if offset == 0 => {
                    return Err(WrappedError::CatalogUnreachable(e.to_string()));
                }
                Err(e) => {
                    return Err(WrappedError::PageFetchFailed {
                        offset,
                        reason: e.to_string(),
                    });
                }
            };

            if page.is_empty() {
                debug!("Empty album page at offset {}, catalog exhausted", offset);
                break;
            }

            offset = offset.saturating_add(page.len() as u32);
            albums.extend(page);

            let percent = (10.0 + albums.len() as f64 / EXPECTED_ALBUMS * 20.0).min(30.0);
            progress.report(
                percent,
                format!("Fetched {} albums", albums.len()),
                ProgressPhase::Albums,
            );

            pause(self.config.page_delay).await;
        }

        info!("Found {} albums", albums.len());
        progress.report(
            30.0,
            format!("Processing {} albums", albums.len()),
            ProgressPhase::Albums,
        );
        Ok(albums)
    }

    /// Fetch the songs of one album.
    ///
    /// Never fails: a failed or empty lookup yields an album with no songs.
    pub async fn expand_album(&self, summary: &AlbumSummary) -> AlbumDetail {
        if summary.id.is_empty() {
            debug!("Album '{}' has no id, skipping detail lookup", summary.name);
            return AlbumDetail::empty(summary);
        }

        match self.source.fetch_album_detail(&summary.id).await {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                warn!("Album {} returned no detail", summary.id);
                AlbumDetail::empty(summary)
            }
            Err(e) => {
                warn!("Could not fetch album {}: {}", summary.id, e);
                AlbumDetail::empty(summary)
            }
        }
    }

    /// Walk the whole catalog, handing each expanded album to `on_album`.
    ///
    /// Returns the album summaries in catalog order.
    pub async fn walk<F>(
        &self,
        progress: &mut ProgressTracker<'_>,
        mut on_album: F,
    ) -> Result<Vec<AlbumSummary>>
    where
        F: FnMut(&AlbumSummary, AlbumDetail),
    {
        let albums = self.fetch_album_summaries(progress).await?;
        let total = albums.len();
        let every = self.config.progress_every.max(1);

        for (i, summary) in albums.iter().enumerate() {
            let detail = self.expand_album(summary).await;
            on_album(summary, detail);

            if i % every == 0 {
                progress.report(
                    30.0 + i as f64 / total as f64 * 60.0,
                    format!("Album {}/{}", i, total),
                    ProgressPhase::Songs,
                );
            }

            pause(self.config.album_delay).await;
        }

        Ok(albums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::progress::{NoProgress, ProgressEvent};
    use crate::models::SongRaw;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory catalog that records the calls it receives.
    struct PagedCatalog {
        albums: Vec<AlbumSummary>,
        fail_page_at: Option<u32>,
        fail_detail: Vec<String>,
        page_calls: Mutex<Vec<(u32, u32)>>,
    }

    impl PagedCatalog {
        fn with_albums(n: usize) -> Self {
            Self {
                albums: (0..n)
                    .map(|i| AlbumSummary {
                        id: format!("al-{}", i),
                        name: format!("Album {}", i),
                        ..Default::default()
                    })
                    .collect(),
                fail_page_at: None,
                fail_detail: Vec::new(),
                page_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for PagedCatalog {
        async fn fetch_album_page(&self, page_size: u32, offset: u32) -> Result<Vec<AlbumSummary>> {
            self.page_calls.lock().unwrap().push((page_size, offset));
            if self.fail_page_at == Some(offset) {
                return Err(WrappedError::ApiError("boom".to_string()));
            }
            Ok(self
                .albums
                .iter()
                .skip(offset as usize)
                .take(page_size as usize)
                .cloned()
                .collect())
        }

        async fn fetch_album_detail(&self, album_id: &str) -> Result<Option<AlbumDetail>> {
            if self.fail_detail.iter().any(|id| id == album_id) {
                return Err(WrappedError::ApiError("detail failed".to_string()));
            }
            Ok(Some(AlbumDetail {
                id: album_id.to_string(),
                songs: vec![SongRaw::default()],
                ..Default::default()
            }))
        }
    }

    #[test]
    fn test_pages_until_empty() {
        let catalog = PagedCatalog::with_albums(5);
        let config = WalkerConfig::unpaced().with_page_size(2);
        let walker = CatalogWalker::new(&catalog, &config);
        let mut observer = NoProgress;
        let mut progress = ProgressTracker::new(&mut observer);

        let albums = tokio_test::block_on(walker.fetch_album_summaries(&mut progress)).unwrap();
        assert_eq!(albums.len(), 5);
        assert_eq!(
            *catalog.page_calls.lock().unwrap(),
            vec![(2, 0), (2, 2), (2, 4), (2, 5)]
        );
    }

    #[test]
    fn test_empty_first_page_stops_immediately() {
        let catalog = PagedCatalog::with_albums(0);
        let config = WalkerConfig::unpaced().with_page_size(10_000);
        let walker = CatalogWalker::new(&catalog, &config);
        let mut observer = NoProgress;
        let mut progress = ProgressTracker::new(&mut observer);

        let albums = tokio_test::block_on(walker.fetch_album_summaries(&mut progress)).unwrap();
        assert!(albums.is_empty());
        assert_eq!(catalog.page_calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_first_page_failure_is_unreachable() {
        let mut catalog = PagedCatalog::with_albums(3);
        catalog.fail_page_at = Some(0);
        let config = WalkerConfig::unpaced();
        let walker = CatalogWalker::new(&catalog, &config);
        let mut observer = NoProgress;
        let mut progress = ProgressTracker::new(&mut observer);

        let err = tokio_test::block_on(walker.fetch_album_summaries(&mut progress)).unwrap_err();
        assert!(matches!(err, WrappedError::CatalogUnreachable(_)));
    }

    #[test]
    fn test_later_page_failure_terminates_walk() {
        let mut catalog = PagedCatalog::with_albums(3);
        catalog.fail_page_at = Some(2);
        let config = WalkerConfig::unpaced().with_page_size(2);
        let walker = CatalogWalker::new(&catalog, &config);
        let mut observer = NoProgress;
        let mut progress = ProgressTracker::new(&mut observer);

        let err = tokio_test::block_on(walker.fetch_album_summaries(&mut progress)).unwrap_err();
        assert!(matches!(err, WrappedError::PageFetchFailed { offset: 2, .. }));
    }

    #[tokio::test]
    async fn test_detail_failure_contributes_no_songs() {
        let mut catalog = PagedCatalog::with_albums(3);
        catalog.fail_detail = vec!["al-1".to_string()];
        let config = WalkerConfig::unpaced();
        let walker = CatalogWalker::new(&catalog, &config);
        let mut observer = NoProgress;
        let mut progress = ProgressTracker::new(&mut observer);

        let mut song_counts = Vec::new();
        let albums = walker
            .walk(&mut progress, |summary, detail| {
                song_counts.push((summary.id.clone(), detail.songs.len()))
            })
            .await
            .unwrap();

        assert_eq!(albums.len(), 3);
        assert_eq!(
            song_counts,
            vec![
                ("al-0".to_string(), 1),
                ("al-1".to_string(), 0),
                ("al-2".to_string(), 1)
            ]
        );
    }

    #[tokio::test]
    async fn test_progress_is_non_decreasing_and_bounded() {
        let catalog = PagedCatalog::with_albums(7);
        let config = WalkerConfig::unpaced()
            .with_page_size(3)
            .with_progress_every(2);
        let walker = CatalogWalker::new(&catalog, &config);
        let mut events: Vec<ProgressEvent> = Vec::new();
        let mut observer = |e: &ProgressEvent| events.push(e.clone());
        {
            let mut progress = ProgressTracker::new(&mut observer);
            walker.walk(&mut progress, |_, _| {}).await.unwrap();
        }

        assert!(!events.is_empty());
        assert!(events.windows(2).all(|w| w[0].percent <= w[1].percent));
        assert!(events.iter().all(|e| e.percent < 90));
        assert!(events.iter().any(|e| e.phase == ProgressPhase::Songs));
    }
}
