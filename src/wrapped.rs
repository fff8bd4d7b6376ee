//! High-level interface.
//!
//! Connects to a server, checks it answers, and runs the statistics
//! engine against it.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::api::SubsonicApi;
use crate::engine::{NoProgress, ProgressObserver, StatsEngine, WalkerConfig};
use crate::error::{Result, WrappedError};
use crate::models::Report;

/// Main wrapped interface.
///
/// # Example
///
/// ```rust,no_run
/// use navidrome_wrapped::Wrapped;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let wrapped = Wrapped::connect("https://music.example.com", "alice", "secret").await?;
///     let report = wrapped.generate().await?;
///     println!("{} songs, {} plays", report.total_songs, report.total_plays);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Wrapped {
    api: SubsonicApi,
    config: WalkerConfig,
}

impl Wrapped {
    /// Create a client and verify the server accepts the credentials.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` for a malformed URL, `BadCredentials` when the server
    /// rejects the login, `CatalogUnreachable` for any other ping failure.
    pub async fn connect(url: &str, user: &str, password: &str) -> Result<Self> {
        let api = SubsonicApi::new(url, user, password)?;
        match api.ping().await {
            Ok(()) => {}
            Err(e @ WrappedError::BadCredentials(_)) => return Err(e),
            Err(e) => {
                return Err(WrappedError::CatalogUnreachable(format!(
                    "Cannot reach server, check your URL and credentials: {}",
                    e
                )))
            }
        }
        info!("Connected to {} as {}", api.base_url(), user);
        Ok(Self::from_api(api))
    }

    /// Wrap an existing client without pinging it.
    pub fn from_api(api: SubsonicApi) -> Self {
        Self {
            api,
            config: WalkerConfig::default(),
        }
    }

    /// Albums requested per page.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.config = self.config.clone().with_page_size(page_size);
    }

    /// Pauses between page and album requests.
    pub fn set_pacing(&mut self, page_delay: Duration, album_delay: Duration) {
        self.config = self
            .config
            .clone()
            .with_page_delay(page_delay)
            .with_album_delay(album_delay);
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn api(&self) -> &SubsonicApi {
        &self.api
    }

    fn engine(&self) -> StatsEngine<SubsonicApi> {
        StatsEngine::new(self.api.clone())
            .with_config(self.config.clone())
            .with_username(self.api.user())
    }

    /// Build the report without progress output.
    pub async fn generate(&self) -> Result<Report> {
        self.generate_with_progress(&mut NoProgress).await
    }

    /// Build the report, reporting progress to `observer`.
    pub async fn generate_with_progress(&self, observer: &mut dyn ProgressObserver) -> Result<Report> {
        self.engine().run_with_progress(observer).await
    }
}

/// Write a report as pretty JSON.
pub fn save_report<P: AsRef<Path>>(report: &Report, path: P) -> Result<()> {
    std::fs::write(path.as_ref(), report.to_json_pretty()?)?;
    info!("Report written to {}", path.as_ref().display());
    Ok(())
}
