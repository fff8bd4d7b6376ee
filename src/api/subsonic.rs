//! Subsonic / Navidrome API client.
//!
//! Talks to the `/rest` endpoints of a Subsonic compatible server using
//! salted token authentication and JSON responses.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use super::auth::AuthToken;
use crate::converters;
use crate::engine::CatalogSource;
use crate::error::{Result, WrappedError};
use crate::models::{AlbumDetail, AlbumSummary};

/// Subsonic API version sent with every request.
pub const API_VERSION: &str = "1.16.1";

/// Client name sent with every request.
pub const CLIENT_NAME: &str = "wrapped";

/// Album list ordering used while paging the catalog.
const ALBUM_LIST_TYPE: &str = "alphabeticalByName";

/// Subsonic API client.
///
/// # Example
///
/// ```rust,no_run
/// use navidrome_wrapped::SubsonicApi;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = SubsonicApi::new("https://music.example.com", "alice", "secret")?;
///     api.ping().await?;
///     let albums = api.get_album_list(500, 0).await?;
///     println!("First page: {} albums", albums.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SubsonicApi {
    client: Client,
    base: String,
    user: String,
    password: String,
}

impl SubsonicApi {
    /// Create a new client for the server at `url`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` unless `url` starts with `http://` or `https://`.
    pub fn new(url: &str, user: &str, password: &str) -> Result<Self> {
        let root = normalize_root(url)?;
        let client = Client::builder()
            .user_agent(concat!("navidrome-wrapped/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WrappedError::ApiError(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            base: format!("{}/rest", root),
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    /// Username the client authenticates as.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Base URL of the REST endpoints.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Make an authenticated GET request and unwrap the response envelope.
    async fn get_api(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base, endpoint);
        debug!("GET {} with params: {:?}", url, params);

        let auth = AuthToken::generate(&self.password);
        let mut query: Vec<(&str, String)> = vec![
            ("u", self.user.clone()),
            ("t", auth.token),
            ("s", auth.salt),
            ("v", API_VERSION.to_string()),
            ("c", CLIENT_NAME.to_string()),
            ("f", "json".to_string()),
        ];
        query.extend(params.iter().cloned());

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let data: Value = response.json().await?;

        unwrap_envelope(data)
    }

    /// Check that the server is reachable and accepts the credentials.
    pub async fn ping(&self) -> Result<()> {
        self.get_api("ping", &[]).await.map(|_| ())
    }

    /// Get one page of albums ordered by name.
    pub async fn get_album_list(&self, size: u32, offset: u32) -> Result<Vec<AlbumSummary>> {
        let response = self
            .get_api(
                "getAlbumList2",
                &[
                    ("type", ALBUM_LIST_TYPE.to_string()),
                    ("size", size.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;
        Ok(converters::parse_album_list(&response))
    }

    /// Get an album with its songs.
    pub async fn get_album(&self, album_id: &str) -> Result<Option<AlbumDetail>> {
        let response = self
            .get_api("getAlbum", &[("id", album_id.to_string())])
            .await?;
        Ok(converters::parse_album_detail(&response))
    }
}

#[async_trait]
impl CatalogSource for SubsonicApi {
    async fn fetch_album_page(&self, page_size: u32, offset: u32) -> Result<Vec<AlbumSummary>> {
        self.get_album_list(page_size, offset).await
    }

    async fn fetch_album_detail(&self, album_id: &str) -> Result<Option<AlbumDetail>> {
        self.get_album(album_id).await
    }
}

/// Validate a server URL and strip trailing slashes.
fn normalize_root(url: &str) -> Result<String> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(WrappedError::InvalidUrl(format!(
            "{}: include http:// or https://",
            url
        )));
    }
    Ok(url.trim_end_matches('/').to_string())
}

/// Extract the `subsonic-response` body, mapping failed statuses to errors.
fn unwrap_envelope(data: Value) -> Result<Value> {
    let body = data
        .get("subsonic-response")
        .cloned()
        .ok_or_else(|| WrappedError::NoDataApi("missing subsonic-response".to_string()))?;

    let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("");
    if status == "ok" {
        return Ok(body);
    }

    let code = body
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|c| c.as_u64())
        .unwrap_or(0);
    let message = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string();
    error!("Subsonic API error {}: {}", code, message);

    match code {
        40 | 41 => Err(WrappedError::BadCredentials(message)),
        _ => Err(WrappedError::ApiError(format!("{} (code {})", message, code))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_root() {
        assert_eq!(
            normalize_root("https://music.example.com/").unwrap(),
            "https://music.example.com"
        );
        assert!(matches!(
            normalize_root("music.example.com"),
            Err(WrappedError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_new_builds_rest_base() {
        let api = SubsonicApi::new("http://localhost:4533//", "alice", "pw").unwrap();
        assert_eq!(api.base_url(), "http://localhost:4533/rest");
        assert_eq!(api.user(), "alice");
    }

    #[test]
    fn test_unwrap_envelope_ok() {
        let body = unwrap_envelope(json!({
            "subsonic-response": { "status": "ok", "version": "1.16.1" }
        }))
        .unwrap();
        assert_eq!(body["version"], "1.16.1");
    }

    #[test]
    fn test_unwrap_envelope_bad_credentials() {
        let err = unwrap_envelope(json!({
            "subsonic-response": {
                "status": "failed",
                "error": { "code": 40, "message": "Wrong username or password" }
            }
        }))
        .unwrap_err();
        assert!(matches!(err, WrappedError::BadCredentials(_)));
    }

    #[test]
    fn test_unwrap_envelope_other_failure() {
        let err = unwrap_envelope(json!({
            "subsonic-response": {
                "status": "failed",
                "error": { "code": 70, "message": "Album not found" }
            }
        }))
        .unwrap_err();
        assert!(matches!(err, WrappedError::ApiError(ref m) if m.contains("code 70")));
    }

    #[test]
    fn test_unwrap_envelope_missing() {
        assert!(matches!(
            unwrap_envelope(json!({ "foo": 1 })),
            Err(WrappedError::NoDataApi(_))
        ));
    }
}
