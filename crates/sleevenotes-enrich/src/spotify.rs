//! Spotify Web API client.
//!
//! Supplies the album side of the pipeline: metadata, the ordered track
//! list (fetched in 50-track pages and concatenated, which fixes the
//! index space everything downstream addresses), cover bytes, and a thin
//! album-search passthrough.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use sleevenotes_core::model::{Album, AlbumImage, Artist, Track};

use crate::error::{EnrichError, EnrichResult};

const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Tracks are fetched in pages of this size and concatenated in order.
const TRACK_PAGE_SIZE: usize = 50;

/// Album search returns at most this many candidates.
const SEARCH_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<Track>,
    total: usize,
}

#[derive(Debug, Deserialize)]
struct AlbumSearchResponse {
    albums: AlbumSearchPage,
}

#[derive(Debug, Deserialize)]
struct AlbumSearchPage {
    #[serde(default)]
    items: Vec<AlbumSummary>,
}

/// Simplified album object as returned by search (no track paging).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub images: Vec<AlbumImage>,
}

/// Spotify Web API client holding a client-credentials bearer token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    token: String,
}

impl SpotifyClient {
    /// Create a client around an already-obtained access token.
    pub fn new(token: String) -> Self {
        Self {
            http: Client::builder()
                .user_agent("sleevenotes/0.1.0 (https://github.com/oxur/sleevenotes)")
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            token,
        }
    }

    /// Exchange client credentials for an access token and return a
    /// ready client.
    pub async fn authenticate(client_id: &str, client_secret: &str) -> EnrichResult<Self> {
        #[derive(Debug, Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let http = Client::builder()
            .user_agent("sleevenotes/0.1.0 (https://github.com/oxur/sleevenotes)")
            .timeout(Duration::from_secs(30))
            .build()?;

        let response = http
            .post(SPOTIFY_TOKEN_URL)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| EnrichError::Auth {
                source_name: "Spotify".to_string(),
                message: e.to_string(),
            })?;

        let token: TokenResponse = response.json().await.map_err(|e| EnrichError::Parse {
            source_name: "Spotify".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            http,
            token: token.access_token,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> EnrichResult<T> {
        let response = self
            .http
            .get(format!("{SPOTIFY_API_BASE}{path}"))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| EnrichError::Http {
                source_name: "Spotify".to_string(),
                message: e.to_string(),
            })?;

        response.json().await.map_err(|e| EnrichError::Parse {
            source_name: "Spotify".to_string(),
            message: e.to_string(),
        })
    }

    /// Search albums by free text, a thin passthrough.
    pub async fn search_albums(&self, query: &str) -> EnrichResult<Vec<AlbumSummary>> {
        let limit = SEARCH_LIMIT.to_string();
        let result: AlbumSearchResponse = self
            .get_json(
                "/search",
                &[("q", query), ("type", "album"), ("limit", limit.as_str())],
            )
            .await?;
        Ok(result.albums.items)
    }

    /// Album metadata by id.
    pub async fn album(&self, id: &str) -> EnrichResult<Album> {
        self.get_json(&format!("/albums/{id}"), &[]).await
    }

    /// The album's full track list, page by page, in album order.
    pub async fn album_tracks(&self, id: &str) -> EnrichResult<Vec<Track>> {
        let mut tracks: Vec<Track> = Vec::new();

        loop {
            let offset = tracks.len().to_string();
            let limit = TRACK_PAGE_SIZE.to_string();
            let page: TracksPage = self
                .get_json(
                    &format!("/albums/{id}/tracks"),
                    &[("limit", limit.as_str()), ("offset", offset.as_str())],
                )
                .await?;

            let fetched = page.items.len();
            tracks.extend(page.items);

            if fetched == 0 || tracks.len() >= page.total {
                break;
            }
        }

        Ok(tracks)
    }

    /// Raw bytes of a cover-art URL.
    pub async fn cover_bytes(&self, url: &str) -> EnrichResult<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| EnrichError::Http {
                source_name: "Spotify".to_string(),
                message: e.to_string(),
            })?;

        Ok(response.bytes().await?.to_vec())
    }
}
