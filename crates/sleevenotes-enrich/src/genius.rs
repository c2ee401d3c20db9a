//! Genius API client.
//!
//! Thin typed wrapper over the three endpoints the annotator needs:
//! free-text search, song detail, and annotation detail. The response
//! structs mirror the API's nesting (`response.hits[].result`, etc.) and
//! stay private where nothing downstream needs them.
//!
//! The [`AnnotationIndex`] trait is the seam the annotator consumes, so
//! tests can drive the pipeline against an in-memory index.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use sleevenotes_core::document::DocNode;
use sleevenotes_core::model::SearchHit;

use crate::error::{EnrichError, EnrichResult};

const GENIUS_API_BASE: &str = "https://api.genius.com";

/// The narrow contract the annotator has on the annotation index.
#[async_trait]
pub trait AnnotationIndex: Send + Sync {
    /// Free-text search; hits come back in the index's own order.
    async fn search(&self, query: &str) -> EnrichResult<Vec<SearchHit>>;

    /// Song detail for a previously returned hit.
    async fn song(&self, id: u64) -> EnrichResult<Song>;

    /// Annotation detail by annotation id.
    async fn annotation(&self, id: u64) -> EnrichResult<Annotation>;
}

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchSection,
}

#[derive(Debug, Deserialize)]
struct SearchSection {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    /// Absent on non-song hits; those carry nothing matchable.
    result: Option<RawHitResult>,
}

#[derive(Debug, Deserialize)]
struct RawHitResult {
    id: u64,
    title: String,
    primary_artist: RawArtist,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    response: SongSection,
}

#[derive(Debug, Deserialize)]
struct SongSection {
    song: Song,
}

/// Song detail, reduced to the description-annotation reference chain.
#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub description_annotation: Option<DescriptionAnnotation>,
}

impl Song {
    /// Id of the first referenced annotation, when the chain is intact.
    #[must_use]
    pub fn first_annotation_id(&self) -> Option<u64> {
        self.description_annotation
            .as_ref()
            .and_then(|da| da.annotations.first())
            .map(|a| a.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionAnnotation {
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationRef {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
struct AnnotationResponse {
    response: AnnotationSection,
}

#[derive(Debug, Deserialize)]
struct AnnotationSection {
    annotation: Annotation,
}

/// Annotation detail: the canonical page URL plus the rich-text body.
#[derive(Debug, Clone, Deserialize)]
pub struct Annotation {
    pub url: String,
    pub body: AnnotationBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationBody {
    /// Root of the document tree; the field can be entirely absent.
    #[serde(default)]
    pub dom: Option<DocNode>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Genius API client holding a bearer token from the client-credentials
/// exchange.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    http: Client,
    token: String,
}

impl GeniusClient {
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
    /// ready client. One POST; no refresh machinery.
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
            .post(format!("{GENIUS_API_BASE}/oauth/token"))
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| EnrichError::Auth {
                source_name: "Genius".to_string(),
                message: e.to_string(),
            })?;

        let token: TokenResponse = response.json().await.map_err(|e| EnrichError::Parse {
            source_name: "Genius".to_string(),
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
            .get(format!("{GENIUS_API_BASE}{path}"))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| EnrichError::Http {
                source_name: "Genius".to_string(),
                message: e.to_string(),
            })?;

        response.json().await.map_err(|e| EnrichError::Parse {
            source_name: "Genius".to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl AnnotationIndex for GeniusClient {
    async fn search(&self, query: &str) -> EnrichResult<Vec<SearchHit>> {
        let result: SearchResponse = self.get_json("/search", &[("q", query)]).await?;

        let hits = result
            .response
            .hits
            .into_iter()
            .filter_map(|hit| match hit.result {
                Some(r) => Some(SearchHit {
                    id: r.id,
                    title: r.title,
                    primary_artist: r.primary_artist.name,
                }),
                None => {
                    tracing::debug!("search hit without result payload, skipping");
                    None
                }
            })
            .collect();

        Ok(hits)
    }

    async fn song(&self, id: u64) -> EnrichResult<Song> {
        let result: SongResponse = self.get_json(&format!("/songs/{id}"), &[]).await?;
        Ok(result.response.song)
    }

    async fn annotation(&self, id: u64) -> EnrichResult<Annotation> {
        let result: AnnotationResponse = self.get_json(&format!("/annotations/{id}"), &[]).await?;
        Ok(result.response.annotation)
    }
}
