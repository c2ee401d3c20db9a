use serde::{Deserialize, Serialize};

use crate::model::track::Artist;

/// Album metadata, as far as this core needs it.
///
/// Deserializes from the upstream album payload; fields outside this
/// subset are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub images: Vec<AlbumImage>,
    pub tracks: TrackPaging,
}

/// One cover-art rendition. Upstream orders these largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Paging envelope on the album's embedded track list; only the total is
/// needed to drive batched track fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPaging {
    pub total: usize,
}

impl Album {
    /// The smallest available cover rendition, if any.
    #[must_use]
    pub fn smallest_image(&self) -> Option<&AlbumImage> {
        self.images.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_deserializes_from_upstream_payload() {
        let json = r#"{
            "id": "1weenld61qoidwYuZ1GESA",
            "name": "Kind of Blue",
            "album_type": "album",
            "artists": [{"name": "Miles Davis"}],
            "images": [
                {"url": "https://i.scdn.co/640", "width": 640, "height": 640},
                {"url": "https://i.scdn.co/300", "width": 300, "height": 300},
                {"url": "https://i.scdn.co/64", "width": 64, "height": 64}
            ],
            "tracks": {"total": 5, "limit": 50}
        }"#;
        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.name, "Kind of Blue");
        assert_eq!(album.tracks.total, 5);
        assert_eq!(album.smallest_image().unwrap().url, "https://i.scdn.co/64");
    }

    #[test]
    fn test_smallest_image_empty() {
        let album = Album {
            id: "x".to_string(),
            name: "Empty".to_string(),
            artists: Vec::new(),
            images: Vec::new(),
            tracks: TrackPaging { total: 0 },
        };
        assert!(album.smallest_image().is_none());
    }
}
