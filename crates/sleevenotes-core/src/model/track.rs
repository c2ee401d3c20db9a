use serde::{Deserialize, Serialize};

/// A credited artist on a track or album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl Artist {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One album track, in album order.
///
/// Deserializes from the upstream album-tracks payload (extra fields are
/// ignored). The track's position in the fetched list is the index space
/// used by the matcher and the annotator; it must stay stable once the
/// list is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,

    /// Annotation attached by the annotator; absent means "no suitable
    /// annotation found", which is a valid terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genius: Option<TrackAnnotation>,
}

impl Track {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artists: Vec::new(),
            genius: None,
        }
    }

    #[must_use]
    pub fn with_artist(mut self, name: impl Into<String>) -> Self {
        self.artists.push(Artist::new(name));
        self
    }
}

/// The `{text, url}` pair attached to a track once a valid annotation has
/// been found, flattened, and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackAnnotation {
    pub text: String,
    pub url: String,
}

/// One candidate returned by the annotation index's search endpoint.
///
/// Used only transiently while matching; hits never outlive the per-track
/// pipeline that fetched them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    pub primary_artist: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_builder() {
        let track = Track::new("t1", "So What").with_artist("Miles Davis");
        assert_eq!(track.name, "So What");
        assert_eq!(track.artists.len(), 1);
        assert!(track.genius.is_none());
    }

    #[test]
    fn test_track_deserializes_from_upstream_payload() {
        let json = r#"{
            "id": "2Vy8E5kCgNDsP9rrtZ6Fmx",
            "name": "Blue in Green",
            "artists": [{"name": "Miles Davis", "type": "artist"}],
            "duration_ms": 337560,
            "track_number": 3
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.name, "Blue in Green");
        assert_eq!(track.artists[0].name, "Miles Davis");
        assert!(track.genius.is_none());
    }

    #[test]
    fn test_unenriched_track_omits_genius_field() {
        let track = Track::new("t1", "So What");
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("genius").is_none());
    }

    #[test]
    fn test_enriched_track_serializes_annotation() {
        let mut track = Track::new("t1", "So What");
        track.genius = Some(TrackAnnotation {
            text: "A modal landmark.".to_string(),
            url: "https://genius.com/123".to_string(),
        });
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["genius"]["text"], "A modal landmark.");
        assert_eq!(json["genius"]["url"], "https://genius.com/123");
    }
}
