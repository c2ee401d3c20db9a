//! Result sink: persists the enriched track list as a JSON artifact.

use std::fs;
use std::path::Path;

use sleevenotes_core::model::Track;

use crate::error::EnrichResult;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_DOSSIER_PATH: &str = "songs.json";

/// Write the enriched track list to `path` as pretty-printed JSON,
/// creating parent directories as needed.
pub fn write_track_dossier(path: &Path, tracks: &[Track]) -> EnrichResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(tracks).map_err(sleevenotes_core::Error::from)?;
    fs::write(path, json)?;

    tracing::info!(path = %path.display(), tracks = tracks.len(), "wrote track dossier");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleevenotes_core::model::TrackAnnotation;

    #[test]
    fn test_dossier_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("songs.json");

        let mut track = Track::new("t1", "X").with_artist("A");
        track.genius = Some(TrackAnnotation {
            text: "Great song.".to_string(),
            url: "https://genius.com/1".to_string(),
        });
        let tracks = vec![track, Track::new("t2", "Y")];

        write_track_dossier(&path, &tracks).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Track> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, tracks);
        assert!(parsed[1].genius.is_none());
    }
}
