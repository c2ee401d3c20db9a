use anyhow::{bail, Result};

use sleevenotes_enrich::{sink, Annotator, Config, EnrichError, GeniusClient};

pub async fn run_package(config: &Config, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("no album id provided");
    }

    let spotify = super::spotify_client(config).await?;
    let (genius_id, genius_secret) = config.genius_credentials().ok_or(
        EnrichError::MissingCredentials("genius_client_id / genius_client_secret"),
    )?;
    let genius = GeniusClient::authenticate(genius_id, genius_secret).await?;

    let album = spotify.album(id).await?;
    tracing::info!(album = %album.name, tracks = album.tracks.total, "packaging album");

    let tracks = spotify.album_tracks(id).await?;
    let enriched = Annotator::new(genius).enrich(tracks).await?;

    sink::write_track_dossier(&config.dossier_path, &enriched)?;

    let annotated = enriched.iter().filter(|t| t.genius.is_some()).count();
    println!(
        "Annotated {annotated} of {} tracks; dossier written to {}",
        enriched.len(),
        config.dossier_path.display()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "album": album,
            "tracks": enriched,
        }))?
    );

    Ok(())
}
