use anyhow::{bail, Result};

use sleevenotes_core::palette::{pixels_from_rgba, quantize, MAX_SPLIT_DEPTH};
use sleevenotes_enrich::Config;

pub async fn run_album(config: &Config, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("no album id provided");
    }

    let spotify = super::spotify_client(config).await?;
    let album = spotify.album(id).await?;

    let mut colors = Vec::new();
    if let Some(cover) = album.smallest_image() {
        let bytes = spotify.cover_bytes(&cover.url).await?;
        let rgba = image::load_from_memory(&bytes)?.to_rgba8();
        let pixels = pixels_from_rgba(rgba.as_raw());
        colors = quantize(pixels, MAX_SPLIT_DEPTH);
        tracing::debug!(palette = colors.len(), "quantized cover art");
    } else {
        tracing::warn!(album = %album.name, "album has no cover art, skipping palette");
    }

    let mut value = serde_json::to_value(&album)?;
    value["colors"] = serde_json::to_value(&colors)?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
