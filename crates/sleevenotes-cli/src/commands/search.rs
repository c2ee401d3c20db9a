use anyhow::{bail, Result};

use sleevenotes_enrich::Config;

pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("no query provided");
    }

    let spotify = super::spotify_client(config).await?;
    let albums = spotify.search_albums(query).await?;

    if albums.is_empty() {
        println!("No albums found for '{query}'.");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&albums)?);
    Ok(())
}
