pub mod album;
pub mod config;
pub mod package;
pub mod search;

pub use album::run_album;
pub use config::show_config;
pub use package::run_package;
pub use search::run_search;

use anyhow::Result;
use sleevenotes_enrich::{Config, EnrichError, SpotifyClient};

/// Authenticate against Spotify from configured credentials.
pub(crate) async fn spotify_client(config: &Config) -> Result<SpotifyClient> {
    let (id, secret) = config.spotify_credentials().ok_or(
        EnrichError::MissingCredentials("spotify_client_id / spotify_client_secret"),
    )?;
    Ok(SpotifyClient::authenticate(id, secret).await?)
}
