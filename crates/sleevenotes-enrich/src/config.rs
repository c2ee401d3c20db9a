use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for sleevenotes.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SLEEVE_* prefix)
/// 3. Config file (~/.config/sleevenotes/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Spotify client id (required for album lookups).
    ///
    /// Can be set via:
    /// - ENV: SLEEVE_SPOTIFY_CLIENT_ID
    /// - Config: spotify_client_id = "..."
    pub spotify_client_id: Option<String>,

    /// Spotify client secret.
    ///
    /// Can be set via:
    /// - ENV: SLEEVE_SPOTIFY_CLIENT_SECRET
    /// - Config: spotify_client_secret = "..."
    pub spotify_client_secret: Option<String>,

    /// Genius client id (required for annotation enrichment).
    ///
    /// Can be set via:
    /// - ENV: SLEEVE_GENIUS_CLIENT_ID
    /// - Config: genius_client_id = "..."
    pub genius_client_id: Option<String>,

    /// Genius client secret.
    ///
    /// Can be set via:
    /// - ENV: SLEEVE_GENIUS_CLIENT_SECRET
    /// - Config: genius_client_secret = "..."
    pub genius_client_secret: Option<String>,

    /// Where the enriched track dossier is written.
    ///
    /// Can be set via:
    /// - CLI: --output /path/to/songs.json
    /// - ENV: SLEEVE_DOSSIER_PATH
    /// - Config: dossier_path = "/path/to/songs.json"
    /// - Default: ./songs.json
    #[serde(default = "default_dossier_path")]
    pub dossier_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spotify_client_id: None,
            spotify_client_secret: None,
            genius_client_id: None,
            genius_client_secret: None,
            dossier_path: default_dossier_path(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/sleevenotes/config.toml
    /// Reads environment variables with SLEEVE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("sleeve");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom dossier path, used when the
    /// --output CLI flag is provided.
    pub fn load_with_dossier_path(path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.dossier_path = path;
        Ok(config)
    }

    /// Spotify credential pair, when both halves are configured.
    #[must_use]
    pub fn spotify_credentials(&self) -> Option<(&str, &str)> {
        self.spotify_client_id
            .as_deref()
            .zip(self.spotify_client_secret.as_deref())
    }

    /// Genius credential pair, when both halves are configured.
    #[must_use]
    pub fn genius_credentials(&self) -> Option<(&str, &str)> {
        self.genius_client_id
            .as_deref()
            .zip(self.genius_client_secret.as_deref())
    }
}

/// Default dossier path: ./songs.json in the working directory.
fn default_dossier_path() -> PathBuf {
    PathBuf::from(crate::sink::DEFAULT_DOSSIER_PATH)
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/sleevenotes/config.toml
/// - macOS: ~/Library/Application Support/sleevenotes/config.toml
/// - Windows: %APPDATA%\sleevenotes\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sleevenotes")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Sleevenotes Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SLEEVE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Spotify client credentials, used for album metadata, track lists, and
# cover art. Register an application at:
# https://developer.spotify.com/dashboard
#
# Can also be set via:
# - Environment: SLEEVE_SPOTIFY_CLIENT_ID / SLEEVE_SPOTIFY_CLIENT_SECRET
spotify_client_id = "your-spotify-client-id"
spotify_client_secret = "your-spotify-client-secret"

# Genius client credentials, used for annotation enrichment. Register at:
# https://genius.com/api-clients
#
# Can also be set via:
# - Environment: SLEEVE_GENIUS_CLIENT_ID / SLEEVE_GENIUS_CLIENT_SECRET
genius_client_id = "your-genius-client-id"
genius_client_secret = "your-genius-client-secret"

# Where the enriched track dossier is written after `sleevenotes package`.
#
# Can also be set via:
# - CLI: sleevenotes package <id> --output /path/to/songs.json
# - Environment: SLEEVE_DOSSIER_PATH=/path/to/songs.json
#dossier_path = "songs.json"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
