use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use sleevenotes_enrich::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "sleevenotes", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Search for albums by free text
    ///
    /// Thin passthrough to the album catalog's search endpoint; prints up
    /// to five candidate albums as JSON. Use the returned ids with the
    /// `album` and `package` commands.
    Search {
        /// Free-text query (artist, album title, ...)
        query: String,
    },
    /// Show album metadata with a cover-art palette
    ///
    /// Fetches the album, downloads its smallest cover rendition, and
    /// derives a small representative palette by median-cut quantization.
    /// Prints the album JSON with a `colors` field merged in.
    Album {
        /// Album id
        id: String,
    },
    /// Build the full annotated track dossier for an album
    ///
    /// Fetches the album and its complete track list, then for every
    /// track concurrently searches the Genius index, fuzzy-matches
    /// artist and title, and attaches the first annotation's text when
    /// one holds up. Tracks without a suitable annotation pass through
    /// untouched. The enriched list is written to the dossier path and
    /// printed together with the album metadata.
    Package {
        /// Album id
        id: String,

        /// Where to write the enriched track list
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the config file location, creating a template if absent
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { query } => {
            let config = Config::load()?;
            commands::run_search(&config, &query).await?;
        }
        Commands::Album { id } => {
            let config = Config::load()?;
            commands::run_album(&config, &id).await?;
        }
        Commands::Package { id, output } => {
            let config = match output {
                Some(path) => Config::load_with_dossier_path(path)?,
                None => Config::load()?,
            };
            commands::run_package(&config, &id).await?;
        }
        Commands::Config => {
            commands::show_config()?;
        }
    }

    Ok(())
}
