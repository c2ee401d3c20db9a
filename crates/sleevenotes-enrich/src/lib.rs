//! Annotation enrichment pipeline for sleevenotes.
//!
//! Implements the upstream clients (Spotify, Genius), the artist/title
//! matcher, the worker-pool annotator, and the dossier sink.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod annotator;
pub mod config;
pub mod error;
pub mod genius;
pub mod matching;
pub mod sink;
pub mod spotify;

pub use annotator::{Annotator, DEFAULT_WORKERS, MAX_ALBUM_TRACKS};
pub use config::Config;
pub use error::{EnrichError, EnrichResult};
pub use genius::{AnnotationIndex, GeniusClient};
pub use spotify::SpotifyClient;
