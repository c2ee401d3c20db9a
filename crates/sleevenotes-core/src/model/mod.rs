pub mod album;
pub mod color;
pub mod track;

pub use album::{Album, AlbumImage};
pub use color::Rgb;
pub use track::{Artist, SearchHit, Track, TrackAnnotation};
