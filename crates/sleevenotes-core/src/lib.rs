//! Core domain model for sleevenotes.
//!
//! This crate defines the album/track data model, the median-cut palette
//! quantizer applied to cover art, and the rich-text document tree used to
//! flatten Genius annotations into plain text.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod document;
pub mod error;
pub mod model;
pub mod palette;

pub use error::{Error, Result};
