//! Procedural boot-print decal textures for 2D top-down games.
//!
//! Main features:
//!  - parametric boot-sole silhouette profile
//!  - four-pass raster pipeline: fill, tread carve, edge shade, splatter
//!  - mirrored left/right emission with all-or-nothing persistence
//!
//! Output is offline, write-once PNG; with a fixed seed regeneration is
//! byte-identical on any machine.
#![deny(warnings)]

mod color;
mod footprint;
mod image;
mod profile;
mod synth;
mod utils;

pub use color::{ColorError, Palette, RGBA};
pub use footprint::{EmitReport, Emitter, Footprint, Handedness};
pub use image::{Image, ImageMut, ImageOwned, Shape, write_png};
pub use profile::width_factor;
pub use synth::{SynthParams, Synthesizer};

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Canvas dimensions cannot host the margins and the silhouette
    /// profile. Raised before any buffer is allocated.
    InvalidCanvas { reason: String },
    Io(std::io::Error),
    Png(png::EncodingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCanvas { reason } => write!(f, "invalid canvas: {}", reason),
            Error::Io(error) => write!(f, "io error: {}", error),
            Error::Png(error) => write!(f, "png encoding error: {}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidCanvas { .. } => None,
            Error::Io(error) => Some(error),
            Error::Png(error) => Some(error),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<png::EncodingError> for Error {
    fn from(error: png::EncodingError) -> Self {
        Error::Png(error)
    }
}
