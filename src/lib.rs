//! Image to ASCII art login screens and animated terminal banners.

pub mod animate;
pub mod frame;
pub mod gallery;
pub mod loader;
pub mod palette;
pub mod terminal;

pub use animate::{Animator, CancelToken, KeyWatcher};
pub use frame::{Frame, Overlay};
pub use gallery::{ArtGallery, LoginScreen};
pub use palette::{BucketPalette, LinearPalette};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlyphgateError {
    #[error("Failed to open image '{name}': {source}")]
    Decode {
        path: PathBuf,
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Art directory '{}' not found.", .0.display())]
    MissingArtDir(PathBuf),
    #[error("No images found in '{}'.", .0.display())]
    NoImages(PathBuf),
    #[error("Palette error: {0}")]
    Palette(String),
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Terminal error: {0}")]
    Terminal(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlyphgateError>;
