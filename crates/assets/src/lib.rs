//! Texture asset pipeline: resolve a source, fetch bytes, decode to RGBA8,
//! and register the result in a content-addressed cache.
//!
//! Textures are identified by a hash of their decoded pixels. The scene and
//! renderer refer to textures by [`AssetId`], never by URL or file path.
//!
//! # Invariants
//! - A [`TextureAsset`] always holds exactly `width * height * 4` bytes.
//! - A [`TextureLoad`] yields its result at most once.

mod cache;
mod loader;
mod source;
mod texture;

pub use cache::TextureCache;
pub use loader::TextureLoad;
pub use source::{MAX_TEXTURE_BYTES, TextureSource, fetch_bytes, fetch_texture};
pub use texture::{AssetId, TextureAsset};

/// Errors from texture operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("texture has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA8")]
    BadDimensions { width: u32, height: u32, len: usize },
    #[error("texture source exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("texture fetch worker exited without a result")]
    Abandoned,
}

pub fn crate_info() -> &'static str {
    "globeview-assets v0.1.0"
}
