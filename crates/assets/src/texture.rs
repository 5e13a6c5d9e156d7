use crate::AssetError;
use sha2::{Digest, Sha256};

/// Content-addressed asset ID computed from decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A decoded 2D color map in RGBA8, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    id: AssetId,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureAsset {
    /// Wrap a raw RGBA8 buffer, checking its length against the dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::Empty { width, height });
        }
        if pixels.len() as u64 != u64::from(width) * u64::from(height) * 4 {
            return Err(AssetError::BadDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            id: content_hash(width, height, &pixels),
            width,
            height,
            pixels,
        })
    }

    /// Decode an encoded image (PNG or JPEG) into RGBA8.
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba8(width, height, image.into_raw())
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Texel at `(x, y)`, or `None` when out of bounds.
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.pixels
            .get(i..i + 4)
            .and_then(|p| <[u8; 4]>::try_from(p).ok())
    }

    /// Iterator over texels in row-major order.
    pub fn texels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.pixels
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

fn content_hash(width: u32, height: u32, pixels: &[u8]) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(width.to_le_bytes());
    hasher.update(height.to_le_bytes());
    hasher.update(pixels);
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}
