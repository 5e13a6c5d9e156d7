use crate::{AssetError, TextureAsset};
use std::io::Read;
use std::path::PathBuf;

/// Upper bound on the encoded size of a fetched texture.
pub const MAX_TEXTURE_BYTES: u64 = 64 * 1024 * 1024;

/// Where a texture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// Fetched over HTTP(S).
    Url(String),
    /// Read from the local filesystem.
    Path(PathBuf),
}

impl TextureSource {
    /// `http://` and `https://` are URLs, `file://` and everything else are paths.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s.strip_prefix("file://").unwrap_or(s)))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl std::str::FromStr for TextureSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for TextureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read the encoded bytes of a texture. Blocks until done.
pub fn fetch_bytes(source: &TextureSource) -> Result<Vec<u8>, AssetError> {
    let mut bytes = Vec::new();
    match source {
        TextureSource::Url(url) => {
            tracing::debug!(%url, "fetching texture over HTTP");
            let response = ureq::get(url).call().map_err(Box::new)?;
            response
                .into_reader()
                .take(MAX_TEXTURE_BYTES + 1)
                .read_to_end(&mut bytes)?;
        }
        TextureSource::Path(path) => {
            tracing::debug!(path = %path.display(), "reading texture from disk");
            std::fs::File::open(path)?
                .take(MAX_TEXTURE_BYTES + 1)
                .read_to_end(&mut bytes)?;
        }
    }
    if bytes.len() as u64 > MAX_TEXTURE_BYTES {
        return Err(AssetError::TooLarge {
            limit: MAX_TEXTURE_BYTES,
        });
    }
    Ok(bytes)
}

/// Fetch and decode a texture. Blocks until done.
pub fn fetch_texture(source: &TextureSource) -> Result<TextureAsset, AssetError> {
    let bytes = fetch_bytes(source)?;
    let texture = TextureAsset::decode(&bytes)?;
    tracing::info!(
        %source,
        width = texture.width(),
        height = texture.height(),
        id = %texture.id(),
        "texture decoded"
    );
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &std::path::Path) {
        image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 50, 180, 255]))
            .save_with_format(path, image::ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn parse_urls_and_paths() {
        assert_eq!(
            TextureSource::parse("https://example.com/earth.jpg"),
            TextureSource::Url("https://example.com/earth.jpg".into())
        );
        assert_eq!(
            TextureSource::parse("file:///tmp/earth.png"),
            TextureSource::Path(PathBuf::from("/tmp/earth.png"))
        );
        assert_eq!(
            TextureSource::parse(" textures/earth.png "),
            TextureSource::Path(PathBuf::from("textures/earth.png"))
        );
        assert!(TextureSource::parse("http://x").is_remote());
    }

    #[test]
    fn fetch_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earth.png");
        write_png(&path);

        let source = TextureSource::Path(path);
        let texture = fetch_texture(&source).unwrap();
        assert_eq!((texture.width(), texture.height()), (4, 4));
        assert_eq!(texture.texel(0, 0), Some([0, 50, 180, 255]));
    }

    #[test]
    fn fetch_with_file_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earth.png");
        write_png(&path);

        let source = TextureSource::parse(&format!("file://{}", path.display()));
        assert!(fetch_texture(&source).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = TextureSource::Path(dir.path().join("absent.png"));
        assert!(matches!(fetch_texture(&source), Err(AssetError::Io(_))));
    }
}
