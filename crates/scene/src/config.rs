use globeview_common::Rgb;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Planet color map used when nothing else is configured.
pub const DEFAULT_TEXTURE: &str = "https://unpkg.com/three-globe/example/img/earth-blue-marble.jpg";
pub const DEFAULT_BACKGROUND: Rgb = Rgb::from_rgb8(0x00, 0x00, 0x05);
pub const DEFAULT_STAR_SEED: u64 = 42;

/// Errors from loading a scene configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Global Risk Monitor".into(),
        }
    }
}

/// Launch-time settings. Everything the scene composes beyond these is
/// fixed in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Color map source: `http(s)://` URL or file path.
    pub texture: String,
    /// Seed for the starfield.
    pub star_seed: u64,
    /// Clear color behind everything, `#rrggbb`.
    pub background: Rgb,
    pub window: WindowConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture: DEFAULT_TEXTURE.into(),
            star_seed: DEFAULT_STAR_SEED,
            background: DEFAULT_BACKGROUND,
            window: WindowConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&data)?,
            "json" => serde_json::from_str(&data)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "scene config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texture.trim().is_empty() {
            return Err(ConfigError::Invalid("texture source is empty".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has a zero dimension",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }

    /// Write as YAML, the format the desktop app documents.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let c = SceneConfig::default();
        assert_eq!(c.texture, DEFAULT_TEXTURE);
        assert_eq!(c.background.to_hex(), "#000005");
        assert_eq!((c.window.width, c.window.height), (1280, 720));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn yaml_partial_override() {
        let file = write_temp(".yaml", "texture: assets/earth.png\nstar_seed: 9\n");
        let c = SceneConfig::load(file.path()).unwrap();
        assert_eq!(c.texture, "assets/earth.png");
        assert_eq!(c.star_seed, 9);
        assert_eq!(c.background, DEFAULT_BACKGROUND);
        assert_eq!(c.window, WindowConfig::default());
    }

    #[test]
    fn json_with_background_and_window() {
        let file = write_temp(
            ".json",
            r##"{"background": "#101020", "window": {"width": 640, "height": 480}}"##,
        );
        let c = SceneConfig::load(file.path()).unwrap();
        assert_eq!(c.background, Rgb::from_rgb8(0x10, 0x10, 0x20));
        assert_eq!(c.window.width, 640);
        assert_eq!(c.window.title, "Global Risk Monitor");
    }

    #[test]
    fn yaml_round_trip() {
        let original = SceneConfig {
            star_seed: 1234,
            ..SceneConfig::default()
        };
        let file = write_temp(".yml", &original.to_yaml().unwrap());
        assert_eq!(SceneConfig::load(file.path()).unwrap(), original);
    }

    #[test]
    fn rejects_bad_color() {
        let file = write_temp(".yaml", "background: navy\n");
        assert!(matches!(
            SceneConfig::load(file.path()),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = write_temp(".toml", "texture = 'x'\n");
        assert!(matches!(
            SceneConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        let file = write_temp(".yaml", "texture: '  '\n");
        assert!(matches!(
            SceneConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
        let file = write_temp(".yaml", "window:\n  width: 0\n");
        assert!(matches!(
            SceneConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            SceneConfig::load("/nonexistent/globe.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
