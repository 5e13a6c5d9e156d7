//! Globe scene model: everything that decides what is drawn, independent of
//! the GPU backend.
//!
//! # Invariants
//! - The surface shading rule is a pure function of the sampled texel.
//! - Planet rotation is a function of elapsed time only, never accumulated.
//! - Camera distance stays inside the rig's bounds after every update.
//! - The planet slot resolves at most once.

pub mod camera;
pub mod config;
pub mod lights;
pub mod overlay;
pub mod planet;
mod rng;
pub mod scene;
pub mod sky;
pub mod surface;

pub use camera::{CameraRig, CameraSpec};
pub use config::{ConfigError, SceneConfig, WindowConfig};
pub use lights::{AmbientLight, DirectionalLight, LightRig, PointLight};
pub use overlay::Overlay;
pub use planet::{Blending, Material, MeshNode, PlanetBody, Side, SphereGeometry};
pub use scene::{Deferred, Scene};
pub use sky::{SkyField, Star, StarLayer, StarLayerSpec};

pub fn crate_info() -> &'static str {
    "globeview-scene v0.1.0"
}
