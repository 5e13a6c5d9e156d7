//! wgpu render backend for the globe scene.
//!
//! Draws, in order: star sprites, the textured earth, the back-face halo.
//! The planet passes are skipped until the scene's planet slot is ready and
//! its color map has been uploaded.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - The earth fragment stage runs the same rule as `globeview_scene::surface`.
//! - Colors are written unconverted; pick a non-sRGB surface format.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{GlobeRenderer, MSAA_SAMPLES, RenderError};
