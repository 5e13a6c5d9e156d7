//! Rendering adapter: renderer-agnostic interface over the globe scene.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - The CPU preview applies exactly the surface rule the GPU shader runs.

mod preview;
mod renderer;

pub use preview::shade_texture;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "globeview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
