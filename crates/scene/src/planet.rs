use globeview_assets::AssetId;
use globeview_common::{Rgb, Transform};
use glam::Quat;
use std::f64::consts::TAU;

/// Uniform scale of the textured body sphere.
pub const BODY_SCALE: f32 = 2.5;
/// Uniform scale of the halo sphere. Must stay above [`BODY_SCALE`].
pub const HALO_SCALE: f32 = 2.7;
/// Segments around and from pole to pole for both spheres.
pub const SPHERE_SEGMENTS: u32 = 128;
/// Body spin in radians per second of elapsed time.
pub const ROTATION_RATE: f64 = 0.05;
pub const HALO_COLOR: Rgb = Rgb::from_rgb8(0x40, 0xc8, 0xdc);
pub const HALO_OPACITY: f32 = 0.12;

/// Tessellation parameters of a UV sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    pub const fn unit(segments: u32) -> Self {
        Self {
            radius: 1.0,
            width_segments: segments,
            height_segments: segments,
        }
    }

    /// Vertices including the duplicated seam column and pole rows.
    pub fn vertex_count(&self) -> u32 {
        (self.width_segments + 1) * (self.height_segments + 1)
    }

    /// Indices of the triangle list; the pole rows contribute one triangle
    /// per segment instead of two.
    pub fn index_count(&self) -> u32 {
        self.width_segments * (2 * self.height_segments).saturating_sub(2) * 3
    }
}

/// Which faces of a mesh are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

/// How fragments combine with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blending {
    Opaque,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Color map recolored by the surface rule.
    Surface { texture: AssetId },
    /// Constant translucent color.
    Halo {
        color: Rgb,
        opacity: f32,
        side: Side,
        blending: Blending,
    },
}

/// Geometry + material + transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshNode {
    pub transform: Transform,
    pub geometry: SphereGeometry,
    pub material: Material,
}

/// The textured planet and its glow shell.
///
/// Only the body's rotation changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetBody {
    texture: AssetId,
    body: MeshNode,
    halo: MeshNode,
    angle: f32,
}

impl PlanetBody {
    /// Build the planet around an already-resolved color map.
    pub fn new(texture: AssetId) -> Self {
        Self {
            texture,
            body: MeshNode {
                transform: Transform::uniform_scale(BODY_SCALE),
                geometry: SphereGeometry::unit(SPHERE_SEGMENTS),
                material: Material::Surface { texture },
            },
            halo: MeshNode {
                transform: Transform::uniform_scale(HALO_SCALE),
                geometry: SphereGeometry::unit(SPHERE_SEGMENTS),
                material: Material::Halo {
                    color: HALO_COLOR,
                    opacity: HALO_OPACITY,
                    side: Side::Back,
                    blending: Blending::Additive,
                },
            },
            angle: 0.0,
        }
    }

    /// Set the body spin for the given elapsed time. Absolute, so calling it
    /// twice with the same time leaves the same state.
    pub fn advance(&mut self, elapsed_seconds: f64) {
        self.angle = rotation_at(elapsed_seconds);
        self.body.transform.rotation = Quat::from_rotation_y(self.angle);
    }

    /// Current body spin around +Y in `[0, 2π)`.
    pub fn rotation_y(&self) -> f32 {
        self.angle
    }

    pub fn body(&self) -> &MeshNode {
        &self.body
    }

    pub fn halo(&self) -> &MeshNode {
        &self.halo
    }

    pub fn texture(&self) -> AssetId {
        self.texture
    }
}

/// Body spin at `elapsed_seconds`, wrapped into `[0, 2π)`.
pub fn rotation_at(elapsed_seconds: f64) -> f32 {
    (elapsed_seconds * ROTATION_RATE).rem_euclid(TAU) as f32
}
