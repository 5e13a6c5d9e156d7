use crate::rng::SplitMix64;
use globeview_common::Rgb;
use glam::Vec3;
use std::f32::consts::TAU;

/// Parameters of one star shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarLayerSpec {
    /// Inner radius of the shell.
    pub radius: f32,
    /// Thickness of the shell; stars start at `radius + depth` and move inward.
    pub depth: f32,
    pub count: usize,
    /// Sprite size multiplier.
    pub factor: f32,
    pub saturation: f32,
    /// Soften sprite edges instead of drawing hard squares.
    pub fade: bool,
    /// Twinkle speed.
    pub speed: f32,
}

/// The three shells of the background, nearest first.
pub const STAR_LAYERS: [StarLayerSpec; 3] = [
    StarLayerSpec {
        radius: 100.0,
        depth: 50.0,
        count: 8000,
        factor: 3.0,
        saturation: 0.0,
        fade: true,
        speed: 0.5,
    },
    StarLayerSpec {
        radius: 200.0,
        depth: 80.0,
        count: 6000,
        factor: 5.0,
        saturation: 0.1,
        fade: true,
        speed: 0.3,
    },
    StarLayerSpec {
        radius: 300.0,
        depth: 100.0,
        count: 4000,
        factor: 7.0,
        saturation: 0.0,
        fade: true,
        speed: 0.2,
    },
];

/// Star lightness before saturation is applied.
const STAR_LIGHTNESS: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub color: Rgb,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarLayer {
    spec: StarLayerSpec,
    stars: Vec<Star>,
}

impl StarLayer {
    fn generate(spec: StarLayerSpec, rng: &mut SplitMix64) -> Self {
        let mut radius = spec.radius + spec.depth;
        let increment = spec.depth / spec.count.max(1) as f32;
        let stars = (0..spec.count)
            .map(|i| {
                radius -= increment * rng.next_f32();
                let polar = (1.0 - rng.next_f32() * 2.0).acos();
                let azimuth = rng.next_f32() * TAU;
                Star {
                    position: spherical_to_cartesian(radius, polar, azimuth),
                    color: Rgb::from_hsl(
                        i as f32 / spec.count as f32,
                        spec.saturation,
                        STAR_LIGHTNESS,
                    ),
                    size: (0.5 + 0.5 * rng.next_f32()) * spec.factor,
                }
            })
            .collect();
        Self { spec, stars }
    }

    pub fn spec(&self) -> &StarLayerSpec {
        &self.spec
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Shared sprite pulse at `elapsed` seconds: `3 + sin(elapsed * speed + 100)`.
    pub fn pulse(&self, elapsed: f32) -> f32 {
        3.0 + (elapsed * self.spec.speed + 100.0).sin()
    }
}

/// Sprite size in pixels for a star `view_depth` units in front of the camera.
pub fn sprite_size(star_size: f32, view_depth: f32, pulse: f32) -> f32 {
    star_size * (30.0 / view_depth) * pulse
}

/// Opacity of a faded sprite at distance `d` from its center (sprite is 1x1).
pub fn fade_opacity(d: f32) -> f32 {
    1.0 / (1.0 + (16.0 * (d - 0.25)).exp())
}

/// Static starfield: exactly three shells, generated once.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyField {
    seed: u64,
    layers: [StarLayer; 3],
}

impl SkyField {
    /// Generate all layers from `seed`. Each layer draws from its own stream
    /// so changing one layer's count never reshuffles another.
    pub fn generate(seed: u64) -> Self {
        let layers = std::array::from_fn(|i| {
            let mut rng = SplitMix64::new(seed ^ (i as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
            StarLayer::generate(STAR_LAYERS[i], &mut rng)
        });
        tracing::debug!(seed, "sky field generated");
        Self { seed, layers }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn layers(&self) -> &[StarLayer; 3] {
        &self.layers
    }

    pub fn star_count(&self) -> usize {
        self.layers.iter().map(StarLayer::len).sum()
    }
}

/// Polar angle from +Y, azimuth around +Y starting at +Z.
fn spherical_to_cartesian(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let s = polar.sin();
    Vec3::new(
        radius * s * azimuth.sin(),
        radius * polar.cos(),
        radius * s * azimuth.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_layers_with_fixed_counts() {
        let sky = SkyField::generate(42);
        let counts: Vec<usize> = sky.layers().iter().map(StarLayer::len).collect();
        assert_eq!(counts, vec![8000, 6000, 4000]);
        assert_eq!(sky.star_count(), 18_000);
    }

    #[test]
    fn same_seed_same_sky() {
        assert_eq!(SkyField::generate(7), SkyField::generate(7));
        assert_ne!(SkyField::generate(7), SkyField::generate(8));
    }

    #[test]
    fn stars_stay_inside_their_shell() {
        let sky = SkyField::generate(3);
        for layer in sky.layers() {
            let spec = layer.spec();
            for star in layer.stars() {
                let r = star.position.length();
                assert!(r >= spec.radius - 1e-2, "r={r} below {}", spec.radius);
                assert!(r <= spec.radius + spec.depth + 1e-2);
            }
        }
    }

    #[test]
    fn star_sizes_follow_factor() {
        let sky = SkyField::generate(11);
        for layer in sky.layers() {
            let factor = layer.spec().factor;
            for star in layer.stars() {
                assert!(star.size >= 0.5 * factor && star.size <= factor);
            }
        }
    }

    #[test]
    fn unsaturated_layers_are_gray() {
        let sky = SkyField::generate(1);
        let star = sky.layers()[0].stars()[1234];
        assert_eq!(star.color, Rgb::new(0.9, 0.9, 0.9));
        let tinted = sky.layers()[1].stars()[1000];
        assert!(tinted.color != Rgb::new(0.9, 0.9, 0.9));
    }

    #[test]
    fn fade_profile() {
        assert!((fade_opacity(0.25) - 0.5).abs() < 1e-6);
        assert!(fade_opacity(0.0) > 0.95);
        assert!(fade_opacity(0.5) < 0.05);
    }

    #[test]
    fn pulse_stays_between_two_and_four() {
        let sky = SkyField::generate(1);
        let layer = &sky.layers()[2];
        for t in 0..200 {
            let p = layer.pulse(t as f32 * 0.37);
            assert!((2.0..=4.0).contains(&p));
        }
        assert!((sprite_size(2.0, 30.0, 3.0) - 6.0).abs() < 1e-6);
    }
}
