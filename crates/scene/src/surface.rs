//! Per-texel recoloring of the planet color map.
//!
//! The earth fragment shader runs the same rule; this is the reference used
//! by tests, the CLI and the CPU preview.

use globeview_common::{Rgb, Rgba};

/// Red channel must trail blue by more than this for a texel to be ocean.
pub const OCEAN_RED_MARGIN: f32 = 0.05;
/// Green may exceed blue by less than this for a texel to be ocean.
pub const OCEAN_GREEN_MARGIN: f32 = 0.1;
/// Brightening applied to ocean texels before the cyan blend.
pub const OCEAN_BRIGHTEN: f32 = 1.15;
/// Cyan the oceans are pulled toward (`#2e8590`-ish).
pub const OCEAN_CYAN: Rgb = Rgb::new(0.18, 0.52, 0.62);
/// Weight of [`OCEAN_CYAN`] in the ocean blend.
pub const OCEAN_BLEND: f32 = 0.45;
/// Brightening applied to land texels.
pub const LAND_BRIGHTEN: f32 = 1.4;

/// Hard classification, no smoothing across the coastline.
pub fn is_ocean(texel: Rgba) -> bool {
    texel.r + OCEAN_RED_MARGIN < texel.b && texel.g < texel.b + OCEAN_GREEN_MARGIN
}

pub fn ocean_color(texel: Rgba) -> Rgb {
    texel.rgb().scale(OCEAN_BRIGHTEN).lerp(OCEAN_CYAN, OCEAN_BLEND)
}

pub fn land_color(texel: Rgba) -> Rgb {
    texel.rgb().scale(LAND_BRIGHTEN)
}

/// Final displayable color for one texel; alpha is always 1.
pub fn shade(texel: Rgba) -> Rgb {
    let ocean = if is_ocean(texel) { 1.0 } else { 0.0 };
    land_color(texel).lerp(ocean_color(texel), ocean).clamped()
}

/// [`shade`] on 8-bit channels.
pub fn shade_rgba8(texel: [u8; 4]) -> [u8; 4] {
    let [r, g, b] = shade(Rgba::from_rgba8(texel)).to_rgb8();
    [r, g, b, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texel(r: f32, g: f32, b: f32) -> Rgba {
        Rgba::new(r, g, b, 1.0)
    }

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn deep_blue_is_ocean() {
        assert!(is_ocean(texel(0.0, 0.1, 0.4)));
        assert!(is_ocean(texel(0.1, 0.45, 0.4)));
    }

    #[test]
    fn boundaries_are_strict() {
        let r = 0.25;
        assert!(!is_ocean(texel(r, 0.0, r + OCEAN_RED_MARGIN)));
        let b = 0.5;
        assert!(!is_ocean(texel(0.0, b + OCEAN_GREEN_MARGIN, b)));
    }

    #[test]
    fn land_and_ice_are_not_ocean() {
        assert!(!is_ocean(texel(0.4, 0.5, 0.2)));
        assert!(!is_ocean(texel(0.9, 0.9, 0.92)));
        assert!(!is_ocean(texel(0.0, 0.0, 0.0)));
    }

    #[test]
    fn ocean_lies_on_blend_line() {
        let c = texel(0.05, 0.15, 0.45);
        let start = c.rgb().scale(1.15);
        let expected = start.lerp(Rgb::new(0.18, 0.52, 0.62), 0.45);
        let out = shade(c);
        assert!(close(out, expected));
        // strictly between the two endpoints on every channel that differs
        for (o, (s, e)) in [
            (out.r, (start.r, 0.18)),
            (out.g, (start.g, 0.52)),
            (out.b, (start.b, 0.62)),
        ] {
            assert!(o > s.min(e) && o < s.max(e));
        }
    }

    #[test]
    fn land_is_brightened_and_clamped() {
        let out = shade(texel(0.5, 0.4, 0.2));
        assert!(close(out, Rgb::new(0.7, 0.56, 0.28)));

        let bright = shade(texel(0.9, 0.8, 0.3));
        assert!(close(bright, Rgb::new(1.0, 1.0, 0.42)));
    }

    #[test]
    fn shading_is_deterministic() {
        let c = texel(0.2, 0.3, 0.7);
        assert_eq!(shade(c), shade(c));
    }

    #[test]
    fn rgba8_output_is_opaque() {
        assert_eq!(shade_rgba8([0, 0, 0, 0]), [0, 0, 0, 255]);
        let [r, g, b, a] = shade_rgba8([10, 40, 120, 255]);
        assert_eq!(a, 255);
        assert!(g > r && b > g);
    }
}
