//! Static title layer drawn above the globe.
//!
//! The overlay is decoration only: it binds no data and never takes pointer
//! input, so drags and scrolls always reach the camera.

use globeview_common::{Rgb, Rgba};

pub const TITLE: &str = "GLOBAL RISK MONITOR";

/// cyan-400
pub const ICON_COLOR: Rgb = Rgb::from_rgb8(0x22, 0xd3, 0xee);
/// blue-100
pub const TEXT_COLOR: Rgb = Rgb::from_rgb8(0xdb, 0xea, 0xfe);
pub const GRADIENT_START: Rgb = Rgb::from_rgb8(0x22, 0xd3, 0xee);
/// blue-600
pub const GRADIENT_END: Rgb = Rgb::from_rgb8(0x25, 0x63, 0xeb);
pub const GLOW_COLOR: Rgba = Rgba::new(34.0 / 255.0, 211.0 / 255.0, 238.0 / 255.0, 0.5);

/// Logical pixels.
pub const PADDING: f32 = 24.0;
pub const GAP: f32 = 16.0;
pub const ICON_SIZE: f32 = 32.0;
pub const TITLE_SIZE: f32 = 36.0;
pub const GLOW_RADIUS: f32 = 10.0;
/// Extra tracking as a fraction of the font size.
pub const LETTER_SPACING_EM: f32 = 0.1;

/// One full fade out and back, in seconds.
pub const PULSE_PERIOD: f32 = 2.0;
pub const PULSE_MIN_OPACITY: f32 = 0.5;
/// Control points of the pulse easing curve (`cubic-bezier(0.4, 0, 0.6, 1)`).
const PULSE_EASE: (f32, f32, f32, f32) = (0.4, 0.0, 0.6, 1.0);

/// Title/icon layer description consumed by the UI backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub title: &'static str,
    pub padding: f32,
    pub gap: f32,
    pub icon_size: f32,
    pub title_size: f32,
}

impl Overlay {
    pub const STANDARD: Self = Self {
        title: TITLE,
        padding: PADDING,
        gap: GAP,
        icon_size: ICON_SIZE,
        title_size: TITLE_SIZE,
    };

    /// The overlay never captures pointer input.
    pub fn is_interactive(&self) -> bool {
        false
    }

    /// Icon opacity `elapsed` seconds into the animation.
    pub fn pulse_opacity(&self, elapsed: f32) -> f32 {
        let phase = elapsed.rem_euclid(PULSE_PERIOD) / PULSE_PERIOD;
        let drop = 1.0 - PULSE_MIN_OPACITY;
        if phase < 0.5 {
            1.0 - drop * ease(phase * 2.0)
        } else {
            PULSE_MIN_OPACITY + drop * ease((phase - 0.5) * 2.0)
        }
    }

    /// Title gradient color at `t` in `[0, 1]` from left to right.
    pub fn gradient_at(&self, t: f32) -> Rgb {
        GRADIENT_START.lerp(GRADIENT_END, t.clamp(0.0, 1.0))
    }

    /// One color per title character, sampled at each glyph's center.
    pub fn glyph_colors(&self) -> Vec<(char, Rgb)> {
        let n = self.title.chars().count().max(1) as f32;
        self.title
            .chars()
            .enumerate()
            .map(|(i, c)| (c, self.gradient_at((i as f32 + 0.5) / n)))
            .collect()
    }

    /// Extra spacing between glyphs in logical pixels.
    pub fn letter_spacing(&self) -> f32 {
        self.title_size * LETTER_SPACING_EM
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Evaluate the pulse easing curve at progress `x` in `[0, 1]`.
fn ease(x: f32) -> f32 {
    let (x1, y1, x2, y2) = PULSE_EASE;
    let bezier = |p1: f32, p2: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };
    let x = x.clamp(0.0, 1.0);
    // x(s) is monotonic for these control points, so bisection converges.
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    for _ in 0..32 {
        let mid = 0.5 * (lo + hi);
        if bezier(x1, x2, mid) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier(y1, y2, 0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_keyframes() {
        let o = Overlay::default();
        assert!((o.pulse_opacity(0.0) - 1.0).abs() < 1e-4);
        assert!((o.pulse_opacity(1.0) - 0.5).abs() < 1e-4);
        assert!((o.pulse_opacity(2.0) - 1.0).abs() < 1e-4);
        // symmetric easing crosses the midpoint halfway through each half
        assert!((o.pulse_opacity(0.5) - 0.75).abs() < 1e-3);
        assert!((o.pulse_opacity(1.5) - 0.75).abs() < 1e-3);
    }

    #[test]
    fn pulse_stays_in_range() {
        let o = Overlay::default();
        for i in 0..400 {
            let a = o.pulse_opacity(i as f32 * 0.013);
            assert!((0.5 - 1e-4..=1.0 + 1e-4).contains(&a));
        }
    }

    #[test]
    fn easing_endpoints() {
        assert!(ease(0.0).abs() < 1e-4);
        assert!((ease(1.0) - 1.0).abs() < 1e-4);
        assert!(ease(0.25) < 0.25);
    }

    #[test]
    fn gradient_runs_cyan_to_blue() {
        let o = Overlay::default();
        assert_eq!(o.gradient_at(0.0), GRADIENT_START);
        assert_eq!(o.gradient_at(1.0), GRADIENT_END);
        let glyphs = o.glyph_colors();
        assert_eq!(glyphs.len(), TITLE.len());
        assert_eq!(glyphs[0].0, 'G');
        assert!(glyphs[0].1.g > glyphs[glyphs.len() - 1].1.g);
    }

    #[test]
    fn overlay_is_passive() {
        let o = Overlay::STANDARD;
        assert!(!o.is_interactive());
        assert_eq!(o.title, "GLOBAL RISK MONITOR");
        assert!((o.letter_spacing() - 3.6).abs() < 1e-5);
    }
}
