use globeview_common::Rgb;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Light shines from this position toward the origin.
    pub position: Vec3,
    pub intensity: f32,
    pub color: Rgb,
}

impl DirectionalLight {
    /// Unit vector pointing from the origin toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    pub color: Rgb,
    /// Distance at which the contribution reaches zero.
    pub range: f32,
}

/// Fixed four-light setup: ambient fill, warm key, cool sky fill, cyan rim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    pub rim: PointLight,
}

impl LightRig {
    pub const STANDARD: Self = Self {
        ambient: AmbientLight {
            intensity: 3.5,
            color: Rgb::WHITE,
        },
        key: DirectionalLight {
            position: Vec3::new(15.0, 5.0, 5.0),
            intensity: 12.0,
            color: Rgb::from_rgb8(0xff, 0xfb, 0xeb),
        },
        fill: DirectionalLight {
            position: Vec3::new(-10.0, 5.0, -5.0),
            intensity: 2.0,
            color: Rgb::from_rgb8(0xb3, 0xd9, 0xff),
        },
        rim: PointLight {
            position: Vec3::new(-20.0, 0.0, -20.0),
            intensity: 8.0,
            color: Rgb::from_rgb8(0x05, 0xdc, 0xf9),
            range: 100.0,
        },
    };

    pub fn light_count(&self) -> usize {
        4
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_intensities() {
        let rig = LightRig::default();
        assert_eq!(rig.ambient.intensity, 3.5);
        assert_eq!(rig.key.intensity, 12.0);
        assert_eq!(rig.fill.intensity, 2.0);
        assert_eq!(rig.rim.intensity, 8.0);
        assert_eq!(rig.rim.range, 100.0);
        assert_eq!(rig.light_count(), 4);
    }

    #[test]
    fn key_and_fill_come_from_opposite_sides() {
        let rig = LightRig::STANDARD;
        assert!(rig.key.direction().x > 0.0);
        assert!(rig.fill.direction().x < 0.0);
        assert!((rig.key.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rim_sits_behind_the_planet() {
        let rig = LightRig::STANDARD;
        assert!(rig.rim.position.z < 0.0);
        assert_eq!(rig.rim.color.to_hex(), "#05dcf9");
        assert_eq!(rig.key.color.to_hex(), "#fffbeb");
    }
}
