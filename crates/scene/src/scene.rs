use crate::camera::{CameraRig, CameraSpec};
use crate::config::SceneConfig;
use crate::lights::LightRig;
use crate::planet::PlanetBody;
use crate::sky::SkyField;
use globeview_assets::AssetId;
use globeview_common::Rgb;
use globeview_input::Action;

/// A subtree waiting on one asynchronous dependency.
///
/// Starts `Pending` and moves to `Ready` or `Failed` exactly once. While not
/// `Ready` the subtree is simply absent from the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Deferred<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Settle with a value. Returns false (and changes nothing) if already settled.
    fn resolve(&mut self, value: T) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = Self::Ready(value);
        true
    }

    /// Settle as failed. Returns false (and changes nothing) if already settled.
    fn fail(&mut self, reason: String) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = Self::Failed(reason);
        true
    }
}

/// The whole renderable globe scene.
///
/// Stars, lights and camera exist from the start; the planet appears once its
/// color map has been fetched.
#[derive(Debug, Clone)]
pub struct Scene {
    background: Rgb,
    sky: SkyField,
    lights: LightRig,
    camera: CameraRig,
    planet: Deferred<PlanetBody>,
    elapsed: f64,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Self {
        let scene = Self {
            background: config.background,
            sky: SkyField::generate(config.star_seed),
            lights: LightRig::STANDARD,
            camera: CameraRig::new(CameraSpec::STANDARD),
            planet: Deferred::Pending,
            elapsed: 0.0,
        };
        tracing::info!(
            stars = scene.sky.star_count(),
            seed = config.star_seed,
            "scene composed, planet pending"
        );
        scene
    }

    /// Attach the planet once its texture is available. Only the first
    /// settlement counts.
    pub fn resolve_planet(&mut self, texture: AssetId) -> bool {
        let mut planet = PlanetBody::new(texture);
        planet.advance(self.elapsed);
        let resolved = self.planet.resolve(planet);
        if resolved {
            tracing::info!(%texture, "planet attached");
        } else {
            tracing::warn!(%texture, "planet already settled, ignoring texture");
        }
        resolved
    }

    /// Record that the texture could not be loaded. The planet stays absent.
    pub fn fail_planet(&mut self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let failed = self.planet.fail(reason.clone());
        if failed {
            tracing::error!(%reason, "planet texture failed to load; planet will not be shown");
        }
        failed
    }

    /// Per-frame update: `dt` since the previous frame, `elapsed` since start.
    pub fn tick(&mut self, dt: f32, elapsed: f64) {
        self.elapsed = elapsed;
        if let Some(planet) = self.planet.ready_mut() {
            planet.advance(elapsed);
        }
        self.camera.update(dt);
    }

    pub fn apply(&mut self, action: Action) {
        if !action.is_noop() {
            self.camera.apply(action);
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn sky(&self) -> &SkyField {
        &self.sky
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn planet(&self) -> &Deferred<PlanetBody> {
        &self.planet
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn scene() -> Scene {
        Scene::new(&SceneConfig::default())
    }

    #[test]
    fn composes_sky_and_camera_before_planet() {
        let s = scene();
        assert!(s.planet().is_pending());
        assert_eq!(s.sky().layers().len(), 3);
        assert_eq!(s.camera().distance(), 7.0);
        assert_eq!(s.background().to_hex(), "#000005");
    }

    #[test]
    fn planet_resolves_once() {
        let mut s = scene();
        assert!(s.resolve_planet(AssetId(1)));
        assert!(!s.resolve_planet(AssetId(2)));
        assert!(!s.fail_planet("late failure"));
        assert_eq!(s.planet().ready().unwrap().texture(), AssetId(1));
    }

    #[test]
    fn failed_planet_never_appears() {
        let mut s = scene();
        assert!(s.fail_planet("404"));
        assert!(!s.resolve_planet(AssetId(1)));
        assert!(s.planet().ready().is_none());
        assert_eq!(s.planet(), &Deferred::Failed("404".into()));
    }

    #[test]
    fn tick_drives_planet_rotation() {
        let mut s = scene();
        s.resolve_planet(AssetId(1));
        s.tick(1.0 / 60.0, 0.0);
        assert_eq!(s.planet().ready().unwrap().rotation_y(), 0.0);
        s.tick(1.0 / 60.0, 20.0);
        assert!((s.planet().ready().unwrap().rotation_y() - 1.0).abs() < 1e-6);
        assert_eq!(s.elapsed(), 20.0);
    }

    #[test]
    fn late_planet_picks_up_current_time() {
        let mut s = scene();
        s.tick(1.0 / 60.0, 20.0);
        s.resolve_planet(AssetId(1));
        assert!((s.planet().ready().unwrap().rotation_y() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn actions_reach_the_camera() {
        let mut s = scene();
        for _ in 0..20 {
            s.apply(Action::Zoom(50.0));
            s.tick(1.0 / 60.0, 0.0);
        }
        assert_eq!(s.camera().distance(), 4.0);
        s.apply(Action::BeginOrbit);
        s.apply(Action::Orbit(Vec2::new(5.0, 0.0)));
        assert!(s.camera().is_dragging());
    }

    #[test]
    fn star_layers_independent_of_viewport() {
        let mut s = scene();
        s.set_viewport(320, 200);
        s.tick(0.5, 1.0);
        let counts: Vec<usize> = s.sky().layers().iter().map(|l| l.len()).collect();
        assert_eq!(counts, vec![8000, 6000, 4000]);
    }
}
