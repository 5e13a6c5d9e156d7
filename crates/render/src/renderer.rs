use globeview_scene::{CameraRig, Deferred, Scene};
use glam::Vec3;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl RenderView {
    pub fn from_camera(camera: &CameraRig) -> Self {
        Self {
            eye: camera.eye(),
            target: camera.target(),
            fov_degrees: camera.spec().fov_degrees,
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&CameraRig::default())
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and produces output; it never mutates the
/// scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the scene as seen from its camera rig.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Produces a human-readable description of the scene.
///
/// Used by the CLI and by tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let view = RenderView::from_camera(scene.camera());
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Globe Scene (t={:.2}s, background={}) ===",
            scene.elapsed(),
            scene.background().to_hex()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} distance={:.2}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            scene.camera().distance()
        );

        let lights = scene.lights();
        let _ = writeln!(out, "Lights: {}", lights.light_count());
        let _ = writeln!(
            out,
            "  ambient intensity={} color={}",
            lights.ambient.intensity,
            lights.ambient.color.to_hex()
        );
        for (name, light) in [("key", &lights.key), ("fill", &lights.fill)] {
            let _ = writeln!(
                out,
                "  {name} directional intensity={} color={} from=({:.0}, {:.0}, {:.0})",
                light.intensity,
                light.color.to_hex(),
                light.position.x,
                light.position.y,
                light.position.z
            );
        }
        let _ = writeln!(
            out,
            "  rim point intensity={} color={} range={}",
            lights.rim.intensity,
            lights.rim.color.to_hex(),
            lights.rim.range
        );

        let _ = writeln!(out, "Stars: {} (seed={})", scene.sky().star_count(), scene.sky().seed());
        for (i, layer) in scene.sky().layers().iter().enumerate() {
            let spec = layer.spec();
            let _ = writeln!(
                out,
                "  layer {} radius={} depth={} count={} factor={} saturation={} fade={} speed={}",
                i + 1,
                spec.radius,
                spec.depth,
                layer.len(),
                spec.factor,
                spec.saturation,
                spec.fade,
                spec.speed
            );
        }

        match scene.planet() {
            Deferred::Pending => {
                let _ = writeln!(out, "Planet: pending");
            }
            Deferred::Failed(reason) => {
                let _ = writeln!(out, "Planet: unavailable ({reason})");
            }
            Deferred::Ready(planet) => {
                let _ = writeln!(
                    out,
                    "Planet: texture={} rotation={:.3}rad body_scale={} halo_scale={}",
                    planet.texture(),
                    planet.rotation_y(),
                    planet.body().transform.scale.x,
                    planet.halo().transform.scale.x
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globeview_assets::AssetId;
    use globeview_scene::SceneConfig;

    #[test]
    fn pending_scene() {
        let scene = Scene::new(&SceneConfig::default());
        let output = DebugTextRenderer::new().render(&scene);

        assert!(output.contains("background=#000005"));
        assert!(output.contains("Stars: 18000"));
        assert!(output.contains("count=8000"));
        assert!(output.contains("Planet: pending"));
        assert!(output.contains("Lights: 4"));
    }

    #[test]
    fn ready_scene_reports_rotation() {
        let mut scene = Scene::new(&SceneConfig::default());
        scene.resolve_planet(AssetId(0xabc));
        scene.tick(1.0 / 60.0, 20.0);
        let output = DebugTextRenderer::new().render(&scene);

        assert!(output.contains("rotation=1.000rad"));
        assert!(output.contains("halo_scale=2.7"));
        assert!(output.contains("texture=0000000000000abc"));
    }

    #[test]
    fn failed_scene() {
        let mut scene = Scene::new(&SceneConfig::default());
        scene.fail_planet("timed out");
        let output = DebugTextRenderer::new().render(&scene);
        assert!(output.contains("Planet: unavailable (timed out)"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 40.0);
        assert_eq!(view.target, Vec3::ZERO);
        assert!((view.eye.z - 7.0).abs() < 1e-5);
    }
}
