use globeview_input::Action;
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// Keeps the polar angle off the poles so the view basis stays defined.
const POLE_EPSILON: f32 = 1e-6;
/// Upper bound on the magnitude of pending log-zoom; far beyond anything the
/// distance clamp lets through, and keeps the math finite.
const MAX_PENDING_ZOOM: f32 = 20.0;
/// Distance scale per wheel step.
const ZOOM_STEP_SCALE: f32 = 0.95;

/// Static camera and orbit-controller parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSpec {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Starting eye position; the orbit target is the origin.
    pub initial_position: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_zoom: bool,
    pub auto_rotate: bool,
    /// Azimuth rate is `2π / 60 * auto_rotate_speed` radians per second.
    pub auto_rotate_speed: f32,
    /// Share of each pending orbit/zoom delta consumed per update.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl CameraSpec {
    pub const STANDARD: Self = Self {
        fov_degrees: 40.0,
        near: 0.1,
        far: 1000.0,
        initial_position: Vec3::new(0.0, 0.0, 7.0),
        min_distance: 4.0,
        max_distance: 12.0,
        enable_zoom: true,
        auto_rotate: true,
        auto_rotate_speed: 0.5,
        damping_factor: 0.05,
        rotate_speed: 1.0,
        zoom_speed: 1.0,
    };
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Perspective camera orbiting the origin.
///
/// Pointer input only queues deltas; [`CameraRig::update`] eases them in once
/// per frame. Panning is not supported, pan actions are dropped.
#[derive(Debug, Clone)]
pub struct CameraRig {
    spec: CameraSpec,
    target: Vec3,
    radius: f32,
    /// Azimuth around +Y, zero on +Z.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    /// Natural log of the distance scale still to apply.
    pending_zoom: f32,
    dragging: bool,
    viewport: (f32, f32),
}

impl CameraRig {
    pub fn new(spec: CameraSpec) -> Self {
        let offset = spec.initial_position;
        let radius = offset.length().clamp(spec.min_distance, spec.max_distance);
        let theta = offset.x.atan2(offset.z);
        let phi = if offset.length() > 0.0 {
            (offset.y / offset.length()).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };
        Self {
            spec,
            target: Vec3::ZERO,
            radius,
            theta,
            phi: phi.clamp(POLE_EPSILON, PI - POLE_EPSILON),
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_zoom: 0.0,
            dragging: false,
            viewport: (1280.0, 720.0),
        }
    }

    pub fn spec(&self) -> &CameraSpec {
        &self.spec
    }

    /// Physical size of the render surface, used for aspect and drag scale.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1) as f32, height.max(1) as f32);
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 / self.viewport.1
    }

    /// Queue a user action. Motion happens in [`CameraRig::update`].
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::BeginOrbit => self.dragging = true,
            Action::EndOrbit => self.dragging = false,
            Action::Orbit(delta) if delta.is_finite() => {
                let per_pixel = TAU / self.viewport.1 * self.spec.rotate_speed;
                self.pending_theta -= delta.x * per_pixel;
                self.pending_phi -= delta.y * per_pixel;
            }
            Action::Zoom(steps) if steps.is_finite() && self.spec.enable_zoom => {
                let log_scale = steps * self.spec.zoom_speed * ZOOM_STEP_SCALE.ln();
                self.pending_zoom =
                    (self.pending_zoom + log_scale).clamp(-MAX_PENDING_ZOOM, MAX_PENDING_ZOOM);
            }
            Action::Pan(_) => tracing::trace!("pan ignored"),
            _ => {}
        }
    }

    /// Advance one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let damping = self.spec.damping_factor;
        if self.spec.auto_rotate && !self.dragging && dt.is_finite() && dt > 0.0 {
            self.pending_theta -= TAU / 60.0 * self.spec.auto_rotate_speed * dt;
        }

        self.theta = (self.theta + self.pending_theta * damping).rem_euclid(TAU);
        self.phi = (self.phi + self.pending_phi * damping).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.radius = (self.radius * (self.pending_zoom * damping).exp())
            .clamp(self.spec.min_distance, self.spec.max_distance);

        self.pending_theta *= 1.0 - damping;
        self.pending_phi *= 1.0 - damping;
        self.pending_zoom *= 1.0 - damping;
    }

    /// Distance from the orbit target.
    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    pub fn polar(&self) -> f32 {
        self.phi
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn eye(&self) -> Vec3 {
        let s = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * s * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * s * self.theta.cos(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.spec.fov_degrees.to_radians(),
            self.aspect(),
            self.spec.near,
            self.spec.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraSpec::STANDARD)
    }
}
