use glam::Vec2;

/// A high-level camera action produced from pointer input.
///
/// The camera rig decides what each action means (for instance pan is
/// produced here but ignored by a rig with panning disabled).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A drag started; idle auto-rotation pauses until [`Action::EndOrbit`].
    BeginOrbit,
    /// Orbit by a pointer delta in physical pixels.
    Orbit(Vec2),
    /// The drag ended.
    EndOrbit,
    /// Pan by a pointer delta in physical pixels.
    Pan(Vec2),
    /// Zoom by a number of wheel steps. Positive moves the camera closer.
    Zoom(f32),
    /// Nothing to do.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_carries_delta() {
        let a = Action::Orbit(Vec2::new(3.0, -1.0));
        assert!(matches!(a, Action::Orbit(d) if d.x == 3.0 && d.y == -1.0));
    }

    #[test]
    fn noop_detection() {
        assert!(Action::Noop.is_noop());
        assert!(!Action::Zoom(1.0).is_noop());
        assert!(!Action::BeginOrbit.is_noop());
    }
}
