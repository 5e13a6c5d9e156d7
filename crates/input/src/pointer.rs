use crate::action::Action;
use glam::Vec2;

/// Pixels of smooth scrolling treated as one wheel step.
pub const PIXELS_PER_WHEEL_STEP: f32 = 100.0;

/// Wheel steps per unit of pinch magnification.
pub const STEPS_PER_PINCH: f32 = 10.0;

/// Pointer buttons the tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Turns button, cursor and wheel events into [`Action`]s.
///
/// Primary drag orbits, secondary drag pans, wheel and pinch zoom.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_position: Option<Vec2>,
    dragging: Option<PointerButton>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button currently held for a drag, if any.
    pub fn dragging(&self) -> Option<PointerButton> {
        self.dragging
    }

    pub fn on_button(&mut self, button: PointerButton, pressed: bool) -> Action {
        match (pressed, self.dragging) {
            (true, None) => {
                tracing::trace!(?button, "drag started");
                self.dragging = Some(button);
                if button == PointerButton::Primary {
                    Action::BeginOrbit
                } else {
                    Action::Noop
                }
            }
            (false, Some(held)) if held == button => {
                self.dragging = None;
                if button == PointerButton::Primary {
                    Action::EndOrbit
                } else {
                    Action::Noop
                }
            }
            _ => Action::Noop,
        }
    }

    pub fn on_cursor_moved(&mut self, position: Vec2) -> Action {
        let previous = self.last_position.replace(position);
        let Some(previous) = previous else {
            return Action::Noop;
        };
        let delta = position - previous;
        if delta == Vec2::ZERO {
            return Action::Noop;
        }
        match self.dragging {
            Some(PointerButton::Primary) => Action::Orbit(delta),
            Some(PointerButton::Secondary) => Action::Pan(delta),
            None => Action::Noop,
        }
    }

    /// Cursor left the window: forget the anchor and end any drag.
    pub fn on_cursor_left(&mut self) -> Action {
        self.last_position = None;
        match self.dragging.take() {
            Some(PointerButton::Primary) => Action::EndOrbit,
            _ => Action::Noop,
        }
    }

    /// Line-based wheel delta; positive is "scroll up".
    pub fn on_wheel_lines(&mut self, lines: f32) -> Action {
        if lines == 0.0 {
            Action::Noop
        } else {
            Action::Zoom(lines)
        }
    }

    /// Pixel-based wheel delta from touchpads; positive is "scroll up".
    pub fn on_wheel_pixels(&mut self, pixels: f32) -> Action {
        self.on_wheel_lines(pixels / PIXELS_PER_WHEEL_STEP)
    }

    /// Pinch magnification delta; positive spreads the fingers (zoom in).
    pub fn on_pinch(&mut self, delta: f32) -> Action {
        self.on_wheel_lines(delta * STEPS_PER_PINCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_drag_orbits() {
        let mut p = PointerTracker::new();
        assert_eq!(p.on_cursor_moved(Vec2::new(10.0, 10.0)), Action::Noop);
        assert_eq!(p.on_button(PointerButton::Primary, true), Action::BeginOrbit);
        assert_eq!(
            p.on_cursor_moved(Vec2::new(15.0, 8.0)),
            Action::Orbit(Vec2::new(5.0, -2.0))
        );
        assert_eq!(p.on_button(PointerButton::Primary, false), Action::EndOrbit);
        assert_eq!(p.on_cursor_moved(Vec2::new(20.0, 8.0)), Action::Noop);
    }

    #[test]
    fn secondary_drag_pans() {
        let mut p = PointerTracker::new();
        p.on_cursor_moved(Vec2::ZERO);
        assert_eq!(p.on_button(PointerButton::Secondary, true), Action::Noop);
        assert_eq!(
            p.on_cursor_moved(Vec2::new(1.0, 1.0)),
            Action::Pan(Vec2::new(1.0, 1.0))
        );
    }

    #[test]
    fn second_button_during_drag_is_ignored() {
        let mut p = PointerTracker::new();
        p.on_button(PointerButton::Primary, true);
        assert_eq!(p.on_button(PointerButton::Secondary, true), Action::Noop);
        assert_eq!(p.on_button(PointerButton::Secondary, false), Action::Noop);
        assert_eq!(p.dragging(), Some(PointerButton::Primary));
    }

    #[test]
    fn leaving_window_ends_orbit() {
        let mut p = PointerTracker::new();
        p.on_button(PointerButton::Primary, true);
        assert_eq!(p.on_cursor_left(), Action::EndOrbit);
        assert_eq!(p.dragging(), None);
        assert_eq!(p.on_cursor_left(), Action::Noop);
    }

    #[test]
    fn wheel_and_pinch_zoom() {
        let mut p = PointerTracker::new();
        assert_eq!(p.on_wheel_lines(2.0), Action::Zoom(2.0));
        assert_eq!(p.on_wheel_lines(0.0), Action::Noop);
        assert_eq!(p.on_wheel_pixels(-50.0), Action::Zoom(-0.5));
        assert_eq!(p.on_pinch(0.1), Action::Zoom(1.0));
    }
}
