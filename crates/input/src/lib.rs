//! Input mapping: raw pointer events in, camera actions out.
//!
//! # Invariants
//! - No windowing types cross this boundary; the desktop app translates its
//!   events into the plain calls on [`PointerTracker`].
//! - The scene consumes [`Action`]s, never raw input events.

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{PointerButton, PointerTracker};

pub fn crate_info() -> &'static str {
    "globeview-input v0.1.0"
}
