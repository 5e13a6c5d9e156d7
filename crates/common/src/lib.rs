//! Shared value types used across the globe viewer crates.
//!
//! Everything here is plain data: no GPU handles, no I/O.

mod color;
mod types;

pub use color::{ColorParseError, Rgb, Rgba};
pub use types::Transform;

pub fn crate_info() -> &'static str {
    "globeview-common v0.1.0"
}
