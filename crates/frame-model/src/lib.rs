//! Annocam Frame Model
//!
//! Shared data model for the annotation pipeline:
//! - `Frame`: one decoded RGBA image from the camera
//! - `PixelSurface`: a mutable drawing target (overlay and output)
//! - Geometry primitives and the detection coordinate transform
//!
//! Coordinate convention: origin at the top-left, x rightward, y downward,
//! in pixels of whatever space a value is tagged with (`Detection::native`).

pub mod detection;
pub mod frame;
pub mod geometry;
pub mod surface;

pub use detection::*;
pub use frame::*;
pub use geometry::*;
pub use surface::*;
