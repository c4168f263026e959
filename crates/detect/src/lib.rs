//! Annocam Detector Contract
//!
//! The detector is an external collaborator: the pipeline only depends on
//! the [`FaceDetector`] trait and its configuration. Real implementations
//! wrap a model runtime; the in-tree [`fixture`] module provides
//! deterministic detectors for tests and examples.

pub mod detector;
pub mod fixture;

pub use detector::*;
pub use fixture::*;
