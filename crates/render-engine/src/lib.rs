//! Annocam Render Engine
//!
//! The live half of the pipeline: drawing detection annotations onto an
//! overlay surface and running the per-frame compositing loop.
//!
//! # Pipeline Architecture
//!
//! ```text
//! FrameSource ──► Compositor tick ──► FaceDetector (await)
//!                     │                     │
//!                     │      resized detections
//!                     │                     ▼
//!                     │        AnnotationRenderer ──► overlay surface
//!                     ▼                                    │
//!          output surface: clear ► frame ► overlay (alpha-over)
//!                     │
//!                     ▼
//!          StreamRecorder capture stream (samples continuously)
//! ```

pub mod annotation;
pub mod compositor;

pub use annotation::*;
pub use compositor::*;
