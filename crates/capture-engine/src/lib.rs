//! Annocam Capture Engine
//!
//! Orchestrates the live annotation session: camera acquisition, the
//! recorder that captures the composited output surface as chunked
//! encoded media, and the session controller that owns startup order and
//! teardown.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                SessionController                 │
//! │  load models → open camera → size surfaces →     │
//! │  arm recorder → (playback ready) → compositor    │
//! │                                                  │
//! │  ┌────────────┐   ┌───────────────────────────┐  │
//! │  │ Compositor │──►│ output surface            │  │
//! │  └────────────┘   └──────────┬────────────────┘  │
//! │                              │ capture stream    │
//! │                   ┌──────────▼────────────────┐  │
//! │                   │ StreamRecorder            │  │
//! │                   │ chunks ──► artifact ──►   │  │
//! │                   │ preview handle / export   │  │
//! │                   └───────────────────────────┘  │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod artifact;
pub mod camera;
pub mod encoder;
pub mod recorder;
pub mod session;
pub mod synthetic;

pub use artifact::*;
pub use camera::*;
pub use encoder::*;
pub use recorder::*;
pub use session::*;
pub use synthetic::*;
