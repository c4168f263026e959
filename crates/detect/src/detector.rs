//! Detector trait and configuration.

use annocam_common::AnnocamResult;
use annocam_frame_model::{Detection, Frame};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Speed/accuracy tradeoff for the detector backend.
///
/// Opaque to the pipeline; implementations map variants onto whatever
/// model they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorVariant {
    /// Small, fast model suitable for realtime ticks.
    Fast,
    /// Larger model; ticks degrade gracefully if it is slow.
    Accurate,
}

/// Configuration passed to every `detect` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub variant: DetectorVariant,

    /// Minimum confidence for a detection to be reported.
    pub score_threshold: f32,

    /// Whether landmark points are requested alongside boxes.
    pub with_landmarks: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            variant: DetectorVariant::Fast,
            score_threshold: 0.5,
            with_landmarks: true,
        }
    }
}

/// Asynchronous face/landmark detector.
///
/// `load` is a one-time setup step the session waits on before the
/// compositing loop may start. `detect` takes `&self` so the compositor
/// task can share the detector behind an `Arc`; stateful implementations
/// use interior mutability.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Load model assets from a URI (file path, bundled resource, ...).
    async fn load(&self, model_uri: &str) -> AnnocamResult<()>;

    /// Detect faces in `frame`. Results are tagged with the frame's
    /// native size; callers rescale via `Detection::resized`.
    async fn detect(&self, frame: &Frame, config: &DetectorConfig) -> AnnocamResult<Vec<Detection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_requests_landmarks() {
        let config = DetectorConfig::default();
        assert_eq!(config.variant, DetectorVariant::Fast);
        assert!(config.with_landmarks);
        assert!(config.score_threshold > 0.0);
    }
}
