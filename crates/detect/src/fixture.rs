//! Deterministic detectors for tests and examples.
//!
//! A `FixtureDetector` reports scripted faces at fractional positions so
//! the same fixture works at any frame size, and can be configured to be
//! slow or failing to exercise the pipeline's degraded paths.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use annocam_common::{AnnocamError, AnnocamResult};
use annocam_frame_model::{Detection, DisplaySize, Frame, Point, Rect};
use async_trait::async_trait;

use crate::detector::{DetectorConfig, FaceDetector};

/// A scripted face in fractional coordinates (0.0..=1.0 of the frame).
#[derive(Debug, Clone)]
pub struct FixtureFace {
    pub rect: Rect,
    pub landmarks: Vec<Point>,
}

impl FixtureFace {
    /// A face box centered in the frame with landmarks at the corners
    /// and center of the box.
    pub fn centered() -> Self {
        Self {
            rect: Rect::new(0.3, 0.3, 0.4, 0.4),
            landmarks: vec![
                Point::new(0.4, 0.4),
                Point::new(0.6, 0.4),
                Point::new(0.5, 0.5),
                Point::new(0.4, 0.6),
                Point::new(0.6, 0.6),
            ],
        }
    }

    fn at_size(&self, size: DisplaySize) -> Detection {
        let w = size.width as f32;
        let h = size.height as f32;
        Detection::new(
            self.rect.scaled(w, h),
            self.landmarks.iter().map(|p| p.scaled(w, h)).collect(),
            size,
        )
    }
}

/// Deterministic [`FaceDetector`] implementation.
pub struct FixtureDetector {
    faces: Vec<FixtureFace>,
    delay: Option<Duration>,
    fail_detect: bool,
    loaded: AtomicBool,
    calls: AtomicU64,
}

impl FixtureDetector {
    pub fn new(faces: Vec<FixtureFace>) -> Self {
        Self {
            faces,
            delay: None,
            fail_detect: false,
            loaded: AtomicBool::new(false),
            calls: AtomicU64::new(0),
        }
    }

    /// One centered face.
    pub fn single_face() -> Self {
        Self::new(vec![FixtureFace::centered()])
    }

    /// No faces at all.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Every `detect` call fails; the compositor must absorb this.
    pub fn failing() -> Self {
        let mut detector = Self::empty();
        detector.fail_detect = true;
        detector
    }

    /// Add artificial latency per `detect` call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `detect` calls made so far.
    pub fn detect_calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FaceDetector for FixtureDetector {
    async fn load(&self, model_uri: &str) -> AnnocamResult<()> {
        if model_uri.is_empty() {
            return Err(AnnocamError::asset_load("model URI is empty"));
        }
        self.loaded.store(true, Ordering::SeqCst);
        tracing::debug!(model_uri, "Fixture detector loaded");
        Ok(())
    }

    async fn detect(&self, frame: &Frame, config: &DetectorConfig) -> AnnocamResult<Vec<Detection>> {
        if !self.is_loaded() {
            return Err(AnnocamError::detection("detector assets not loaded"));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_detect {
            return Err(AnnocamError::detection("fixture configured to fail"));
        }

        let size = frame.size();
        let mut detections: Vec<Detection> =
            self.faces.iter().map(|f| f.at_size(size)).collect();
        if !config.with_landmarks {
            for d in &mut detections {
                d.landmarks.clear();
            }
        }
        Ok(detections)
    }
}
