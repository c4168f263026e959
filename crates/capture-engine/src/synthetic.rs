//! Synthetic camera sources for tests and self-contained runs.

use std::sync::Arc;
use std::time::Instant;

use annocam_common::{AnnocamError, AnnocamResult};
use annocam_frame_model::{DisplaySize, Frame, FrameSource, BYTES_PER_PIXEL};
use async_trait::async_trait;

use crate::camera::{CameraProvider, CameraRequest};

/// Generate one test-pattern frame: a dark background with a bright
/// marker square whose position advances with `phase_ms`, so successive
/// frames differ and motion survives into recordings.
pub fn test_pattern(size: DisplaySize, phase_ms: u64) -> Frame {
    let mut data = Vec::with_capacity(size.pixel_count() * BYTES_PER_PIXEL);
    for _ in 0..size.pixel_count() {
        data.extend_from_slice(&[40, 40, 50, 255]);
    }

    if size.width > 0 && size.height > 0 {
        let marker = (size.width.min(size.height) / 5).max(1);
        let travel = u64::from(size.width.saturating_sub(marker).max(1));
        let x0 = ((phase_ms / 40) % travel) as u32;
        let y0 = (size.height - marker) / 2;

        let stride = size.width as usize * BYTES_PER_PIXEL;
        for y in y0..y0 + marker {
            for x in x0..(x0 + marker).min(size.width) {
                let idx = y as usize * stride + x as usize * BYTES_PER_PIXEL;
                data[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&[255, 200, 60, 255]);
            }
        }
    }
    Frame::new(data, size.width, size.height)
}

/// A frame source producing the moving test pattern in real time.
#[derive(Debug)]
pub struct SyntheticFrameSource {
    size: DisplaySize,
    start: Instant,
}

impl SyntheticFrameSource {
    pub fn new(size: DisplaySize) -> Self {
        Self {
            size,
            start: Instant::now(),
        }
    }
}

impl FrameSource for SyntheticFrameSource {
    fn current_frame(&self) -> Option<Frame> {
        let phase_ms = self.start.elapsed().as_millis() as u64;
        Some(test_pattern(self.size, phase_ms))
    }

    fn native_size(&self) -> DisplaySize {
        self.size
    }
}

/// A camera provider that always grants a synthetic source at the
/// requested size.
#[derive(Debug, Default)]
pub struct SyntheticCamera;

#[async_trait]
impl CameraProvider for SyntheticCamera {
    async fn open(&self, request: CameraRequest) -> AnnocamResult<Arc<dyn FrameSource>> {
        tracing::info!(
            width = request.width,
            height = request.height,
            "Opening synthetic camera"
        );
        Ok(Arc::new(SyntheticFrameSource::new(DisplaySize::new(
            request.width,
            request.height,
        ))))
    }
}

/// A camera provider that always refuses, mimicking a denied permission
/// prompt or missing device.
#[derive(Debug)]
pub struct DeniedCamera {
    reason: String,
}

impl DeniedCamera {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CameraProvider for DeniedCamera {
    async fn open(&self, _request: CameraRequest) -> AnnocamResult<Arc<dyn FrameSource>> {
        Err(AnnocamError::camera(self.reason.clone()))
    }
}
