//! Camera acquisition boundary.

use std::sync::Arc;

use annocam_common::AnnocamResult;
use annocam_frame_model::FrameSource;
use async_trait::async_trait;

/// Desired camera resolution. The device may answer with a different
/// native size; surfaces are sized from the source, not the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRequest {
    pub width: u32,
    pub height: u32,
}

impl CameraRequest {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Provider of live camera streams.
///
/// Acquisition failure (permission denied, no device) is fatal to session
/// startup: no pipeline can start without a frame source.
#[async_trait]
pub trait CameraProvider: Send + Sync {
    async fn open(&self, request: CameraRequest) -> AnnocamResult<Arc<dyn FrameSource>>;
}
