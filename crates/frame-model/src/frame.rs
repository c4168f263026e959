//! Camera frame representation.

use crate::geometry::DisplaySize;

/// Bytes per pixel; all frames and surfaces are RGBA8.
pub const BYTES_PER_PIXEL: usize = 4;

/// A single decoded video frame: contiguous RGBA bytes in row-major order.
///
/// Format conversion happens at the camera boundary; the pipeline treats
/// pixel data as opaque apart from compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "data length must equal width * height * 4"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// An opaque black frame of the given size.
    pub fn black(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL];
        for px in data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[3] = 255;
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native size of this frame; the display size for the tick it feeds.
    pub fn size(&self) -> DisplaySize {
        DisplaySize::new(self.width, self.height)
    }
}

/// Source of live frames (the camera boundary).
///
/// `current_frame` returns the most recent decoded frame, or `None` when
/// no frame is available yet; callers treat `None` as "skip this tick".
/// There is no frame queue: a frame missed while a caller was busy is
/// simply superseded by the next one.
pub trait FrameSource: Send + Sync + std::fmt::Debug {
    fn current_frame(&self) -> Option<Frame>;

    /// Native pixel dimensions of the stream, fixed at acquisition time.
    fn native_size(&self) -> DisplaySize;
}
