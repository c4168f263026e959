//! Mutable 2D drawing surfaces.
//!
//! `PixelSurface` backs both the annotation overlay and the composited
//! output. The compositor is the only writer; the recorder's capture
//! stream samples `snapshot()` at its own cadence.

use std::sync::{Arc, Mutex};

use crate::frame::{Frame, BYTES_PER_PIXEL};
use crate::geometry::{DisplaySize, Point, Rect};

/// RGBA color, straight (non-premultiplied) alpha.
pub type Rgba = [u8; 4];

/// A surface shared between the compositor (writer) and the capture
/// stream (sampler). Both sides hold the lock only for a single draw or
/// snapshot; a sample taken between draw calls is accepted tearing.
pub type SharedSurface = Arc<Mutex<PixelSurface>>;

/// Wrap a surface for sharing.
pub fn shared(surface: PixelSurface) -> SharedSurface {
    Arc::new(Mutex::new(surface))
}

/// A mutable RGBA drawing target with a fixed size.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    data: Vec<u8>,
    size: DisplaySize,
}

impl PixelSurface {
    /// A fully transparent surface of the given size.
    pub fn new(size: DisplaySize) -> Self {
        Self {
            data: vec![0u8; size.pixel_count() * BYTES_PER_PIXEL],
            size,
        }
    }

    pub fn size(&self) -> DisplaySize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Copy the sampled pixels; this is what the capture stream encodes.
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.size.width) || y >= i64::from(self.size.height) {
            return;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.data[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&color);
    }

    /// Blit a frame at (0,0). The overlapping region is copied verbatim;
    /// a size mismatch clips rather than erroring, since surface sizes
    /// are fixed at session start while frames follow the camera.
    pub fn draw_frame(&mut self, frame: &Frame) {
        let copy_w = frame.width().min(self.size.width) as usize;
        let copy_h = frame.height().min(self.size.height) as usize;
        let src = frame.data();
        let src_stride = frame.width() as usize * BYTES_PER_PIXEL;
        let dst_stride = self.size.width as usize * BYTES_PER_PIXEL;
        let row_bytes = copy_w * BYTES_PER_PIXEL;

        for row in 0..copy_h {
            let src_off = row * src_stride;
            let dst_off = row * dst_stride;
            self.data[dst_off..dst_off + row_bytes]
                .copy_from_slice(&src[src_off..src_off + row_bytes]);
        }
    }

    /// Alpha-over composite `top` onto this surface at (0,0).
    ///
    /// Fully transparent source pixels leave the background untouched, so
    /// an overlay never occludes the frame outside its annotations.
    pub fn composite_over(&mut self, top: &PixelSurface) {
        let w = top.size.width.min(self.size.width) as usize;
        let h = top.size.height.min(self.size.height) as usize;
        let src_stride = top.size.width as usize;
        let dst_stride = self.size.width as usize;

        for y in 0..h {
            for x in 0..w {
                let s = (y * src_stride + x) * BYTES_PER_PIXEL;
                let alpha = top.data[s + 3];
                if alpha == 0 {
                    continue;
                }
                let d = (y * dst_stride + x) * BYTES_PER_PIXEL;
                if alpha == 255 {
                    self.data[d..d + BYTES_PER_PIXEL]
                        .copy_from_slice(&top.data[s..s + BYTES_PER_PIXEL]);
                    continue;
                }
                let a = u32::from(alpha);
                let inv = 255 - a;
                for c in 0..3 {
                    let over = u32::from(top.data[s + c]) * a;
                    let under = u32::from(self.data[d + c]) * inv;
                    self.data[d + c] = ((over + under) / 255) as u8;
                }
                let out_a = a + u32::from(self.data[d + 3]) * inv / 255;
                self.data[d + 3] = out_a.min(255) as u8;
            }
        }
    }

    /// Draw a one-pixel rectangle outline, clamped to the surface.
    pub fn draw_rect_outline(&mut self, rect: Rect, color: Rgba) {
        let left = rect.x.round() as i64;
        let top = rect.y.round() as i64;
        let right = rect.right().round() as i64;
        let bottom = rect.bottom().round() as i64;

        for x in left..=right {
            self.put_pixel(x, top, color);
            self.put_pixel(x, bottom, color);
        }
        for y in top..=bottom {
            self.put_pixel(left, y, color);
            self.put_pixel(right, y, color);
        }
    }

    /// Draw a filled dot centered on `point`.
    pub fn fill_dot(&mut self, point: Point, radius: u32, color: Rgba) {
        let cx = point.x.round() as i64;
        let cy = point.y.round() as i64;
        let r = i64::from(radius);
        let r2 = r * r;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    self.put_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Whether every pixel is transparent black.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}
