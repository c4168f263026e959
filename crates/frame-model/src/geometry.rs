//! Geometry primitives for detection coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale each axis independently.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
        }
    }
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scale position and size by per-axis factors.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A target pixel size for surfaces and rescaled detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Per-axis scale factors mapping this size onto `target`.
    ///
    /// A zero dimension maps to a factor of 1.0 so degenerate sources
    /// pass coordinates through unchanged instead of producing NaN.
    pub fn scale_to(&self, target: DisplaySize) -> (f32, f32) {
        let sx = if self.width == 0 {
            1.0
        } else {
            target.width as f32 / self.width as f32
        };
        let sy = if self.height == 0 {
            1.0
        } else {
            target.height as f32 / self.height as f32
        };
        (sx, sy)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_scaling() {
        let p = Point::new(10.0, 20.0);
        let q = p.scaled(2.0, 0.5);
        assert_eq!(q, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_rect_scaling_scales_size_and_position() {
        let r = Rect::new(10.0, 10.0, 40.0, 20.0);
        let s = r.scaled(2.0, 3.0);
        assert_eq!(s, Rect::new(20.0, 30.0, 80.0, 60.0));
        assert_eq!(s.right(), 100.0);
        assert_eq!(s.bottom(), 90.0);
    }

    #[test]
    fn test_scale_to_identity() {
        let size = DisplaySize::new(300, 200);
        assert_eq!(size.scale_to(size), (1.0, 1.0));
    }

    #[test]
    fn test_scale_to_independent_axes() {
        let native = DisplaySize::new(100, 50);
        let target = DisplaySize::new(200, 200);
        assert_eq!(native.scale_to(target), (2.0, 4.0));
    }

    #[test]
    fn test_scale_to_degenerate_source() {
        let native = DisplaySize::new(0, 0);
        let target = DisplaySize::new(200, 200);
        assert_eq!(native.scale_to(target), (1.0, 1.0));
    }
}
