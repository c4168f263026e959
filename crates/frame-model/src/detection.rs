//! Detection results and the coordinate transform between frame spaces.

use serde::{Deserialize, Serialize};

use crate::geometry::{DisplaySize, Point, Rect};

/// One detected face: bounding box plus ordered landmark points, in the
/// coordinate space of the frame the detector ran on (`native`).
///
/// Immutable once produced; rescaling yields a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub rect: Rect,
    pub landmarks: Vec<Point>,
    pub native: DisplaySize,
}

impl Detection {
    pub fn new(rect: Rect, landmarks: Vec<Point>, native: DisplaySize) -> Self {
        Self {
            rect,
            landmarks,
            native,
        }
    }

    /// Map this detection into `target` space by scaling every coordinate
    /// by `target / native` per axis. Identity when the sizes match.
    pub fn resized(&self, target: DisplaySize) -> Detection {
        let (sx, sy) = self.native.scale_to(target);
        Detection {
            rect: self.rect.scaled(sx, sy),
            landmarks: self.landmarks.iter().map(|p| p.scaled(sx, sy)).collect(),
            native: target,
        }
    }
}

/// Rescale a whole result set to `target` space, preserving order.
pub fn resize_detections(detections: &[Detection], target: DisplaySize) -> Vec<Detection> {
    detections.iter().map(|d| d.resized(target)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detection(x: f32, y: f32, w: f32, h: f32, native: DisplaySize) -> Detection {
        Detection::new(
            Rect::new(x, y, w, h),
            vec![Point::new(x + 1.0, y + 1.0), Point::new(x + w, y + h)],
            native,
        )
    }

    #[test]
    fn test_resize_identity() {
        let native = DisplaySize::new(300, 200);
        let d = detection(10.0, 20.0, 50.0, 40.0, native);
        let same = d.resized(native);
        assert_eq!(same, d);
    }

    #[test]
    fn test_resize_scales_rect_and_landmarks() {
        let d = detection(10.0, 10.0, 20.0, 20.0, DisplaySize::new(100, 100));
        let scaled = d.resized(DisplaySize::new(200, 50));
        assert_eq!(scaled.rect, Rect::new(20.0, 5.0, 40.0, 10.0));
        assert_eq!(scaled.landmarks[0], Point::new(22.0, 5.5));
        assert_eq!(scaled.native, DisplaySize::new(200, 50));
    }

    #[test]
    fn test_resize_preserves_order_and_count() {
        let native = DisplaySize::new(100, 100);
        let set = vec![
            detection(0.0, 0.0, 10.0, 10.0, native),
            detection(50.0, 50.0, 10.0, 10.0, native),
        ];
        let resized = resize_detections(&set, DisplaySize::new(200, 200));
        assert_eq!(resized.len(), 2);
        assert!(resized[0].rect.x < resized[1].rect.x);
        assert_eq!(resized[0].landmarks.len(), 2);
    }

    proptest! {
        #[test]
        fn resize_scales_by_exact_ratio(
            x in 0.0f32..1000.0,
            y in 0.0f32..1000.0,
            w in 1.0f32..500.0,
            h in 1.0f32..500.0,
            nw in 1u32..4096,
            nh in 1u32..4096,
            tw in 1u32..4096,
            th in 1u32..4096,
        ) {
            let native = DisplaySize::new(nw, nh);
            let target = DisplaySize::new(tw, th);
            let d = detection(x, y, w, h, native);
            let r = d.resized(target);

            let sx = tw as f32 / nw as f32;
            let sy = th as f32 / nh as f32;
            prop_assert_eq!(r.rect.x, x * sx);
            prop_assert_eq!(r.rect.y, y * sy);
            prop_assert_eq!(r.rect.width, w * sx);
            prop_assert_eq!(r.rect.height, h * sy);
            prop_assert_eq!(r.landmarks[0].x, (x + 1.0) * sx);
            prop_assert_eq!(r.landmarks[0].y, (y + 1.0) * sy);
        }

        #[test]
        fn resize_to_native_is_identity(
            x in 0.0f32..1000.0,
            y in 0.0f32..1000.0,
            nw in 1u32..4096,
            nh in 1u32..4096,
        ) {
            let native = DisplaySize::new(nw, nh);
            let d = detection(x, y, 10.0, 10.0, native);
            prop_assert_eq!(d.resized(native), d);
        }
    }
}
