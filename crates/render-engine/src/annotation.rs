//! Annotation rendering: detection boxes and landmark dots.

use annocam_frame_model::{resize_detections, Detection, PixelSurface, Rgba};

/// Visual style for rendered annotations.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    /// Bounding box outline color.
    pub box_color: Rgba,

    /// Landmark dot color.
    pub landmark_color: Rgba,

    /// Landmark dot radius in pixels.
    pub landmark_radius: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            box_color: [0, 255, 0, 255],
            landmark_color: [255, 64, 64, 255],
            landmark_radius: 2,
        }
    }
}

/// Draws detections onto an overlay surface.
///
/// The renderer owns the overlay it is handed for the duration of one
/// `render` call: it clears that surface and nothing else, so content on
/// other surfaces written in the same tick survives.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRenderer {
    style: RenderStyle,
}

impl AnnotationRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Clear `surface`, then draw one rectangle per detection and one dot
    /// per landmark, mapped into the surface's coordinate space. With no
    /// detections the surface is left cleared and blank.
    pub fn render(&self, surface: &mut PixelSurface, detections: &[Detection]) {
        surface.clear();
        if detections.is_empty() {
            return;
        }

        // Identity when the caller already rescaled to the surface size.
        let mapped = resize_detections(detections, surface.size());
        for detection in &mapped {
            surface.draw_rect_outline(detection.rect, self.style.box_color);
            for landmark in &detection.landmarks {
                surface.fill_dot(*landmark, self.style.landmark_radius, self.style.landmark_color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annocam_frame_model::{DisplaySize, Point, Rect};

    fn sample_detection(native: DisplaySize) -> Detection {
        Detection::new(
            Rect::new(10.0, 10.0, 20.0, 20.0),
            vec![Point::new(20.0, 20.0)],
            native,
        )
    }

    #[test]
    fn no_detections_leaves_surface_blank() {
        let mut surface = PixelSurface::new(DisplaySize::new(50, 50));
        surface.fill_dot(Point::new(25.0, 25.0), 3, [9, 9, 9, 255]);

        AnnotationRenderer::default().render(&mut surface, &[]);
        assert!(surface.is_blank());
    }

    #[test]
    fn identity_scale_draws_at_input_coordinates() {
        let size = DisplaySize::new(50, 50);
        let mut surface = PixelSurface::new(size);
        let style = RenderStyle::default();

        AnnotationRenderer::default().render(&mut surface, &[sample_detection(size)]);
        // Box corner at (10,10), opposite corner at (30,30)
        assert_eq!(surface.pixel(10, 10), Some(style.box_color));
        assert_eq!(surface.pixel(30, 30), Some(style.box_color));
        // Landmark dot at (20,20)
        assert_eq!(surface.pixel(20, 20), Some(style.landmark_color));
    }

    #[test]
    fn detections_from_smaller_native_space_are_scaled_up() {
        // Native 50x50, surface 100x100: everything doubles.
        let mut surface = PixelSurface::new(DisplaySize::new(100, 100));
        let style = RenderStyle::default();

        AnnotationRenderer::default()
            .render(&mut surface, &[sample_detection(DisplaySize::new(50, 50))]);
        assert_eq!(surface.pixel(20, 20), Some(style.box_color));
        assert_eq!(surface.pixel(60, 60), Some(style.box_color));
        assert_eq!(surface.pixel(40, 40), Some(style.landmark_color));
    }

    #[test]
    fn render_clears_previous_tick_content() {
        let size = DisplaySize::new(50, 50);
        let mut surface = PixelSurface::new(size);
        let renderer = AnnotationRenderer::default();

        renderer.render(&mut surface, &[sample_detection(size)]);
        assert!(!surface.is_blank());

        // Next tick with a detection elsewhere: old pixels must be gone.
        let moved = Detection::new(Rect::new(35.0, 35.0, 10.0, 10.0), vec![], size);
        renderer.render(&mut surface, &[moved]);
        assert_eq!(surface.pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(
            surface.pixel(35, 35),
            Some(RenderStyle::default().box_color)
        );
    }
}
