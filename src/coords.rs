//! Coordinate transforms between pixel, display and drawing space.
//!
//! Pixel to display is a per-axis scale. Display to drawing is the
//! "unproject" of a simple planar projection at [`REFERENCE_ZOOM`]:
//!
//! ```text
//! drawing.x =  display.x / 2^REFERENCE_ZOOM
//! drawing.y = -display.y / 2^REFERENCE_ZOOM
//! ```
//!
//! Display y grows downward while drawing y grows upward, so the image
//! occupies `x in [0, w/2]`, `y in [-h/2, 0]` of drawing space at the
//! reference zoom. "Project" is the exact inverse.

use crate::constants::zoom::REFERENCE_ZOOM;
use crate::error::Result;
use crate::model::{DisplayFrame, DisplayPoint, DrawingPoint, ImageFrame, PixelPoint};

/// Immutable transform for one loaded image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    image: ImageFrame,
    display: DisplayFrame,
    scale_x: f64,
    scale_y: f64,
    projection_scale: f64,
}

impl CoordinateMapper {
    /// Build a mapper for an image shown in the given display frame.
    ///
    /// Both frames reject zero or non-finite sizes on construction, so the
    /// scale factors here are always finite and non-zero.
    pub fn new(image: ImageFrame, display: DisplayFrame) -> Self {
        Self {
            image,
            display,
            scale_x: display.width() / f64::from(image.pixel_width()),
            scale_y: display.height() / f64::from(image.pixel_height()),
            projection_scale: 2f64.powi(REFERENCE_ZOOM),
        }
    }

    /// Fit an image to `target_width` and build the mapper in one step.
    pub fn fit_width(image: ImageFrame, target_width: f64) -> Result<Self> {
        let display = DisplayFrame::fit_width(&image, target_width)?;
        Ok(Self::new(image, display))
    }

    pub fn image_frame(&self) -> ImageFrame {
        self.image
    }

    pub fn display_frame(&self) -> DisplayFrame {
        self.display
    }

    pub fn pixel_to_display(&self, p: PixelPoint) -> DisplayPoint {
        DisplayPoint::new(p.x * self.scale_x, p.y * self.scale_y)
    }

    pub fn display_to_pixel(&self, p: DisplayPoint) -> PixelPoint {
        PixelPoint::new(p.x / self.scale_x, p.y / self.scale_y)
    }

    /// Unproject a display point into drawing space.
    pub fn display_to_drawing(&self, p: DisplayPoint) -> DrawingPoint {
        DrawingPoint::new(p.x / self.projection_scale, -p.y / self.projection_scale)
    }

    /// Project a drawing point back into display space.
    pub fn drawing_to_display(&self, p: DrawingPoint) -> DisplayPoint {
        DisplayPoint::new(p.x * self.projection_scale, -p.y * self.projection_scale)
    }

    pub fn pixel_to_drawing(&self, p: PixelPoint) -> DrawingPoint {
        self.display_to_drawing(self.pixel_to_display(p))
    }

    pub fn drawing_to_pixel(&self, p: DrawingPoint) -> PixelPoint {
        self.display_to_pixel(self.drawing_to_display(p))
    }

    /// Convert a length in display pixels into drawing units.
    pub fn display_distance_to_drawing(&self, distance: f64) -> f64 {
        distance / self.projection_scale
    }

    /// Drawing-space corners of the image: (south-west, north-east).
    pub fn drawing_bounds(&self) -> (DrawingPoint, DrawingPoint) {
        let south_west = self.display_to_drawing(DisplayPoint::new(0.0, self.display.height()));
        let north_east = self.display_to_drawing(DisplayPoint::new(self.display.width(), 0.0));
        (south_west, north_east)
    }
}
