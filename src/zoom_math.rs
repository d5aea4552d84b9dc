//! Pan/zoom view over the display frame.
//!
//! This module contains the mathematical functions for zoom operations,
//! extracted for testability and reusability. The view maps display space
//! to screen space as `screen = display * zoom + pan`.

use crate::constants::zoom::{MAX, MIN};
use crate::model::{DisplayFrame, DisplayPoint};

/// Represents pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl ViewTransform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Map a screen position (relative to the canvas origin) into display space.
    pub fn screen_to_display(&self, x: f64, y: f64) -> DisplayPoint {
        DisplayPoint::new((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// Calculate zoom-to-cursor transformation.
    ///
    /// This keeps the display point under the cursor fixed while zooming.
    /// The new zoom is clamped to the allowed range.
    pub fn zoom_to_cursor(&self, new_zoom: f64, cursor_x: f64, cursor_y: f64) -> ViewTransform {
        let new_zoom = new_zoom.clamp(MIN, MAX);

        // Display-space point under cursor (before zoom)
        let under = self.screen_to_display(cursor_x, cursor_y);

        // Calculate new pan to keep that point under cursor
        ViewTransform {
            zoom: new_zoom,
            pan_x: cursor_x - under.x * new_zoom,
            pan_y: cursor_y - under.y * new_zoom,
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> ViewTransform {
        ViewTransform {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }

    /// Limit the pan so the image always covers a canvas of the frame's size.
    pub fn clamp_to(&self, frame: &DisplayFrame) -> ViewTransform {
        let min_x = frame.width() - frame.width() * self.zoom;
        let min_y = frame.height() - frame.height() * self.zoom;
        ViewTransform {
            zoom: self.zoom,
            pan_x: self.pan_x.clamp(min_x.min(0.0), 0.0),
            pan_y: self.pan_y.clamp(min_y.min(0.0), 0.0),
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
