//! Constants shared across the annotation engine.
//!
//! Values that tune the geometry, gestures and styling live here so the
//! modules using them stay free of magic numbers.

/// Projection and view zoom constants.
pub mod zoom {
    /// Zoom level used for every project/unproject between display and
    /// drawing space. Drawing coordinates are display coordinates divided
    /// by `2^REFERENCE_ZOOM`, with the y axis flipped.
    pub const REFERENCE_ZOOM: i32 = 1;
    /// Minimum interactive view zoom (the image exactly fills the canvas).
    pub const MIN: f64 = 1.0;
    /// Maximum interactive view zoom.
    pub const MAX: f64 = 8.0;
    /// Multiplicative step for a single wheel notch.
    pub const FACTOR: f64 = 1.2;
}

/// Pointer gesture thresholds, all in display pixels.
pub mod gesture {
    /// A press/release pair that moves less than this is a click.
    pub const CLICK_TOLERANCE: f64 = 3.0;
    /// Radius around a vertex that grabs it in edit mode.
    pub const HANDLE_HIT_RADIUS: f64 = 8.0;
}

/// Polygon validity.
pub mod polygon {
    /// Minimum number of vertices for a closed polygon.
    pub const MIN_VERTICES: usize = 3;
}

/// Styling constants.
pub mod style {
    /// Base hue of the `bright` palette.
    pub const BRIGHT_RGB: (u8, u8, u8) = (240, 30, 110);
    /// Base hue of the `white` palette.
    pub const WHITE_RGB: (u8, u8, u8) = (255, 255, 255);
    /// Lightness multiplier for one "brighter" step (HSL).
    pub const BRIGHTER_BASE: f64 = 1.0 / 0.7;
    /// Number of brighter steps applied to a stroke color to get its fill.
    pub const BRIGHTER_EXPONENT: f64 = 1.2;
    /// Opacity of polygon fills in the canvas preview.
    pub const FILL_ALPHA: u8 = 96;
    /// Stroke width in the canvas preview, in display pixels.
    pub const STROKE_WIDTH: f32 = 2.0;
}

/// Hull construction defaults.
pub mod hull {
    /// Edges longer than this fraction of the point cloud's bounding box
    /// diagonal are split by the concave hull.
    pub const DEFAULT_CONCAVITY: f64 = 0.1;
}

/// Default target width of the display frame, in pixels.
pub const DEFAULT_DISPLAY_WIDTH: f64 = 600.0;
