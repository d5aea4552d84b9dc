//! Space-tagged points and the frames that relate the spaces.
//!
//! Three coordinate spaces are in play:
//! - **pixel**: raw image pixels, origin top-left, y down
//! - **display**: the image scaled to the on-screen width, origin top-left, y down
//! - **drawing**: the projected space the drawing layer works in, y up
//!
//! Each space has its own point type so a point can never be used in the
//! wrong space without going through [`crate::CoordinateMapper`].

use crate::error::{AnnotatorError, Result};

macro_rules! space_point {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            pub x: f64,
            pub y: f64,
        }

        impl $name {
            pub const fn new(x: f64, y: f64) -> Self {
                Self { x, y }
            }

            /// Euclidean distance to another point in the same space.
            pub fn distance_to(&self, other: &Self) -> f64 {
                let dx = self.x - other.x;
                let dy = self.y - other.y;
                (dx * dx + dy * dy).sqrt()
            }

            pub fn to_array(self) -> [f64; 2] {
                [self.x, self.y]
            }
        }

        impl From<[f64; 2]> for $name {
            fn from([x, y]: [f64; 2]) -> Self {
                Self::new(x, y)
            }
        }
    };
}

space_point!(
    /// A point in image pixel space.
    PixelPoint
);
space_point!(
    /// A point in scaled display space.
    DisplayPoint
);
space_point!(
    /// A point in projected drawing space.
    DrawingPoint
);

/// Pixel dimensions of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFrame {
    pixel_width: u32,
    pixel_height: u32,
}

impl ImageFrame {
    /// Create an image frame. Zero-area images are rejected.
    pub fn new(pixel_width: u32, pixel_height: u32) -> Result<Self> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(AnnotatorError::configuration(format!(
                "image has zero area ({}x{})",
                pixel_width, pixel_height
            )));
        }
        Ok(Self {
            pixel_width,
            pixel_height,
        })
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }
}

/// On-screen size of the image, aspect ratio preserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    width: f64,
    height: f64,
}

impl DisplayFrame {
    /// Fit the image to `target_width`, deriving the height from the aspect ratio.
    pub fn fit_width(image: &ImageFrame, target_width: f64) -> Result<Self> {
        if !target_width.is_finite() || target_width <= 0.0 {
            return Err(AnnotatorError::configuration(format!(
                "display width must be positive, got {}",
                target_width
            )));
        }
        let height =
            target_width * f64::from(image.pixel_height()) / f64::from(image.pixel_width());
        Ok(Self {
            width: target_width,
            height,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}
