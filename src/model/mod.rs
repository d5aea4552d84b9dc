//! Data models for the annotation engine.

mod annotation;
mod geometry;

pub use annotation::{AnnotatedPolygon, AnnotationSet, contains_point};
pub use geometry::{DisplayFrame, DisplayPoint, DrawingPoint, ImageFrame, PixelPoint};
