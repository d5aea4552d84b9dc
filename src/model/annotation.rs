//! Annotated polygons and the pixel-space annotation snapshot.

use serde::{Deserialize, Serialize};

use super::geometry::DrawingPoint;
use crate::color_utils::Color;
use crate::constants::polygon::MIN_VERTICES;

/// A closed polygon in drawing space together with its optional color tag.
///
/// The polygon and its tag live in one entity so removing a polygon can
/// never leave its color behind.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPolygon {
    /// Vertices in drawing space, in order. The ring is implicitly closed.
    pub points: Vec<DrawingPoint>,
    /// Color tag from seed data, `None` for user-drawn polygons.
    pub color: Option<Color>,
}

impl AnnotatedPolygon {
    pub fn new(points: Vec<DrawingPoint>, color: Option<Color>) -> Self {
        Self { points, color }
    }

    /// Check if the polygon has enough vertices to be a closed shape.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_VERTICES
    }

    /// Check if a point is inside the polygon (ray casting algorithm).
    pub fn contains(&self, point: &DrawingPoint) -> bool {
        contains_point(&self.points, point)
    }

    /// Index and distance of the vertex nearest to `point`.
    pub fn nearest_vertex(&self, point: &DrawingPoint) -> Option<(usize, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, v)| (i, v.distance_to(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Point-in-polygon test using ray casting.
pub fn contains_point(vertices: &[DrawingPoint], point: &DrawingPoint) -> bool {
    if vertices.len() < MIN_VERTICES {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = &vertices[i];
        let vj = &vertices[j];
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Pixel-space view of every polygon, emitted on each committed change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    /// Polygons as `[x, y]` pixel coordinates.
    pub polygons: Vec<Vec<[f64; 2]>>,
    /// One entry per polygon while color tracking is active, otherwise `None`.
    /// Entries are `None` for polygons drawn without a tag.
    pub colors: Option<Vec<Option<String>>>,
}

impl AnnotationSet {
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}
