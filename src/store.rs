//! Ordered polygon storage.
//!
//! Polygons are identified by insertion index only. Removing index `i`
//! shifts every later polygon down by one, and its color tag goes with it
//! because both live in the same [`AnnotatedPolygon`].

use crate::color_utils::Color;
use crate::constants::polygon::MIN_VERTICES;
use crate::coords::CoordinateMapper;
use crate::error::{AnnotatorError, Result};
use crate::model::{AnnotatedPolygon, AnnotationSet, DrawingPoint, PixelPoint};

/// Storage for the polygons drawn on a single image.
#[derive(Debug, Clone, Default)]
pub struct PolygonStore {
    polygons: Vec<AnnotatedPolygon>,
    /// Whether the store was seeded with colors and still holds tagged polygons.
    tracking_colors: bool,
    /// Set by every mutation; cleared once the surface has restyled.
    dirty: bool,
}

impl PolygonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store has been modified since last `clear_dirty()`.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after restyling.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Replace the contents with pixel-space polygons.
    ///
    /// `colors` must be empty or hold exactly one color per polygon; a
    /// non-empty list turns on color tracking. Nothing is modified when the
    /// input is rejected.
    pub fn seed(
        &mut self,
        polygons: &[Vec<PixelPoint>],
        colors: &[Color],
        mapper: &CoordinateMapper,
    ) -> Result<()> {
        if !colors.is_empty() && colors.len() != polygons.len() {
            return Err(AnnotatorError::configuration(format!(
                "{} colors for {} polygons",
                colors.len(),
                polygons.len()
            )));
        }

        let seeded = polygons
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                let points = ring.iter().map(|p| mapper.pixel_to_drawing(*p)).collect();
                AnnotatedPolygon::new(points, colors.get(i).copied())
            })
            .collect();

        self.polygons = seeded;
        self.tracking_colors = !colors.is_empty();
        self.dirty = true;
        log::debug!(
            "Seeded {} polygons (color tracking: {})",
            self.polygons.len(),
            self.tracking_colors
        );
        Ok(())
    }

    /// Append an untagged polygon and return its index.
    pub fn insert(&mut self, points: Vec<DrawingPoint>) -> Result<usize> {
        let polygon = validated(AnnotatedPolygon::new(points, None))?;
        self.polygons.push(polygon);
        self.dirty = true;
        Ok(self.polygons.len() - 1)
    }

    /// Remove the polygon at `index` together with its color tag.
    ///
    /// Color tracking switches off once no tagged polygon remains.
    pub fn remove_at(&mut self, index: usize) -> Result<AnnotatedPolygon> {
        if index >= self.polygons.len() {
            return Err(AnnotatorError::out_of_range(index, self.polygons.len()));
        }
        let removed = self.polygons.remove(index);
        if self.tracking_colors && self.tagged_count() == 0 {
            log::debug!("Last color-tagged polygon removed, color tracking off");
            self.tracking_colors = false;
        }
        self.dirty = true;
        Ok(removed)
    }

    /// Replace the vertices of the polygon at `index`, keeping its color tag.
    pub fn replace_at(&mut self, index: usize, points: Vec<DrawingPoint>) -> Result<()> {
        let len = self.polygons.len();
        let polygon = self
            .polygons
            .get_mut(index)
            .ok_or_else(|| AnnotatorError::out_of_range(index, len))?;
        *polygon = validated(AnnotatedPolygon::new(points, polygon.color))?;
        self.dirty = true;
        Ok(())
    }

    /// Map every polygon back to pixel space.
    pub fn snapshot(&self, mapper: &CoordinateMapper) -> AnnotationSet {
        let polygons = self
            .polygons
            .iter()
            .map(|poly| {
                poly.points
                    .iter()
                    .map(|p| mapper.drawing_to_pixel(*p).to_array())
                    .collect()
            })
            .collect();

        let colors = self.tracking_colors.then(|| {
            self.polygons
                .iter()
                .map(|poly| poly.color.map(|c| c.to_string()))
                .collect()
        });

        AnnotationSet { polygons, colors }
    }

    /// Drop every polygon. Used when the image is swapped.
    pub fn clear(&mut self) {
        if !self.polygons.is_empty() {
            self.dirty = true;
        }
        self.polygons.clear();
        self.tracking_colors = false;
    }

    pub fn get(&self, index: usize) -> Option<&AnnotatedPolygon> {
        self.polygons.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedPolygon> {
        self.polygons.iter()
    }

    pub fn as_slice(&self) -> &[AnnotatedPolygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether snapshots carry a color list.
    pub fn is_tracking_colors(&self) -> bool {
        self.tracking_colors
    }

    /// Number of polygons that carry a color tag.
    pub fn tagged_count(&self) -> usize {
        self.polygons.iter().filter(|p| p.color.is_some()).count()
    }
}

fn validated(polygon: AnnotatedPolygon) -> Result<AnnotatedPolygon> {
    if !polygon.is_valid() {
        return Err(AnnotatorError::configuration(format!(
            "polygon needs at least {} vertices, got {}",
            MIN_VERTICES,
            polygon.points.len()
        )));
    }
    Ok(polygon)
}
