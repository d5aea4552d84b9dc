//! Parsing of initial annotation data.
//!
//! Two input shapes are understood:
//!
//! ```json
//! { "type": "FeatureCollection",
//!   "features": [ { "type": "Feature",
//!                   "geometry": { "type": "Polygon", "coordinates": [[[x, y], ...]] } } ] }
//! ```
//!
//! ```json
//! { "coordinates": [ [[x, y], ...], ... ] }
//! ```
//!
//! Either may carry a `color` field (CSS strings or `[r, g, b]` triples) or
//! a `label` field (integers mapped to a categorical palette). Coordinates
//! are image pixels.

use serde_json::Value;

use crate::color_utils::{Color, categorical};
use crate::constants::polygon::MIN_VERTICES;
use crate::error::{AnnotatorError, Result};
use crate::model::PixelPoint;

/// Seed polygons with their resolved per-polygon colors.
///
/// `colors` is either empty or exactly as long as `polygons`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedData {
    polygons: Vec<Vec<PixelPoint>>,
    colors: Vec<Color>,
}

impl SeedData {
    /// Build seed data from polygons and zero, one (broadcast) or one-per-polygon colors.
    pub fn new(polygons: Vec<Vec<PixelPoint>>, colors: Vec<Color>) -> Result<Self> {
        for (i, ring) in polygons.iter().enumerate() {
            if ring.len() < MIN_VERTICES {
                return Err(AnnotatorError::unsupported_input(format!(
                    "polygon {} has {} points, need at least {}",
                    i,
                    ring.len(),
                    MIN_VERTICES
                )));
            }
        }
        let colors = resolve_colors(colors, polygons.len())?;
        Ok(Self { polygons, colors })
    }

    /// Parse seed data from JSON.
    ///
    /// `null` and `{}` yield empty seed data. When `generate_missing_colors`
    /// is set and the input carries no colors, every polygon gets a
    /// categorical color.
    pub fn from_json(value: &Value, generate_missing_colors: bool) -> Result<Self> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) if map.is_empty() => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(AnnotatorError::unsupported_input(format!(
                    "expected an object, got {}",
                    json_kind(other)
                )));
            }
        };

        let polygons = if is_feature_collection(value) {
            feature_collection_rings(value)?
        } else if let Some(coordinates) = object.get("coordinates") {
            let rings = coordinates.as_array().ok_or_else(|| {
                AnnotatorError::unsupported_input("'coordinates' must be an array of polygons")
            })?;
            rings.iter().map(parse_ring).collect::<Result<Vec<_>>>()?
        } else {
            return Err(AnnotatorError::unsupported_input("Input data not understood"));
        };

        let mut colors = colors_from_json(value)?;
        if colors.is_empty() && generate_missing_colors {
            colors = (0..polygons.len()).map(categorical).collect();
        }

        log::debug!(
            "Parsed seed data: {} polygons, {} colors",
            polygons.len(),
            colors.len()
        );
        Self::new(polygons, colors)
    }

    pub fn polygons(&self) -> &[Vec<PixelPoint>] {
        &self.polygons
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Apply the 0 / 1 / N color count rule.
fn resolve_colors(colors: Vec<Color>, polygon_count: usize) -> Result<Vec<Color>> {
    match colors.len() {
        0 => Ok(colors),
        1 => Ok(vec![colors[0]; polygon_count]),
        n if n == polygon_count => Ok(colors),
        n => Err(AnnotatorError::configuration(format!(
            "{} colors for {} polygons (expected 0, 1 or {})",
            n, polygon_count, polygon_count
        ))),
    }
}

fn is_feature_collection(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("FeatureCollection")
        && value.get("features").is_some_and(Value::is_array)
}

/// Outer rings of every polygon feature. Other geometries are skipped.
fn feature_collection_rings(value: &Value) -> Result<Vec<Vec<PixelPoint>>> {
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut rings = Vec::new();
    for feature in features {
        if feature.get("type").and_then(Value::as_str) != Some("Feature") {
            log::debug!("Skipping non-feature entry in feature collection");
            continue;
        }
        let Some(geometry) = feature.get("geometry") else {
            continue;
        };
        if geometry.get("type").and_then(Value::as_str) != Some("Polygon") {
            continue;
        }
        let outer = geometry
            .get("coordinates")
            .and_then(Value::as_array)
            .and_then(|rings| rings.first())
            .ok_or_else(|| AnnotatorError::unsupported_input("polygon feature without rings"))?;
        rings.push(parse_ring(outer)?);
    }
    Ok(rings)
}

fn parse_ring(value: &Value) -> Result<Vec<PixelPoint>> {
    let points = value
        .as_array()
        .ok_or_else(|| AnnotatorError::unsupported_input("polygon must be an array of points"))?;
    points.iter().map(parse_point).collect()
}

fn parse_point(value: &Value) -> Result<PixelPoint> {
    let coords = value.as_array().filter(|c| c.len() >= 2);
    let xy = coords.and_then(|c| Some((c[0].as_f64()?, c[1].as_f64()?)));
    match xy {
        Some((x, y)) => Ok(PixelPoint::new(x, y)),
        None => Err(AnnotatorError::unsupported_input(format!(
            "invalid point {}",
            value
        ))),
    }
}

/// Colors from the `color` field, or from `label` when `color` is absent.
fn colors_from_json(value: &Value) -> Result<Vec<Color>> {
    if let Some(color) = value.get("color") {
        return match color {
            Value::String(css) => Ok(vec![Color::parse(css)?]),
            Value::Array(items) if items.first().is_some_and(Value::is_number) => {
                Ok(vec![parse_color(color)?])
            }
            Value::Array(items) => items.iter().map(parse_color).collect(),
            other => Err(AnnotatorError::unsupported_input(format!(
                "'color' must be a string or array, got {}",
                json_kind(other)
            ))),
        };
    }

    if let Some(labels) = value.get("label") {
        let labels = labels
            .as_array()
            .ok_or_else(|| AnnotatorError::unsupported_input("'label' must be an array"))?;
        return labels
            .iter()
            .map(|label| {
                label
                    .as_u64()
                    .map(|l| categorical(l as usize))
                    .ok_or_else(|| {
                        AnnotatorError::unsupported_input(format!("invalid label {}", label))
                    })
            })
            .collect();
    }

    Ok(Vec::new())
}

fn parse_color(value: &Value) -> Result<Color> {
    match value {
        Value::String(css) => Color::parse(css),
        Value::Array(channels) if channels.len() == 3 => {
            let channel = |v: &Value| v.as_f64().filter(|c| (0.0..=255.0).contains(c));
            match (channel(&channels[0]), channel(&channels[1]), channel(&channels[2])) {
                (Some(r), Some(g), Some(b)) => {
                    Ok(Color::rgb(r.round() as u8, g.round() as u8, b.round() as u8))
                }
                _ => Err(AnnotatorError::unsupported_input(format!(
                    "invalid color {}",
                    value
                ))),
            }
        }
        other => Err(AnnotatorError::unsupported_input(format!(
            "invalid color {}",
            other
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
