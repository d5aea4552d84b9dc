//! Outline construction for free-hand strokes.
//!
//! A stroke is a noisy cloud of pointer samples. It becomes a polygon by
//! taking a hull of the samples (convex, or concave for a tighter fit) and
//! optionally simplifying the result.

use serde::{Deserialize, Serialize};

use crate::model::DrawingPoint;

/// Which hull turns a stroke into a polygon outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HullAlgorithm {
    /// Tighter-fitting outline that follows inward bends of the stroke.
    #[default]
    Concave,
    /// Looser outline with no inward bends.
    Convex,
}

impl HullAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HullAlgorithm::Concave => "concave",
            HullAlgorithm::Convex => "convex",
        }
    }

    /// Build the hull of `points`. `concavity` only affects the concave hull.
    pub fn build(&self, points: &[DrawingPoint], concavity: f64) -> Vec<DrawingPoint> {
        match self {
            HullAlgorithm::Concave => concave_hull(points, concavity),
            HullAlgorithm::Convex => convex_hull(points),
        }
    }
}

/// Z component of `(a - o) x (b - o)`. Positive when `o -> a -> b` turns left.
fn cross(o: DrawingPoint, a: DrawingPoint, b: DrawingPoint) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn sorted_unique(points: &[DrawingPoint]) -> Vec<DrawingPoint> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    pts
}

/// Convex hull (Andrew's monotone chain), counter-clockwise, without
/// collinear vertices. Fewer than three distinct or only collinear input
/// points yield a degenerate result with fewer than three vertices.
pub fn convex_hull(points: &[DrawingPoint]) -> Vec<DrawingPoint> {
    let pts = sorted_unique(points);
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<DrawingPoint> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<DrawingPoint> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Concave hull by edge digging.
///
/// Starts from the convex hull and repeatedly splits any edge longer than
/// `concavity` times the bounding box diagonal with the inner point that
/// adds the smallest detour. Splits that would cross another hull edge or
/// use a point outside the current outline are rejected.
pub fn concave_hull(points: &[DrawingPoint], concavity: f64) -> Vec<DrawingPoint> {
    let mut hull = convex_hull(points);
    if hull.len() < 3 || concavity <= 0.0 || !concavity.is_finite() {
        return hull;
    }

    let threshold = concavity * bbox_diagonal(&hull);
    let mut inner: Vec<DrawingPoint> = sorted_unique(points)
        .into_iter()
        .filter(|p| !hull.contains(p))
        .collect();

    loop {
        let split = (0..hull.len()).find_map(|edge| {
            let a = hull[edge];
            let b = hull[(edge + 1) % hull.len()];
            let len = a.distance_to(&b);
            if len <= threshold {
                return None;
            }
            best_split(&hull, edge, &inner, len).map(|k| (edge, k))
        });

        match split {
            Some((edge, k)) => {
                let p = inner.swap_remove(k);
                hull.insert(edge + 1, p);
            }
            None => break,
        }
    }

    hull
}

/// Inner point index that splits `hull[edge]` with the smallest detour.
fn best_split(
    hull: &[DrawingPoint],
    edge: usize,
    inner: &[DrawingPoint],
    len: f64,
) -> Option<usize> {
    let a = hull[edge];
    let b = hull[(edge + 1) % hull.len()];

    let mut candidates: Vec<(usize, f64)> = inner
        .iter()
        .enumerate()
        .filter(|(_, p)| cross(a, b, **p) >= 0.0)
        .filter_map(|(k, p)| {
            let da = a.distance_to(p);
            let db = p.distance_to(&b);
            (da < len && db < len).then_some((k, da + db - len))
        })
        .collect();
    candidates.sort_by(|x, y| x.1.total_cmp(&y.1));

    candidates
        .into_iter()
        .map(|(k, _)| k)
        .find(|&k| {
            !crosses_hull(hull, edge, a, inner[k]) && !crosses_hull(hull, edge, inner[k], b)
        })
}

fn crosses_hull(
    hull: &[DrawingPoint],
    skip_edge: usize,
    p: DrawingPoint,
    q: DrawingPoint,
) -> bool {
    let n = hull.len();
    (0..n)
        .filter(|&j| j != skip_edge)
        .any(|j| segments_cross(p, q, hull[j], hull[(j + 1) % n]))
}

/// Proper crossing test; touching at an endpoint does not count.
fn segments_cross(
    p1: DrawingPoint,
    p2: DrawingPoint,
    q1: DrawingPoint,
    q2: DrawingPoint,
) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn bbox_diagonal(points: &[DrawingPoint]) -> f64 {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    ((max_x - min_x).powi(2) + (max_y - min_y).powi(2)).sqrt()
}

/// Ramer-Douglas-Peucker simplification. A tolerance of zero keeps every point.
pub fn simplify(points: &[DrawingPoint], tolerance: f64) -> Vec<DrawingPoint> {
    let n = points.len();
    if tolerance <= 0.0 || n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut stack = vec![(0, n - 1)];

    while let Some((start, end)) = stack.pop() {
        let mut max_distance = 0.0;
        let mut index = start;
        for i in start + 1..end {
            let d = perpendicular_distance(points[i], points[start], points[end]);
            if d > max_distance {
                max_distance = d;
                index = i;
            }
        }
        if max_distance > tolerance {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn perpendicular_distance(p: DrawingPoint, a: DrawingPoint, b: DrawingPoint) -> f64 {
    let len = a.distance_to(&b);
    if len == 0.0 {
        return p.distance_to(&a);
    }
    cross(a, b, p).abs() / len
}

/// Unsigned polygon area (shoelace formula).
pub fn polygon_area(points: &[DrawingPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}
