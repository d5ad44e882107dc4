//! Polygon offsetting and inside/outside disambiguation.
//!
//! Offsetting a ring by `+d` and `-d` gives two candidates, but which one
//! lies outside depends on the ring's winding. Rather than trusting the
//! winding of drawing data, the candidates are compared by area: the larger
//! one is the outside offset, the smaller one the inside offset.
//!
//! This holds for convex and mildly concave rings. Deeply concave rings can
//! fool it, and self-intersecting rings are rejected before offsetting.

use thiserror::Error;

use crate::geometry::{GeometryError, Point3, Polygon};
use crate::intersect::has_self_intersection;

/// Consecutive vertices closer than this are merged before offsetting.
const DUPLICATE_TOLERANCE: f64 = 1e-9;

/// Offset edges closer than this to parallel share the shifted vertex.
const PARALLEL_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OffsetError {
    #[error("offset distance must be non-zero")]
    ZeroDistance,
    #[error("polygon intersects itself")]
    SelfIntersecting,
    #[error("offset collapsed: {0}")]
    Degenerate(String),
    #[error("polygon cannot be offset: {0}")]
    Unprocessable(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Requested side of the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSide {
    Inside,
    Outside,
}

impl OffsetSide {
    /// Positive distances go outside, negative inside, zero has no side.
    pub fn from_distance(distance: f64) -> Option<OffsetSide> {
        if distance > 0.0 {
            Some(OffsetSide::Outside)
        } else if distance < 0.0 {
            Some(OffsetSide::Inside)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OffsetSide::Inside => "inside",
            OffsetSide::Outside => "outside",
        }
    }
}

/// Outcome of [`resolve`]: the candidate on the requested side and the one
/// the caller should discard.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetChoice<T = Polygon> {
    pub side: OffsetSide,
    pub chosen: T,
    pub rejected: T,
}

/// Pick the candidate on `side` by comparing areas.
///
/// Outside takes the larger area, inside the smaller. Equal areas keep
/// `plus`.
pub fn resolve<T, F>(side: OffsetSide, plus: T, minus: T, area_of: F) -> OffsetChoice<T>
where
    F: Fn(&T) -> f64,
{
    let (plus_area, minus_area) = (area_of(&plus), area_of(&minus));
    let take_plus = match side {
        OffsetSide::Outside => plus_area >= minus_area,
        OffsetSide::Inside => plus_area <= minus_area,
    };

    tracing::debug!(side = side.name(), plus_area, minus_area, take_plus, "resolved offset side");

    if take_plus {
        OffsetChoice { side, chosen: plus, rejected: minus }
    } else {
        OffsetChoice { side, chosen: minus, rejected: plus }
    }
}

/// Miter offset of a closed ring by `distance` along each edge's left normal.
///
/// Positive distances move counter-clockwise rings inwards and clockwise
/// rings outwards. Each output vertex is the intersection of the two offset
/// edges meeting there; collinear neighbours reuse the shifted vertex. Z is
/// carried over from the source vertex.
pub fn offset_polygon(polygon: &Polygon, distance: f64) -> Result<Polygon, OffsetError> {
    let ring = dedup_ring(polygon.vertices());
    let n = ring.len();
    if n < 3 {
        return Err(OffsetError::Degenerate(format!("{} distinct vertices", n)));
    }

    // Phase A: shift every edge along its normal.
    let mut lines = Vec::with_capacity(n);
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len = (dx * dx + dy * dy).sqrt();
        let (ux, uy) = (dx / len, dy / len);
        let (nx, ny) = (-uy, ux);
        lines.push(((a.x + nx * distance, a.y + ny * distance), (ux, uy), (nx, ny)));
    }

    // Phase B: each vertex joins the previous offset edge and its own.
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let ((px, py), (pdx, pdy), _) = lines[(i + n - 1) % n];
        let ((qx, qy), (qdx, qdy), (nx, ny)) = lines[i];

        let cross = pdx * qdy - pdy * qdx;
        let (x, y) = if cross.abs() < PARALLEL_TOLERANCE {
            (ring[i].x + nx * distance, ring[i].y + ny * distance)
        } else {
            let s = ((qx - px) * qdy - (qy - py) * qdx) / cross;
            (px + s * pdx, py + s * pdy)
        };

        let vertex = Point3::new(x, y, ring[i].z);
        if !vertex.is_finite() {
            return Err(OffsetError::Degenerate(format!("vertex {} is not finite", i)));
        }
        out.push(vertex);
    }

    Ok(Polygon::new(out, true)?)
}

/// Offset a polygon to the side given by the sign of `distance`.
///
/// The polygon is closed first and must not intersect itself. Both
/// candidates are computed with `±|distance|`; if either fails the polygon
/// is unprocessable and no choice is made.
pub fn offset_to_side(polygon: &Polygon, distance: f64) -> Result<OffsetChoice, OffsetError> {
    let side = OffsetSide::from_distance(distance).ok_or(OffsetError::ZeroDistance)?;

    let closed = polygon.clone().close();
    if has_self_intersection(&closed) {
        return Err(OffsetError::SelfIntersecting);
    }

    let magnitude = distance.abs();
    match (offset_polygon(&closed, magnitude), offset_polygon(&closed, -magnitude)) {
        (Ok(plus), Ok(minus)) => Ok(resolve(side, plus, minus, Polygon::area)),
        (Err(e), _) | (_, Err(e)) => Err(OffsetError::Unprocessable(e.to_string())),
    }
}

/// Drop consecutive duplicates, including a last vertex repeating the first.
fn dedup_ring(vertices: &[Point3]) -> Vec<Point3> {
    let same = |a: &Point3, b: &Point3| {
        (a.x - b.x).abs() < DUPLICATE_TOLERANCE && (a.y - b.y).abs() < DUPLICATE_TOLERANCE
    };

    let mut ring = vertices.to_vec();
    ring.dedup_by(|a, b| same(a, b));
    while ring.len() > 1 && same(&ring[0], &ring[ring.len() - 1]) {
        ring.pop();
    }
    ring
}
