//! Point-in-polygon and segment intersection tests.
//!
//! Both run over `&[P]` slices so they work on polygon vertices, entity
//! vertex lists and test fixtures alike.

use crate::geometry::{Planar, Point, Polygon};

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================

/// Test if a point is inside a vertex ring using even-odd ray casting.
///
/// Casts a ray towards +X and counts edge crossings; odd = inside. Edges
/// always wrap from the last vertex back to the first. An edge crosses when
/// one endpoint lies strictly above the ray and the other on or below it,
/// which also keeps horizontal and zero-length edges out of the division.
pub fn point_in_polygon<P: Planar, Q: Planar>(ring: &[P], point: &Q) -> bool {
    let n = ring.len();
    if n < 2 {
        return false;
    }

    let p = point.xy();
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let a = ring[i].xy();
        let b = ring[j].xy();

        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if x_cross >= p.x {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}

// ============================================================================
// LINE-LINE INTERSECTION
// ============================================================================

/// Result of a segment-segment intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    None,
    /// Crossing strictly inside both segments; `t` and `u` are the
    /// interpolation parameters along the first and second segment.
    Point { x: f64, y: f64, t: f64, u: f64 },
}

/// Find the interior crossing of segments `a1-a2` and `b1-b2`.
///
/// Only crossings with both parameters strictly inside (0, 1) count, so
/// segments that merely touch at an endpoint do not intersect. Parallel
/// segments (zero denominator), including zero-length ones, never do.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Intersection {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 {
        return Intersection::None;
    }

    let t = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let u = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;

    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Intersection::Point {
            x: a1.x + t * (a2.x - a1.x),
            y: a1.y + t * (a2.y - a1.y),
            t,
            u,
        }
    } else {
        Intersection::None
    }
}

/// Check whether any two non-adjacent edges of the ring cross.
///
/// The ring is treated as closed (edge n-1 wraps to vertex 0), so the first
/// and last edges count as adjacent. Returns on the first crossing found.
pub fn ring_has_self_intersection<P: Planar>(ring: &[P]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }

    let edge = |i: usize| (ring[i].xy(), ring[(i + 1) % n].xy());

    for i in 0..n {
        let (a1, a2) = edge(i);
        // j starts two edges ahead; i + 1 is adjacent.
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = edge(j);
            if let Intersection::Point { .. } = segment_intersection(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    false
}

/// Self-intersection test on a polygon's vertex ring.
#[inline]
pub fn has_self_intersection(polygon: &Polygon) -> bool {
    ring_has_self_intersection(polygon.vertices())
}

// ============================================================================
// TESTS
// ============================================================================
