//! Interior angles at polyline vertices.

use std::fmt;

use serde::Serialize;

use crate::geometry::{GeometryError, Planar, Point3};

/// Vectors shorter than this are treated as degenerate.
const LENGTH_TOLERANCE: f64 = 1e-12;

/// What a vertex record carries.
///
/// ## Rust Lesson #10: Enums (Sum Types)
///
/// The first and last vertex have no angle, so the role is a tagged union
/// instead of an `f64` with magic values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "role", content = "degrees")]
pub enum VertexRole {
    Start,
    End,
    Angle(f64),
}

/// A polyline vertex with its role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VertexAngle {
    pub vertex: Point3,
    #[serde(flatten)]
    pub role: VertexRole,
}

impl fmt::Display for VertexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexRole::Start => write!(f, "start"),
            VertexRole::End => write!(f, "end"),
            VertexRole::Angle(deg) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, deg),
                None => write!(f, "{}", deg),
            },
        }
    }
}

/// Angle at `pivot` between the vectors pivot->prev and pivot->next, in degrees.
///
/// Computed in the XY plane. The arccosine goes through
/// `atan2(sqrt(1 - cos²), cos)` which stays accurate near ±1. When either
/// vector is shorter than 1e-12 the cosine is taken as 1.0 (angle 0°).
pub fn interior_angle_degrees<P: Planar>(prev: &P, pivot: &P, next: &P) -> f64 {
    let (a, o, b) = (prev.xy(), pivot.xy(), next.xy());
    let (ux, uy) = (a.x - o.x, a.y - o.y);
    let (vx, vy) = (b.x - o.x, b.y - o.y);

    let denom = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
    let cos = if denom <= LENGTH_TOLERANCE {
        1.0
    } else {
        // Rounding can push the ratio a hair past ±1.
        ((ux * vx + uy * vy) / denom).clamp(-1.0, 1.0)
    };

    (1.0 - cos * cos).sqrt().atan2(cos).to_degrees()
}

/// Tag every vertex of a polyline: first "start", last "end", and each
/// interior vertex with its interior angle.
///
/// A polyline needs at least 2 vertices.
pub fn vertices_with_angles(vertices: &[Point3]) -> Result<Vec<VertexAngle>, GeometryError> {
    let n = vertices.len();
    if n < 2 {
        return Err(GeometryError::TooFewVertices { required: 2, found: n });
    }

    let mut records = Vec::with_capacity(n);
    records.push(VertexAngle { vertex: vertices[0], role: VertexRole::Start });

    // .windows(3) gives each consecutive (prev, pivot, next) triplet.
    records.extend(vertices.windows(3).map(|w| VertexAngle {
        vertex: w[1],
        role: VertexRole::Angle(interior_angle_degrees(&w[0], &w[1], &w[2])),
    }));

    records.push(VertexAngle { vertex: vertices[n - 1], role: VertexRole::End });
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn collinear_is_straight() {
        let angle = interior_angle_degrees(&p(0.0, 0.0), &p(5.0, 0.0), &p(10.0, 0.0));
        assert_relative_eq!(angle, 180.0, epsilon = 1e-6);
    }

    #[test]
    fn right_angle_corner() {
        let angle = interior_angle_degrees(&p(0.0, 5.0), &p(0.0, 0.0), &p(5.0, 0.0));
        assert_relative_eq!(angle, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn sharp_and_obtuse() {
        let sharp = interior_angle_degrees(&p(1.0, 0.0), &p(0.0, 0.0), &p(1.0, 1.0));
        assert_relative_eq!(sharp, 45.0, epsilon = 1e-6);

        let obtuse = interior_angle_degrees(&p(1.0, 0.0), &p(0.0, 0.0), &p(-1.0, 1.0));
        assert_relative_eq!(obtuse, 135.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_length_vector_is_zero_degrees() {
        let angle = interior_angle_degrees(&p(2.0, 2.0), &p(2.0, 2.0), &p(7.0, 3.0));
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn elevation_is_ignored() {
        let angle = interior_angle_degrees(
            &Point3::new(0.0, 5.0, 100.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(5.0, 0.0, -40.0),
        );
        assert_relative_eq!(angle, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn two_vertices_only_start_and_end() {
        let records = vertices_with_angles(&[p(0.0, 0.0), p(1.0, 0.0)]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, VertexRole::Start);
        assert_eq!(records[1].role, VertexRole::End);
    }

    #[test]
    fn interior_vertices_get_angles() {
        let line = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(20.0, 10.0)];
        let records = vertices_with_angles(&line).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].vertex, line[0]);
        assert_eq!(records[3].vertex, line[3]);

        for record in &records[1..3] {
            match record.role {
                VertexRole::Angle(deg) => assert_relative_eq!(deg, 90.0, epsilon = 1e-6),
                other => panic!("expected an angle, got {:?}", other),
            }
        }
    }

    #[test]
    fn single_vertex_rejected() {
        assert!(matches!(
            vertices_with_angles(&[p(0.0, 0.0)]),
            Err(GeometryError::TooFewVertices { found: 1, .. })
        ));
    }

    #[test]
    fn role_display() {
        assert_eq!(format!("{}", VertexRole::Start), "start");
        assert_eq!(format!("{:.2}", VertexRole::Angle(90.0)), "90.00");
    }
}
