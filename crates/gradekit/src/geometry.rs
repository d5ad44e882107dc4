//! Core geometry types for gradekit.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! Points are tiny values, so they derive `Copy`: passing one around
//! duplicates it on the stack instead of moving ownership.
//!
//! - `Debug` = print with `{:?}`
//! - `Clone` / `Copy` = cheap implicit duplication
//! - `PartialEq` = compare with `==`
//! - `Serialize` / `Deserialize` = read and write drawing files with serde

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2D point in the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A 3D point. Z carries the elevation; planar operations ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Anything with a position in the XY plane.
///
/// Lets the planar algorithms run over `Point`, `Point3` and
/// caller-defined point types without copying into a common type.
pub trait Planar {
    fn xy(&self) -> Point;
}

impl Planar for Point {
    #[inline]
    fn xy(&self) -> Point {
        *self
    }
}

impl Planar for Point3 {
    #[inline]
    fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Axis-aligned bounding box in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Rejected input geometry.
///
/// This is the validation error raised at the boundary, before any of the
/// computational functions see the data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon needs at least {required} vertices, got {found}")]
    TooFewVertices { required: usize, found: usize },
    #[error("vertex {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// An ordered vertex ring with an explicit closed flag.
///
/// Closure is logical: a closed polygon does not repeat its first vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Point3>,
    closed: bool,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Point3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in 3D.
    #[inline]
    pub fn distance(&self, other: Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Same XY position at a different elevation.
    #[inline]
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }
}

impl From<Point> for Point3 {
    fn from(p: Point) -> Self {
        Point3::new(p.x, p.y, 0.0)
    }
}

impl BoundingBox {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Polygon {
    /// Build a polygon, rejecting fewer than 2 vertices or non-finite coordinates.
    pub fn new(vertices: Vec<Point3>, closed: bool) -> Result<Self, GeometryError> {
        if vertices.len() < 2 {
            return Err(GeometryError::TooFewVertices {
                required: 2,
                found: vertices.len(),
            });
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite { index });
        }
        Ok(Self { vertices, closed })
    }

    /// Build a polygon from 2D vertices at a uniform elevation.
    pub fn from_planar(vertices: &[Point], elevation: f64, closed: bool) -> Result<Self, GeometryError> {
        Self::new(
            vertices.iter().map(|p| Point3::new(p.x, p.y, elevation)).collect(),
            closed,
        )
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_vertices(self) -> Vec<Point3> {
        self.vertices
    }

    /// Mark the polygon closed. A no-op when it already is.
    ///
    /// The first vertex is never duplicated at the end.
    pub fn close(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Edges as vertex pairs: (i, i+1), plus the last->first edge when closed.
    pub fn edges(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        let n = self.vertices.len();
        let count = if self.closed { n } else { n.saturating_sub(1) };
        (0..count).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        bounding_box(&self.vertices)
    }

    /// Signed area of the vertex ring (shoelace formula).
    ///
    /// Positive for counter-clockwise winding, negative for clockwise.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area_of_points(&self.vertices)
    }

    /// Unsigned area, the measure the offset resolver compares.
    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }
}

/// Get the bounding box of a point set.
///
/// ## Rust Lesson #6: Option<T>
///
/// An empty slice has no bounding box, so the result is `None` instead of
/// a box full of infinities.
pub fn bounding_box<P: Planar>(points: &[P]) -> Option<BoundingBox> {
    if points.is_empty() {
        return None;
    }

    let init = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    Some(points.iter().map(Planar::xy).fold(init, |b, p| BoundingBox {
        min_x: b.min_x.min(p.x),
        min_y: b.min_y.min(p.y),
        max_x: b.max_x.max(p.x),
        max_y: b.max_y.max(p.y),
    }))
}

/// Calculate signed area of a point sequence using the shoelace formula.
///
/// Returns:
/// - Positive value for counter-clockwise winding
/// - Negative value for clockwise winding
pub fn signed_area_of_points<P: Planar>(points: &[P]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let a = points[i].xy();
        let b = points[(i + 1) % n].xy();
        area += a.x * b.y;
        area -= b.x * a.y;
    }
    area / 2.0
}

// ============================================================================
// TESTS
// ============================================================================
