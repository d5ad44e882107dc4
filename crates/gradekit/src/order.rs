//! Ordering points along a drawing's dominant direction.
//!
//! Survey points laid out along a road or a pad edge are numbered in the
//! direction the set is longest in: left to right for wide sets, bottom to
//! top otherwise.

use crate::geometry::{bounding_box, BoundingBox, Planar};

/// Axis used as the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAxis {
    X,
    Y,
}

impl SortAxis {
    /// Get axis name as string.
    pub fn name(&self) -> &'static str {
        match self {
            SortAxis::X => "x",
            SortAxis::Y => "y",
        }
    }
}

/// X when the box is strictly wider than tall, Y otherwise (ties included).
pub fn dominant_axis(bbox: &BoundingBox) -> SortAxis {
    if bbox.width() > bbox.height() {
        SortAxis::X
    } else {
        SortAxis::Y
    }
}

/// Stable sort of `points` ascending along the dominant axis of their
/// bounding box. Empty input gives empty output.
pub fn sort_along_dominant_axis<P: Planar + Clone>(points: &[P]) -> Vec<P> {
    let Some(bbox) = bounding_box(points) else {
        return Vec::new();
    };

    let axis = dominant_axis(&bbox);
    let key = |p: &P| match axis {
        SortAxis::X => p.xy().x,
        SortAxis::Y => p.xy().y,
    };

    let mut sorted = points.to_vec();
    // sort_by is stable: equal keys keep their input order.
    sorted.sort_by(|a, b| key(a).total_cmp(&key(b)));
    sorted
}
