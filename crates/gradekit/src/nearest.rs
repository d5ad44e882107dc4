//! Nearest annotation lookup.
//!
//! Points in a drawing are labelled by free-standing text placed close to
//! them. Given a point, the closest anchored text supplies its elevation.

use serde::{Deserialize, Serialize};

use crate::geometry::Point3;
use crate::text::{parse_elevation, Elevation};

/// An annotation that may or may not have a usable anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCandidate {
    pub anchor: Option<Point3>,
    pub text: String,
}

impl TextCandidate {
    pub fn new(anchor: Option<Point3>, text: impl Into<String>) -> Self {
        Self { anchor, text: text.into() }
    }

    /// The anchor, if present and finite.
    #[inline]
    fn valid_anchor(&self) -> Option<Point3> {
        self.anchor.filter(Point3::is_finite)
    }
}

/// Index of the candidate whose anchor is closest to `query` (3D distance).
///
/// Candidates without a valid anchor are skipped. On equal distances the
/// earlier candidate wins.
pub fn nearest_candidate(query: Point3, candidates: &[TextCandidate]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, candidate) in candidates.iter().enumerate() {
        let Some(anchor) = candidate.valid_anchor() else {
            tracing::trace!(index = i, "skipping text without anchor");
            continue;
        };

        let dist = query.distance(anchor);
        // Strict `<` keeps the first of equally distant candidates.
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }

    best.map(|(i, _)| i)
}

/// Elevation read from the annotation closest to `query`.
///
/// Returns [`Elevation::INVALID`] when no candidate has an anchor, or when
/// the closest text carries no number.
pub fn nearest_elevation(query: Point3, candidates: &[TextCandidate]) -> Elevation {
    match nearest_candidate(query, candidates) {
        Some(i) => parse_elevation(&candidates[i].text),
        None => Elevation::INVALID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64, z: f64, text: &str) -> TextCandidate {
        TextCandidate::new(Some(Point3::new(x, y, z)), text)
    }

    #[test]
    fn picks_closest() {
        let candidates = vec![at(10.0, 0.0, 0.0, "FG=1.0"), at(1.0, 1.0, 0.0, "FG=2.0"), at(-5.0, 0.0, 0.0, "FG=3.0")];
        let elev = nearest_elevation(Point3::new(0.0, 0.0, 0.0), &candidates);
        assert_eq!(elev, Elevation::new(2.0));
    }

    #[test]
    fn distance_is_three_dimensional() {
        // Same XY, but the second anchor is far away in Z.
        let candidates = vec![at(0.0, 0.0, 50.0, "A 1"), at(3.0, 0.0, 0.0, "B 2")];
        assert_eq!(nearest_candidate(Point3::new(0.0, 0.0, 0.0), &candidates), Some(1));
    }

    #[test]
    fn missing_anchor_skipped() {
        let candidates = vec![
            TextCandidate::new(None, "99.9"),
            TextCandidate::new(Some(Point3::new(f64::NAN, 0.0, 0.0)), "88.8"),
            at(100.0, 100.0, 0.0, "12,5"),
        ];
        assert_eq!(nearest_elevation(Point3::new(0.0, 0.0, 0.0), &candidates), Elevation::new(12.5));
    }

    #[test]
    fn no_anchors_is_invalid() {
        let candidates = vec![TextCandidate::new(None, "1.0"), TextCandidate::new(None, "2.0")];
        assert_eq!(nearest_elevation(Point3::new(0.0, 0.0, 0.0), &candidates), Elevation::INVALID);
        assert_eq!(nearest_elevation(Point3::new(0.0, 0.0, 0.0), &[]), Elevation::INVALID);
    }

    #[test]
    fn tie_goes_to_first() {
        let candidates = vec![at(1.0, 0.0, 0.0, "first 1"), at(-1.0, 0.0, 0.0, "second 2")];
        assert_eq!(nearest_elevation(Point3::new(0.0, 0.0, 0.0), &candidates), Elevation::new(1.0));
    }

    #[test]
    fn closest_text_without_number_is_invalid() {
        let candidates = vec![at(0.5, 0.0, 0.0, "N/A"), at(4.0, 0.0, 0.0, "7.5")];
        assert_eq!(nearest_elevation(Point3::new(0.0, 0.0, 0.0), &candidates), Elevation::INVALID);
    }
}
