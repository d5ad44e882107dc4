//! Drawing-level commands.
//!
//! Each workflow reads what it needs through [`Drawing`], runs one of the
//! geometry or text components over it, and reports the outcome. Entities
//! that cannot be processed are moved to the failure layer named in
//! [`Settings`] so they are easy to find in the drawing afterwards.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::angles::{vertices_with_angles, VertexAngle};
use crate::config::Settings;
use crate::drawing::{Drawing, DrawingError, EntityKind};
use crate::export::{segments_from_polylines, write_geojson, ExportError};
use crate::geometry::{Planar, Point, Point3, Polygon};
use crate::intersect::{has_self_intersection, point_in_polygon};
use crate::nearest::{nearest_elevation, TextCandidate};
use crate::offset::{offset_to_side, OffsetError, OffsetSide};
use crate::order::sort_along_dominant_axis;
use crate::text::{parse_elevation, Elevation};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Drawing(#[from] DrawingError),
    #[error(transparent)]
    Offset(#[from] OffsetError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// An entity a workflow gave up on, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    pub id: String,
    pub reason: String,
}

// ============================================================================
// ELEVATION LABELS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledPoint {
    pub id: String,
    pub position: Point3,
    pub elevation: Elevation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelReport {
    pub processed: Vec<LabelledPoint>,
    pub failed: Vec<String>,
}

/// Give every point entity the elevation of its nearest label.
///
/// Points whose nearest label holds no number (or that have no anchored
/// label at all) go to `layers.elevation_failed`.
pub fn label_points<D: Drawing>(drawing: &mut D, settings: &Settings) -> Result<LabelReport, WorkflowError> {
    let candidates: Vec<TextCandidate> = drawing
        .entities()
        .iter()
        .filter_map(|e| e.text_candidate())
        .collect();
    let points: Vec<(String, Point3)> = drawing
        .entities()
        .iter()
        .filter_map(|e| e.position().map(|p| (e.id.clone(), p)))
        .collect();

    let mut report = LabelReport::default();
    for (id, position) in points {
        let elevation = nearest_elevation(position, &candidates);
        if elevation.is_valid() {
            report.processed.push(LabelledPoint { id, position, elevation });
        } else {
            tracing::warn!(id = %id, layer = %settings.layers.elevation_failed, "no elevation near point");
            drawing.assign_layer(&id, &settings.layers.elevation_failed)?;
            report.failed.push(id);
        }
    }

    tracing::info!(processed = report.processed.len(), failed = report.failed.len(), "labelled points");
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsideText {
    pub id: String,
    pub text: String,
    pub elevation: Elevation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonLabels {
    pub id: String,
    pub texts: Vec<InsideText>,
}

/// For each closed polyline, the labels anchored inside it.
pub fn elevations_in_polygons<D: Drawing>(drawing: &D) -> Vec<PolygonLabels> {
    let entities = drawing.entities();
    let texts: Vec<(&str, TextCandidate)> = entities
        .iter()
        .filter_map(|e| e.text_candidate().map(|c| (e.id.as_str(), c)))
        .collect();

    entities
        .iter()
        .filter(|e| matches!(e.kind, EntityKind::Polyline { closed: true, .. }))
        .filter_map(|e| e.vertices().map(|v| (e.id.clone(), v)))
        .map(|(id, ring)| {
            let inside = texts
                .iter()
                .filter(|(_, c)| c.anchor.is_some_and(|a| point_in_polygon(&ring, &a)))
                .map(|(text_id, c)| InsideText {
                    id: text_id.to_string(),
                    text: c.text.clone(),
                    elevation: parse_elevation(&c.text),
                })
                .collect();
            PolygonLabels { id, texts: inside }
        })
        .collect()
}

// ============================================================================
// POLYGON CHECKS AND OFFSETS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckReport {
    /// Closed, simple polygons
    pub clean: Vec<String>,
    /// Open polylines that were closed logically before checking
    pub closed: Vec<String>,
    pub self_intersecting: Vec<String>,
    /// Polylines that are not valid polygons at all
    pub invalid: Vec<Rejected>,
}

/// Every polyline entity as a closed polygon, or the reason it isn't one.
fn closed_polygons<D: Drawing>(drawing: &D) -> Vec<(String, bool, Result<Polygon, String>)> {
    drawing
        .entities()
        .iter()
        .filter_map(|e| {
            e.polygon().map(|p| {
                let was_open = p.as_ref().is_ok_and(|p| !p.is_closed());
                (e.id.clone(), was_open, p.map(Polygon::close).map_err(|err| err.to_string()))
            })
        })
        .collect()
}

/// Close every polyline and sort out the self-intersecting ones.
///
/// Self-intersecting polygons go to `layers.self_intersecting`.
pub fn check_polygons<D: Drawing>(drawing: &mut D, settings: &Settings) -> Result<CheckReport, WorkflowError> {
    let mut report = CheckReport::default();

    for (id, was_open, polygon) in closed_polygons(drawing) {
        match polygon {
            Err(reason) => {
                tracing::warn!(id = %id, %reason, "skipping invalid polyline");
                report.invalid.push(Rejected { id, reason });
            }
            Ok(polygon) => {
                if was_open {
                    tracing::debug!(id = %id, "closed open polyline");
                    report.closed.push(id.clone());
                }
                if has_self_intersection(&polygon) {
                    tracing::warn!(id = %id, layer = %settings.layers.self_intersecting, "polygon intersects itself");
                    drawing.assign_layer(&id, &settings.layers.self_intersecting)?;
                    report.self_intersecting.push(id);
                } else {
                    report.clean.push(id);
                }
            }
        }
    }

    tracing::info!(
        clean = report.clean.len(),
        self_intersecting = report.self_intersecting.len(),
        invalid = report.invalid.len(),
        "checked polygons"
    );
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetPolygon {
    pub id: String,
    pub area: f64,
    pub polygon: Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetReport {
    pub side: &'static str,
    pub distance: f64,
    pub offsets: Vec<OffsetPolygon>,
    pub failed: Vec<Rejected>,
}

/// Offset every polyline to the side given by the sign of `distance`.
///
/// Self-intersecting polygons go to `layers.self_intersecting`, polygons
/// without a valid offset to `layers.offset_failed`.
pub fn offset_polygons<D: Drawing>(
    drawing: &mut D,
    distance: f64,
    settings: &Settings,
) -> Result<OffsetReport, WorkflowError> {
    let side = OffsetSide::from_distance(distance).ok_or(OffsetError::ZeroDistance)?;

    let mut report = OffsetReport {
        side: side.name(),
        distance,
        offsets: Vec::new(),
        failed: Vec::new(),
    };

    for (id, _, polygon) in closed_polygons(drawing) {
        let polygon = match polygon {
            Ok(p) => p,
            Err(reason) => {
                report.failed.push(Rejected { id, reason });
                continue;
            }
        };

        match offset_to_side(&polygon, distance) {
            Ok(choice) => report.offsets.push(OffsetPolygon {
                id,
                area: choice.chosen.area(),
                polygon: choice.chosen,
            }),
            Err(err) => {
                let layer = match err {
                    OffsetError::SelfIntersecting => &settings.layers.self_intersecting,
                    _ => &settings.layers.offset_failed,
                };
                tracing::warn!(id = %id, %layer, error = %err, "polygon not offset");
                drawing.assign_layer(&id, layer)?;
                report.failed.push(Rejected { id, reason: err.to_string() });
            }
        }
    }

    tracing::info!(side = side.name(), offset = report.offsets.len(), failed = report.failed.len(), "offset polygons");
    Ok(report)
}

// ============================================================================
// ANGLES, SEQUENCES, EXPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolylineAngles {
    pub id: String,
    pub vertices: Vec<VertexAngle>,
}

/// Vertex angle records for every polyline with at least 2 vertices.
pub fn polyline_angles<D: Drawing>(drawing: &D) -> Vec<PolylineAngles> {
    drawing
        .entities()
        .iter()
        .filter_map(|e| e.vertices().map(|v| (e.id.clone(), v)))
        .filter_map(|(id, vertices)| match vertices_with_angles(&vertices) {
            Ok(records) => Some(PolylineAngles { id, vertices: records }),
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "skipping polyline");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencedPoint {
    /// 1-based position in the sequence
    pub number: usize,
    pub id: String,
    pub position: Point3,
}

#[derive(Clone)]
struct IdPoint(String, Point3);

impl Planar for IdPoint {
    fn xy(&self) -> Point {
        self.1.xy()
    }
}

/// Point entities numbered along the dominant axis of their extent.
pub fn sequence_points<D: Drawing>(drawing: &D) -> Vec<SequencedPoint> {
    let points: Vec<IdPoint> = drawing
        .entities()
        .iter()
        .filter_map(|e| e.position().map(|p| IdPoint(e.id.clone(), p)))
        .collect();

    sort_along_dominant_axis(&points)
        .into_iter()
        .enumerate()
        .map(|(i, IdPoint(id, position))| SequencedPoint { number: i + 1, id, position })
        .collect()
}

/// Export every polyline, in drawing order, as slope segments.
///
/// Returns the number of segments written.
pub fn export_slopes<D: Drawing>(
    drawing: &D,
    path: impl AsRef<Path>,
    settings: &Settings,
) -> Result<usize, WorkflowError> {
    let polylines: Vec<Vec<Point3>> = drawing
        .entities()
        .iter()
        .filter_map(|e| e.vertices())
        .collect();

    let segments = segments_from_polylines(&polylines);
    write_geojson(path, &segments, &settings.export_config())?;
    Ok(segments.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Entity, MemoryDrawing};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn square(id: &str, x: f64, y: f64, size: f64) -> Entity {
        Entity::polyline(
            id,
            vec![p(x, y), p(x + size, y), p(x + size, y + size), p(x, y + size)],
            true,
        )
    }

    fn site() -> MemoryDrawing {
        MemoryDrawing::new(vec![
            square("pad-a", 0.0, 0.0, 10.0),
            Entity::polyline("bow", vec![p(20.0, 0.0), p(30.0, 10.0), p(30.0, 0.0), p(20.0, 10.0)], true),
            Entity::polyline("edge", vec![p(40.0, 0.0), p(50.0, 0.0), p(50.0, 10.0)], false),
            Entity::text("t-a", "FG=12.5", Some(p(5.0, 5.0))),
            Entity::text("t-b", "TOP 14,75", Some(p(45.0, 4.0))),
            Entity::text("t-c", "see note", Some(p(100.0, 100.0))),
            Entity::point("p1", p(4.0, 4.0)),
            Entity::point("p2", p(46.0, 3.0)),
            Entity::point("p3", p(101.0, 99.0)),
        ])
        .unwrap()
    }

    #[test]
    fn label_points_buckets() {
        let mut drawing = site();
        let report = label_points(&mut drawing, &Settings::default()).unwrap();

        let ids: Vec<&str> = report.processed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(report.processed[0].elevation, Elevation::new(12.5));
        assert_eq!(report.processed[1].elevation, Elevation::new(14.75));
        assert_eq!(report.failed, vec!["p3"]);
        assert_eq!(drawing.on_layer("ELEV_FAILED"), vec!["p3"]);
    }

    #[test]
    fn labels_inside_closed_polygons() {
        let labels = elevations_in_polygons(&site());
        // Only closed polylines are considered.
        let ids: Vec<&str> = labels.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["pad-a", "bow"]);

        assert_eq!(labels[0].texts.len(), 1);
        assert_eq!(labels[0].texts[0].id, "t-a");
        assert_eq!(labels[0].texts[0].elevation, Elevation::new(12.5));
    }

    #[test]
    fn check_tags_self_intersecting() {
        let mut drawing = site();
        let report = check_polygons(&mut drawing, &Settings::default()).unwrap();
        assert_eq!(report.clean, vec!["pad-a", "edge"]);
        assert_eq!(report.closed, vec!["edge"]);
        assert_eq!(report.self_intersecting, vec!["bow"]);
        assert_eq!(drawing.on_layer("SELF_INTERSECTING"), vec!["bow"]);
    }

    #[test]
    fn check_reports_invalid_polyline() {
        let mut drawing = MemoryDrawing::new(vec![Entity::polyline("dot", vec![p(0.0, 0.0)], false)]).unwrap();
        let report = check_polygons(&mut drawing, &Settings::default()).unwrap();
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].id, "dot");
    }

    #[test]
    fn offset_outside_and_failures() {
        let mut drawing = site();
        let report = offset_polygons(&mut drawing, 1.0, &Settings::default()).unwrap();
        assert_eq!(report.side, "outside");

        let pad = report.offsets.iter().find(|o| o.id == "pad-a").unwrap();
        assert!((pad.area - 144.0).abs() < 1e-9);

        assert!(report.failed.iter().any(|r| r.id == "bow"));
        assert_eq!(drawing.on_layer("SELF_INTERSECTING"), vec!["bow"]);
    }

    #[test]
    fn offset_inside() {
        let mut drawing = MemoryDrawing::new(vec![square("pad", 0.0, 0.0, 10.0)]).unwrap();
        let report = offset_polygons(&mut drawing, -2.0, &Settings::default()).unwrap();
        assert_eq!(report.side, "inside");
        assert!((report.offsets[0].area - 36.0).abs() < 1e-9);
    }

    #[test]
    fn offset_zero_distance_is_error() {
        let mut drawing = site();
        assert!(matches!(
            offset_polygons(&mut drawing, 0.0, &Settings::default()),
            Err(WorkflowError::Offset(OffsetError::ZeroDistance))
        ));
    }

    #[test]
    fn angles_per_polyline() {
        let angles = polyline_angles(&site());
        assert_eq!(angles.len(), 3);
        let edge = angles.iter().find(|a| a.id == "edge").unwrap();
        assert_eq!(edge.vertices.len(), 3);
    }

    #[test]
    fn points_sequenced_along_x() {
        let seq = sequence_points(&site());
        let ids: Vec<&str> = seq.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(seq[0].number, 1);
        assert_eq!(seq[2].number, 3);
    }

    #[test]
    fn export_counts_segments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slopes.geojson");
        // 4 + 4 + 3 vertices, no wrap-around.
        let written = export_slopes(&site(), &path, &Settings::default()).unwrap();
        assert_eq!(written, 3 + 3 + 2);

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["features"].as_array().unwrap().len(), 8);
    }
}
