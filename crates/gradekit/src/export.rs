//! Slope segment export.
//!
//! Polylines are cut into one segment per consecutive vertex pair and
//! written as a GeoJSON `FeatureCollection` of `LineString` features, the
//! input format of the grading tool downstream. Only the geometry and the
//! slope id are filled in; the design properties stay `null` for the
//! engineer to complete.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::geometry::Point3;
use crate::text::format_fixed;

/// One straight piece of a source polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlopeSegment {
    pub id: u32,
    pub start: Point3,
    pub end: Point3,
}

/// Configuration for the export document.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// FeatureCollection name.
    /// Default: "slopes-input"
    pub name: String,
    /// Decimal digits written for each coordinate.
    /// Default: 4
    pub precision: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            name: "slopes-input".to_string(),
            precision: 4,
        }
    }
}

impl ExportConfig {
    pub fn with_precision(precision: usize) -> Self {
        Self { precision, ..Self::default() }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// GEOJSON DOCUMENT
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    name: String,
    crs: Option<()>,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: SlopeProperties,
    geometry: LineString,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SlopeProperties {
    elevations_target_m: Option<f64>,
    pad_id: Option<u32>,
    slope_id: u32,
    slope_target: Option<f64>,
}

#[derive(Debug, Serialize)]
struct LineString {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: [[Box<RawValue>; 2]; 2],
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// ============================================================================
// SEGMENTATION
// ============================================================================

/// Cut polylines into slope segments.
///
/// One segment per consecutive vertex pair, no wrap-around even for closed
/// polylines. Ids start at 0 and run on across polylines in input order.
/// The result is sorted by id.
pub fn segments_from_polylines<V: AsRef<[Point3]>>(polylines: &[V]) -> Vec<SlopeSegment> {
    let mut segments: Vec<SlopeSegment> = polylines
        .iter()
        .flat_map(|line| {
            line.as_ref()
                .windows(2)
                .map(|pair| (pair[0], pair[1]))
                .collect::<Vec<_>>()
        })
        .zip(0u32..)
        .map(|((start, end), id)| SlopeSegment { id, start, end })
        .collect();

    segments.sort_by_key(|s| s.id);
    segments
}

/// Build the feature collection, features in ascending id order.
pub fn to_feature_collection(
    segments: &[SlopeSegment],
    config: &ExportConfig,
) -> Result<FeatureCollection, ExportError> {
    let mut ordered = segments.to_vec();
    ordered.sort_by_key(|s| s.id);

    let coord = |v: f64| RawValue::from_string(format_fixed(v, config.precision));

    let features = ordered
        .iter()
        .map(|seg| -> Result<Feature, serde_json::Error> {
            Ok(Feature {
                kind: "Feature",
                properties: SlopeProperties {
                    elevations_target_m: None,
                    pad_id: None,
                    slope_id: seg.id,
                    slope_target: None,
                },
                geometry: LineString {
                    kind: "LineString",
                    coordinates: [
                        [coord(seg.start.x)?, coord(seg.start.y)?],
                        [coord(seg.end.x)?, coord(seg.end.y)?],
                    ],
                },
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        kind: "FeatureCollection",
        name: config.name.clone(),
        crs: None,
        features,
    })
}

/// Serialize segments as a GeoJSON document.
pub fn to_geojson(segments: &[SlopeSegment], config: &ExportConfig) -> Result<String, ExportError> {
    let collection = to_feature_collection(segments, config)?;
    Ok(serde_json::to_string_pretty(&collection)?)
}

/// Write segments to `path`, replacing any previous content.
///
/// The document is serialized before the file is opened, so a serialization
/// or open failure leaves no file behind.
pub fn write_geojson(
    path: impl AsRef<Path>,
    segments: &[SlopeSegment],
    config: &ExportConfig,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let document = to_geojson(segments, config)?;

    let mut file = File::create(path).map_err(|source| ExportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(document.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), features = segments.len(), "wrote slope export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn three_polylines() -> Vec<Vec<Point3>> {
        vec![
            vec![p(0.0, 0.0), p(1.0, 0.0)],
            vec![p(10.0, 0.0), p(11.0, 1.0), p(12.0, 0.0)],
            vec![p(20.0, 0.0), p(21.0, 0.0), p(21.0, 1.0), p(20.0, 1.0)],
        ]
    }

    #[test]
    fn ids_follow_polyline_then_vertex_order() {
        let segments = segments_from_polylines(&three_polylines());
        assert_eq!(segments.len(), 6);

        let ids: Vec<u32> = segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);

        assert_eq!(segments[0].start, p(0.0, 0.0));
        assert_eq!(segments[1].start, p(10.0, 0.0));
        assert_eq!(segments[2].end, p(12.0, 0.0));
        assert_eq!(segments[5].start, p(21.0, 1.0));
        assert_eq!(segments[5].end, p(20.0, 1.0));
    }

    #[test]
    fn single_vertex_polyline_contributes_nothing() {
        let polylines = vec![vec![p(0.0, 0.0)], vec![p(1.0, 1.0), p(2.0, 2.0)]];
        let segments = segments_from_polylines(&polylines);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, 0);
    }

    #[test]
    fn document_shape() {
        let segments = segments_from_polylines(&three_polylines());
        let json = to_geojson(&segments, &ExportConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["name"], "slopes-input");
        assert!(value["crs"].is_null());

        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 6);
        for (i, feature) in features.iter().enumerate() {
            assert_eq!(feature["type"], "Feature");
            assert_eq!(feature["properties"]["slopeId"], i as u64);
            assert!(feature["properties"]["elevationsTargetM"].is_null());
            assert!(feature["properties"]["padId"].is_null());
            assert!(feature["properties"]["slopeTarget"].is_null());
            assert_eq!(feature["geometry"]["type"], "LineString");
        }
        assert_eq!(features[3]["geometry"]["coordinates"][1][0], 21.0);
    }

    #[test]
    fn coordinates_fixed_point() {
        let segments = vec![SlopeSegment {
            id: 0,
            start: p(1.0, 2.123456),
            end: p(0.00001, 1234567.0),
        }];
        let json = to_geojson(&segments, &ExportConfig::default()).unwrap();
        assert!(json.contains("1.0000"));
        assert!(json.contains("2.1235"));
        assert!(json.contains("0.0000"));
        assert!(json.contains("1234567.0000"));
        assert!(!json.contains("e-"));
    }

    #[test]
    fn features_sorted_by_id() {
        let segments = vec![
            SlopeSegment { id: 2, start: p(2.0, 0.0), end: p(3.0, 0.0) },
            SlopeSegment { id: 0, start: p(0.0, 0.0), end: p(1.0, 0.0) },
            SlopeSegment { id: 1, start: p(1.0, 0.0), end: p(2.0, 0.0) },
        ];
        let collection = to_feature_collection(&segments, &ExportConfig::default()).unwrap();
        let ids: Vec<u32> = collection.features.iter().map(|f| f.properties.slope_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn non_finite_coordinate_fails() {
        let segments = vec![SlopeSegment { id: 0, start: p(f64::NAN, 0.0), end: p(1.0, 0.0) }];
        assert!(matches!(
            to_geojson(&segments, &ExportConfig::default()),
            Err(ExportError::Serialize(_))
        ));
    }

    #[test]
    fn write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slopes.geojson");
        std::fs::write(&path, "stale content that is much longer than nothing").unwrap();

        let segments = segments_from_polylines(&three_polylines());
        write_geojson(&path, &segments, &ExportConfig::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with('{'));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn missing_directory_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("slopes.geojson");
        let err = write_geojson(&path, &[], &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::Open { .. }));
        assert!(!path.exists());
    }
}
