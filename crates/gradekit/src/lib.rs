//! # gradekit
//!
//! Geometry and annotation utilities for grading drawings.
//!
//! The pieces are small and independent:
//! - [`text`] reads elevations out of label text
//! - [`geometry`], [`intersect`] and [`angles`] answer planar questions
//! - [`offset`] grows or shrinks polygons and picks the requested side
//! - [`nearest`] pairs points with their closest label
//! - [`order`] numbers points along a drawing's long axis
//! - [`export`] writes slope segments as GeoJSON
//!
//! [`workflow`] ties them to a [`Drawing`], which is how the rest of the
//! crate sees a CAD document.
//!
//! ## Rust Lesson #7: Modules
//!
//! Every module is declared here; `pub use` lifts the names callers reach
//! for most often up to the crate root.

pub mod angles;
pub mod config;
pub mod drawing;
pub mod export;
pub mod geometry;
pub mod intersect;
pub mod nearest;
pub mod offset;
pub mod order;
pub mod svg;
pub mod text;
pub mod workflow;

pub use angles::{interior_angle_degrees, vertices_with_angles, VertexAngle, VertexRole};
pub use config::{ConfigError, LayerNames, Settings};
pub use drawing::{Drawing, DrawingError, Entity, EntityKind, MemoryDrawing};
pub use export::{segments_from_polylines, to_geojson, write_geojson, ExportConfig, ExportError, SlopeSegment};
pub use geometry::{BoundingBox, GeometryError, Planar, Point, Point3, Polygon};
pub use intersect::{has_self_intersection, point_in_polygon, segment_intersection, Intersection};
pub use nearest::{nearest_candidate, nearest_elevation, TextCandidate};
pub use offset::{offset_polygon, offset_to_side, resolve, OffsetChoice, OffsetError, OffsetSide};
pub use order::{dominant_axis, sort_along_dominant_axis, SortAxis};
pub use svg::{drawing_from_svg, SvgError};
pub use text::{format_fixed, parse_elevation, Elevation, INVALID_ELEVATION};
pub use workflow::WorkflowError;
