//! CLI command implementations.
//!
//! One module per subcommand:
//! - `parse` - Read elevations from label text
//! - `angles` - Vertex angles of every polyline
//! - `check` - Close polylines and flag self-intersections
//! - `offset` - Offset polygons inside or outside
//! - `label` - Give points the elevation of their nearest label
//! - `inside` - Labels anchored inside closed polylines
//! - `sequence` - Number points along the drawing's long axis
//! - `export` - Write slope segments as GeoJSON

pub mod common;
pub mod parse;
pub mod angles;
pub mod check;
pub mod offset;
pub mod label;
pub mod inside;
pub mod sequence;
pub mod export;

pub use parse::cmd_parse;
pub use angles::cmd_angles;
pub use check::cmd_check;
pub use offset::cmd_offset;
pub use label::cmd_label;
pub use inside::cmd_inside;
pub use sequence::cmd_sequence;
pub use export::cmd_export;
