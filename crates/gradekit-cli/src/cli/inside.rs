//! Inside command implementation.

use gradekit::workflow::elevations_in_polygons;

use super::common::{load_drawing, parse_common, print_json, OutputFormat};

const USAGE: &str = "gradekit inside <drawing> [--json]";

/// Execute the inside command: labels anchored inside each closed polyline.
pub fn cmd_inside(args: &[String]) {
    let common = parse_common(args, &[]);
    let drawing = load_drawing(common.drawing_path.as_deref(), USAGE);

    let labels = elevations_in_polygons(&drawing);

    match common.format {
        OutputFormat::Json => print_json(&labels),
        OutputFormat::Text => {
            let precision = common.settings.precision;
            for polygon in &labels {
                println!("{}  ({} labels)", polygon.id, polygon.texts.len());
                for t in &polygon.texts {
                    println!("  {}  {:?}  {:.*}", t.id, t.text, precision, t.elevation);
                }
            }
        }
    }
}
