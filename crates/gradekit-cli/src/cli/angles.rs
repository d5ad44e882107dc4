//! Angles command implementation.

use gradekit::workflow::polyline_angles;

use super::common::{fmt_point, load_drawing, parse_common, print_json, OutputFormat};

const USAGE: &str = "gradekit angles <drawing> [--json] [--precision <n>]";

/// Execute the angles command: vertex angles for every polyline.
pub fn cmd_angles(args: &[String]) {
    let common = parse_common(args, &[]);
    let drawing = load_drawing(common.drawing_path.as_deref(), USAGE);

    let angles = polyline_angles(&drawing);

    match common.format {
        OutputFormat::Json => print_json(&angles),
        OutputFormat::Text => {
            let precision = common.settings.precision;
            for polyline in &angles {
                println!("{}", polyline.id);
                for (i, v) in polyline.vertices.iter().enumerate() {
                    println!("  {:>3}  {}  {:.*}", i, fmt_point(&v.vertex, precision), precision, v.role);
                }
            }
        }
    }
}
