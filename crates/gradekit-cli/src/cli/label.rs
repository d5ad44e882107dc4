//! Label command implementation.

use gradekit::workflow::label_points;

use super::common::{fail, fmt_point, load_drawing, parse_common, print_json, save_drawing, OutputFormat};

const USAGE: &str = "gradekit label <drawing> [--save <file>] [--json]";

/// Execute the label command: each point takes the elevation of its
/// nearest text.
pub fn cmd_label(args: &[String]) {
    let common = parse_common(args, &[]);
    let mut drawing = load_drawing(common.drawing_path.as_deref(), USAGE);

    let report = label_points(&mut drawing, &common.settings).unwrap_or_else(|e| fail(&e.to_string()));

    match common.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            let precision = common.settings.precision;
            for p in &report.processed {
                println!("{}  {}  {:.*}", p.id, fmt_point(&p.position, precision), precision, p.elevation);
            }
            for id in &report.failed {
                println!("{}  -> {}", id, common.settings.layers.elevation_failed);
            }
            println!("Processed: {}, failed: {}", report.processed.len(), report.failed.len());
        }
    }

    save_drawing(&drawing, common.save_path.as_deref());
}
