//! Check command implementation.

use gradekit::workflow::check_polygons;

use super::common::{fail, load_drawing, parse_common, print_json, save_drawing, OutputFormat};

const USAGE: &str = "gradekit check <drawing> [--save <file>] [--json]";

/// Execute the check command: close polylines and flag self-intersections.
pub fn cmd_check(args: &[String]) {
    let common = parse_common(args, &[]);
    let mut drawing = load_drawing(common.drawing_path.as_deref(), USAGE);

    let report = check_polygons(&mut drawing, &common.settings).unwrap_or_else(|e| fail(&e.to_string()));

    match common.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!("Clean:             {}", report.clean.len());
            println!("Closed:            {}", report.closed.len());
            println!("Self-intersecting: {}", report.self_intersecting.len());
            for id in &report.self_intersecting {
                println!("  {} -> {}", id, common.settings.layers.self_intersecting);
            }
            if !report.invalid.is_empty() {
                println!("Invalid:           {}", report.invalid.len());
                for r in &report.invalid {
                    println!("  {}: {}", r.id, r.reason);
                }
            }
        }
    }

    save_drawing(&drawing, common.save_path.as_deref());
}
