//! Offset command implementation.

use gradekit::format_fixed;
use gradekit::workflow::offset_polygons;

use super::common::{fail, fmt_point, load_drawing, parse_common, parse_number, print_json, save_drawing, OutputFormat};

const USAGE: &str = "gradekit offset <drawing> [-d <distance>] [--save <file>] [--json]";

/// Execute the offset command.
///
/// A positive distance offsets outward, a negative one inward. Without
/// `-d` the distance comes from the settings.
pub fn cmd_offset(args: &[String]) {
    let common = parse_common(args, &["-d", "--distance"]);

    let mut distance = common.settings.offset_distance;
    let mut i = 0;
    while i < common.rest.len() {
        match common.rest[i].as_str() {
            flag @ ("-d" | "--distance") => {
                i += 1;
                distance = parse_number(flag, common.rest.get(i));
            }
            other => fail(&format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let mut drawing = load_drawing(common.drawing_path.as_deref(), USAGE);
    let report = offset_polygons(&mut drawing, distance, &common.settings).unwrap_or_else(|e| fail(&e.to_string()));

    match common.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            let precision = common.settings.precision;
            println!("Offset {} by {}", report.side, format_fixed(distance.abs(), precision));
            for offset in &report.offsets {
                println!("{}  area {}", offset.id, format_fixed(offset.area, precision));
                for v in offset.polygon.vertices() {
                    println!("  {}", fmt_point(v, precision));
                }
            }
            for r in &report.failed {
                println!("{}  failed: {}", r.id, r.reason);
            }
        }
    }

    save_drawing(&drawing, common.save_path.as_deref());
}
