//! Sequence command implementation.

use gradekit::workflow::sequence_points;

use super::common::{fmt_point, load_drawing, parse_common, print_json, OutputFormat};

const USAGE: &str = "gradekit sequence <drawing> [--json]";

/// Execute the sequence command: number points along the long axis.
pub fn cmd_sequence(args: &[String]) {
    let common = parse_common(args, &[]);
    let drawing = load_drawing(common.drawing_path.as_deref(), USAGE);

    let sequence = sequence_points(&drawing);

    match common.format {
        OutputFormat::Json => print_json(&sequence),
        OutputFormat::Text => {
            let precision = common.settings.precision;
            for p in &sequence {
                println!("{:>4}  {}  {}", p.number, p.id, fmt_point(&p.position, precision));
            }
        }
    }
}
