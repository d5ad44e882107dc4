//! Export command implementation.

use serde::Serialize;

use gradekit::workflow::export_slopes;

use super::common::{fail, load_drawing, parse_common, print_json, OutputFormat};

const USAGE: &str = "gradekit export <drawing> -o <file.geojson> [--config <file>] [--precision <n>]";

#[derive(Serialize)]
struct JsonExport<'a> {
    path: &'a str,
    segments: usize,
}

/// Execute the export command: write every polyline as slope segments.
pub fn cmd_export(args: &[String]) {
    let common = parse_common(args, &["-o", "--output"]);

    let mut output_path: Option<&str> = None;
    let mut i = 0;
    while i < common.rest.len() {
        match common.rest[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                output_path = common.rest.get(i).map(String::as_str);
            }
            other => fail(&format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let Some(output_path) = output_path else {
        eprintln!("Usage: {}", USAGE);
        std::process::exit(1);
    };

    let drawing = load_drawing(common.drawing_path.as_deref(), USAGE);
    let segments = export_slopes(&drawing, output_path, &common.settings).unwrap_or_else(|e| fail(&e.to_string()));

    match common.format {
        OutputFormat::Json => print_json(&JsonExport { path: output_path, segments }),
        OutputFormat::Text => println!("Wrote {} segments to {}", segments, output_path),
    }
}
