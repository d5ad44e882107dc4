//! Parse command implementation.

use serde::Serialize;

use gradekit::{parse_elevation, Elevation};

use super::common::{parse_common, print_json, without_common_flags, OutputFormat};

/// One parsed label in JSON output.
#[derive(Serialize)]
struct JsonParsed<'a> {
    text: &'a str,
    elevation: Elevation,
}

/// Execute the parse command: print the elevation read from each argument.
pub fn cmd_parse(args: &[String]) {
    let common = parse_common(args, &[]);
    let texts = without_common_flags(args);

    if texts.is_empty() {
        eprintln!("Usage: gradekit parse <text>... [--json] [--precision <n>]");
        std::process::exit(1);
    }

    let parsed: Vec<JsonParsed> = texts
        .iter()
        .map(|&text| JsonParsed { text, elevation: parse_elevation(text) })
        .collect();

    match common.format {
        OutputFormat::Json => print_json(&parsed),
        OutputFormat::Text => {
            let precision = common.settings.precision;
            for p in &parsed {
                println!("{:?} -> {:.*}", p.text, precision, p.elevation);
            }
        }
    }
}
