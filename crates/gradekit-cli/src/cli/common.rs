//! Common utilities shared across CLI commands.

use std::fs;

use serde::Serialize;

use gradekit::{format_fixed, Drawing, MemoryDrawing, Point3, Settings};

/// Output format for command results.
#[derive(Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Options every drawing command understands.
pub struct CommonArgs {
    pub drawing_path: Option<String>,
    pub settings: Settings,
    pub format: OutputFormat,
    /// Write the drawing back out (with failure layers assigned) here.
    pub save_path: Option<String>,
    /// Remaining command-specific arguments, in order.
    pub rest: Vec<String>,
}

/// Parse the shared flags, leaving anything unknown in `rest`.
///
/// `value_flags` are the command's own flags that take a value; they are
/// kept in `rest` together with that value. `--config` is applied first so
/// `--precision` overrides it no matter where it appears.
pub fn parse_common(args: &[String], value_flags: &[&str]) -> CommonArgs {
    let mut settings = match find_flag(args, "--config") {
        Some(path) => Settings::load(path).unwrap_or_else(|e| fail(&format!("{}: {}", path, e))),
        None => Settings::default(),
    };

    let mut drawing_path: Option<String> = None;
    let mut format = OutputFormat::Text;
    let mut save_path: Option<String> = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
            }
            "--precision" => {
                i += 1;
                if i < args.len() {
                    settings.precision = args[i]
                        .parse()
                        .unwrap_or_else(|_| fail(&format!("Invalid precision: {}", args[i])));
                }
            }
            "--json" => {
                format = OutputFormat::Json;
            }
            "--save" => {
                i += 1;
                if i < args.len() {
                    save_path = Some(args[i].clone());
                }
            }
            arg if value_flags.contains(&arg) => {
                rest.push(arg.to_string());
                i += 1;
                if i < args.len() {
                    rest.push(args[i].clone());
                }
            }
            arg if drawing_path.is_none() && !arg.starts_with('-') => {
                drawing_path = Some(arg.to_string());
            }
            arg => rest.push(arg.to_string()),
        }
        i += 1;
    }

    CommonArgs { drawing_path, settings, format, save_path, rest }
}

/// Arguments left after removing the shared flags, in command-line order.
///
/// For commands whose positional arguments are data rather than a drawing
/// path, such as `parse`, where `-5` is a label and not an option.
pub fn without_common_flags(args: &[String]) -> Vec<&str> {
    let mut kept = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "--precision" | "--save" => i += 1,
            "--json" => {}
            arg => kept.push(arg),
        }
        i += 1;
    }
    kept
}

fn find_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Print an error and exit with status 1.
pub fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Load the drawing named on the command line, or exit.
pub fn load_drawing(path: Option<&str>, usage: &str) -> MemoryDrawing {
    let Some(path) = path else {
        eprintln!("Usage: {}", usage);
        std::process::exit(1);
    };
    MemoryDrawing::load(path).unwrap_or_else(|e| fail(&format!("{}: {}", path, e)))
}

/// Save the drawing as JSON if `--save` was given.
pub fn save_drawing(drawing: &MemoryDrawing, path: Option<&str>) {
    let Some(path) = path else {
        return;
    };
    let json = drawing.to_json().unwrap_or_else(|e| fail(&e.to_string()));
    if let Err(e) = fs::write(path, json) {
        fail(&format!("cannot write {}: {}", path, e));
    }
    tracing::info!(path, entities = drawing.entity_ids().len(), "saved drawing");
}

/// Print a serializable result as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("serialization error: {}", e)),
    }
}

/// `(x, y, z)` in fixed-point notation.
pub fn fmt_point(p: &Point3, precision: usize) -> String {
    format!(
        "({}, {}, {})",
        format_fixed(p.x, precision),
        format_fixed(p.y, precision),
        format_fixed(p.z, precision)
    )
}

/// Parse a required numeric flag value, or exit.
pub fn parse_number(flag: &str, value: Option<&String>) -> f64 {
    let Some(value) = value else {
        fail(&format!("{} needs a value", flag));
    };
    value
        .parse()
        .unwrap_or_else(|_| fail(&format!("Invalid number for {}: {}", flag, value)))
}
