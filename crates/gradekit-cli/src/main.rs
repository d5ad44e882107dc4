//! gradekit - grading drawing utilities
//!
//! Usage:
//!   gradekit parse <text>...          Read elevations from label text
//!   gradekit check <drawing>          Flag self-intersecting polygons
//!   gradekit offset <drawing> -d <n>  Offset polygons
//!   gradekit export <drawing> -o <f>  Write slope segments as GeoJSON

use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{cmd_angles, cmd_check, cmd_export, cmd_inside, cmd_label, cmd_offset, cmd_parse, cmd_sequence};

fn main() {
    let mut args: Vec<String> = env::args().collect();

    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    args.retain(|a| a != "-v" && a != "--verbose");
    init_logging(verbose);

    let prog = args.first().cloned().unwrap_or_else(|| "gradekit".to_string());
    if args.len() < 2 {
        print_usage(&prog);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "parse" => cmd_parse(&args[2..]),
        "angles" => cmd_angles(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "offset" => cmd_offset(&args[2..]),
        "label" => cmd_label(&args[2..]),
        "inside" => cmd_inside(&args[2..]),
        "sequence" => cmd_sequence(&args[2..]),
        "export" => cmd_export(&args[2..]),
        "help" | "--help" | "-h" => print_usage(&prog),
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_usage(&prog);
            std::process::exit(1);
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "gradekit=debug" } else { "gradekit=info" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_usage(prog: &str) {
    eprintln!("gradekit - geometry and label utilities for grading drawings");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} parse <text>...                  Elevation read from each text", prog);
    eprintln!("  {} angles <drawing>                 Vertex angles of every polyline", prog);
    eprintln!("  {} check <drawing>                  Close polylines, flag self-intersections", prog);
    eprintln!("  {} offset <drawing> [-d <n>]        Offset polygons (+ outside, - inside)", prog);
    eprintln!("  {} label <drawing>                  Nearest-label elevation for every point", prog);
    eprintln!("  {} inside <drawing>                 Labels inside each closed polyline", prog);
    eprintln!("  {} sequence <drawing>               Number points along the long axis", prog);
    eprintln!("  {} export <drawing> -o <file>       Write slope segments as GeoJSON", prog);
    eprintln!();
    eprintln!("Drawings: .json, .yaml/.yml or .svg");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>      Settings YAML (precision, export name, layers)");
    eprintln!("  --precision <n>      Decimal digits in output (default: 4)");
    eprintln!("  -d, --distance <n>   Offset distance (default: from settings, 1.0)");
    eprintln!("  -o, --output <file>  Export destination");
    eprintln!("  --save <file>        Write the drawing with failure layers as JSON");
    eprintln!("  --json               Machine-readable output");
    eprintln!("  -v, --verbose        Debug logging (RUST_LOG overrides)");
}
