// Command-line entry point for punchbox.
//
// Reads a MIDI file, finds the best transposition for the selected music box
// and writes one SVG punch sheet per page.
//
// Usage:
//   punchbox [FILENAME] [OPTIONS]
// Run with --help for the option list. Options override values from the
// YAML configuration file (punchbox.yaml in the working directory unless
// --config names another).

use std::path::PathBuf;
use std::process::ExitCode;

use punchbox::config::{load_settings, Overrides};
use punchbox::renderers::SvgRenderer;
use punchbox::utils::logger;

fn main() -> ExitCode {
    let overrides = match parse_args(std::env::args().skip(1)) {
        Ok(Some(overrides)) => overrides,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    if let Err(e) = logger::init(overrides.debug) {
        eprintln!("Failed to install logger: {e}");
    }

    let settings = match load_settings(&overrides) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(1);
        }
    };

    match punchbox::export_punch_sheets(&settings, &SvgRenderer) {
        Ok(report) => {
            log::info!(
                "Wrote {} page(s), {} of {} notes placed",
                report.written.len(),
                report.placed_notes,
                report.total_notes
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(1)
        }
    }
}

/// Parse command-line arguments into overrides. `Ok(None)` means help was
/// requested.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Overrides>, String> {
    let mut overrides = Overrides::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--debug" => overrides.debug = true,
            "--config" => overrides.config_path = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--dump-plan" => overrides.dump_plan = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--output" => overrides.output = Some(value(&mut args, &arg)?),
            "--name" => overrides.name = Some(value(&mut args, &arg)?),
            "--musicbox" => overrides.musicbox = Some(value(&mut args, &arg)?),
            "--marker-offset" => overrides.marker_offset = Some(number(&mut args, &arg)?),
            "--marker-offset-top" => overrides.marker_offset_top = Some(number(&mut args, &arg)?),
            "--marker-offset-bottom" => overrides.marker_offset_bottom = Some(number(&mut args, &arg)?),
            "--marker-size" => overrides.marker_size = Some(number(&mut args, &arg)?),
            "--margin" => overrides.margin = Some(number(&mut args, &arg)?),
            "--font-size" => overrides.font_size = Some(number(&mut args, &arg)?),
            "--divisor" => overrides.divisor = Some(number(&mut args, &arg)?),
            "--transpose-lower" => overrides.transpose_lower = Some(number(&mut args, &arg)?),
            "--transpose-upper" => overrides.transpose_upper = Some(number(&mut args, &arg)?),
            "--page-width" => overrides.page_width = Some(number(&mut args, &arg)?),
            "--page-height" => overrides.page_height = Some(number(&mut args, &arg)?),
            "--tracks" => overrides.tracks = Some(track_list(&value(&mut args, &arg)?)?),
            other if other.starts_with('-') => return Err(format!("Unknown argument: {other}")),
            _ => {
                if overrides.filename.is_some() {
                    return Err(format!("Unexpected extra input file: {arg}"));
                }
                overrides.filename = Some(arg);
            }
        }
    }

    Ok(Some(overrides))
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} requires a value"))
}

fn number<T: std::str::FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T, String> {
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| format!("{flag} requires a valid number, got '{raw}'"))
}

/// Comma-separated track indices, e.g. `0,2,3`
fn track_list(raw: &str) -> Result<Vec<usize>, String> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| format!("--tracks expects comma-separated track numbers, got '{raw}'"))
        })
        .collect()
}

fn print_usage() {
    println!("Usage: punchbox [FILENAME] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>              YAML configuration file (default: punchbox.yaml)");
    println!("  --output <PREFIX>            Output file prefix (default: output)");
    println!("  --name <NAME>                Piece name printed on every stave");
    println!("  --musicbox <NAME>            Music box profile from the configuration file");
    println!("  --marker-offset <MM>         Marker offset (default: 6)");
    println!("  --marker-offset-top <MM>     Marker offset above the stave");
    println!("  --marker-offset-bottom <MM>  Marker offset below the stave");
    println!("  --marker-size <MM>           Marker cross size (default: 5)");
    println!("  --margin <MM>                Page margin (default: 20)");
    println!("  --font-size <MM>             Label font size (default: 1)");
    println!("  --divisor <TICKS>            MIDI ticks per millimetre (default: 67)");
    println!("  --transpose-lower <N>        Lowest shift tried, inclusive (default: -100)");
    println!("  --transpose-upper <N>        Highest shift tried, exclusive (default: 100)");
    println!("  --page-width <MM>            Page width (default: 297)");
    println!("  --page-height <MM>           Page height (default: 210)");
    println!("  --tracks <LIST>              Comma-separated MIDI tracks to read (default: 0-15)");
    println!("  --dump-plan <PATH>           Also write the display list as JSON");
    println!("  --debug                      Verbose logging");
    println!("  --help, -h                   Show this help");
}
