//! forge – command-line HTML → styled text-run converter.
//!
//! Usage:
//!   forge <input.html> [output.json] [--styles styles.json] [--title "My Report"]
//!   forge --demo
//!
//! If `output.json` is omitted the layout is written next to the input file
//! with the same stem (e.g. `report.html` → `report.json`).

use std::{env, fs, path::Path, path::PathBuf, process};

use text_forge::pipeline::{compose_document, PipelineConfig};
use text_forge::style::StyleDefaults;
use text_forge::{templates, DocumentLayout};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut styles_path: Option<PathBuf> = None;
    let mut title: Option<String> = None;
    let mut demo = false;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--demo" => demo = true,
            "--title" | "-t" => match iter.next() {
                Some(v) => title = Some(v.clone()),
                None => title = Some("Template".to_string()),
            },
            "--styles" | "-s" => match iter.next() {
                Some(v) => styles_path = Some(PathBuf::from(v)),
                None => {
                    eprintln!("Error: --styles needs a path.");
                    print_usage(&args[0]);
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let mut config = match styles_path {
        Some(path) => match load_styles(&path) {
            Ok(overrides) => PipelineConfig::with_style_overrides(overrides),
            Err(e) => {
                eprintln!("Error loading styles '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    if demo {
        config.title = title.unwrap_or_else(|| "Quarterly Report".to_string());
        let layout = compose_document(templates::report_template(), &config);
        println!("{}", layout.to_json());
        return;
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no input file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let output = output_path.unwrap_or_else(|| input.with_extension("json"));

    let html = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", input.display());
            process::exit(1);
        }
    };

    // Default title: stem of the input filename.
    let default_title = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("text-forge output")
        .to_string();
    config.title = title.unwrap_or(default_title);

    let layout = compose_document(&html, &config);
    if let Err(e) = write_layout(&output, &layout) {
        eprintln!("Error writing '{}': {e}", output.display());
        process::exit(1);
    }
    let count = layout.paragraphs.len();
    eprintln!(
        "Wrote '{}' ({} paragraph{})",
        output.display(),
        count,
        if count == 1 { "" } else { "s" }
    );
}

fn load_styles(path: &Path) -> text_forge::Result<StyleDefaults> {
    let json = fs::read_to_string(path)?;
    StyleDefaults::from_json(&json)
}

fn write_layout(path: &Path, layout: &DocumentLayout) -> text_forge::Result<()> {
    // Create output directory if necessary.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, layout.to_json())?;
    Ok(())
}

fn print_usage(prog: &str) {
    eprintln!("forge – HTML to styled text runs (text-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <input.html> [output.json] [--styles styles.json] [--title \"My Report\"]");
    eprintln!("  {prog} --demo");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <input.html>   HTML file to compose");
    eprintln!("  [output.json]  Output path  (default: same stem as input with .json)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --styles, -s   JSON table of tag styles layered over the built-in defaults");
    eprintln!("  --title, -t    Title recorded in the output (default: input filename stem)");
    eprintln!("  --demo         Compose the bundled report template and print it to stdout");
    eprintln!("  --help         Print this message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for composition traces.");
}
