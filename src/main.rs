//! inkslide CLI
//!
//! Usage:
//!   inkslide [OPTIONS] <FILE>
//!
//! Options:
//!   -i, --imageexport        Render pages as PNG and join them with ImageMagick
//!       --export-pdf <FILE>  Output file (default: input with .pdf extension)
//!   -c, --config <FILE>      Configuration file (TOML format)
//!   -l, --list               Print the slides and exit
//!   -v, --verbose            More log output (repeat for more)
//!   -q, --quiet              Only print warnings and errors
//!   -h, --help               Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use log::LevelFilter;

use inkslide::export::{self, ExportFormat};
use inkslide::{DeckConfig, Document, Presentation, SlideError};

const AFTER_HELP: &str = r#"Create a 'content'-labelled layer and put a text box (no flowRect) in it,
with each line looking like:

   background, layer1
   background, layer2
   background, layer2, layer3
   background, layer2 * 0.5, layer3
   +layer4 * 0.5

Each name is the label of a layer (or of a group containing layers). Lines
starting with '+' add the named layers to the layers of the preceding line,
creating incremental display (no whitespace before the '+').

The opacity of a layer can be changed by adding '* <0..1>' after its name."#;

#[derive(Parser)]
#[command(name = "inkslide")]
#[command(about = "Generate slides from the layers of an Inkscape drawing")]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Inkscape SVG file
    input: PathBuf,

    /// Render pages as PNG and join them with ImageMagick
    #[arg(short, long)]
    imageexport: bool,

    /// Output file (default: input with .pdf extension)
    #[arg(long, value_name = "FILE")]
    export_pdf: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resolution for PNG pages
    #[arg(long)]
    dpi: Option<u32>,

    /// Inkscape executable
    #[arg(long, value_name = "PATH")]
    inkscape: Option<PathBuf>,

    /// Keep the per-slide pages after joining
    #[arg(long)]
    keep_pages: bool,

    /// Print the slides and exit without rendering
    #[arg(short, long)]
    list: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Load configuration, then let flags override it
    let mut config = match &cli.config {
        Some(path) => match DeckConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(&format!("Error loading config '{}': {}", path.display(), e)),
        },
        None => DeckConfig::default(),
    };
    if cli.imageexport {
        config.export = config.export.with_format(ExportFormat::Png);
    }
    if let Some(dpi) = cli.dpi {
        config.export = config.export.with_dpi(dpi);
    }
    if let Some(inkscape) = &cli.inkscape {
        config.export = config.export.with_inkscape(inkscape);
    }
    if cli.keep_pages {
        config.export = config.export.with_keep_pages(true);
    }

    let source = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => fail(&format!("Error reading file '{}': {}", cli.input.display(), e)),
    };
    let document = match Document::parse(&source) {
        Ok(doc) => doc,
        Err(e) => fail(&format!("Error parsing '{}': {}", cli.input.display(), e)),
    };

    let output = cli
        .export_pdf
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    let presentation = match Presentation::from_document(document, &config.directives) {
        Ok(p) => p,
        Err(e @ SlideError::Directive { .. }) => fail(&e.report(&config.directives.content_label)),
        Err(e) => fail(&format!("Error: {}", e)),
    };

    match presentation {
        Some(presentation) if cli.list => list_slides(&presentation),
        Some(mut presentation) => {
            let summary = match export::export_presentation(&mut presentation, &output, &config.export) {
                Ok(summary) => summary,
                Err(e) => fail(&format!("Error: {}", e)),
            };
            match summary.joined {
                Some(joined) => println!("Output file {}", joined.display()),
                None => {
                    for page in &summary.pages {
                        println!("{}", page.display());
                    }
                }
            }
        }
        None if cli.list => {
            println!(
                "No '{}' layer: the whole drawing is exported as one page.",
                config.directives.content_label
            );
        }
        None => export_whole(&cli.input, &output, &config),
    }
}

fn list_slides(presentation: &Presentation) {
    println!("{}", presentation.describe());
    for label in presentation.unknown_labels() {
        log::warn!("no layer or group labelled '{}'", label);
    }
}

fn export_whole(input: &Path, output: &Path, config: &DeckConfig) {
    match export::export_whole(input, output, &config.export) {
        Ok(page) => println!("Output file {}", page.display()),
        Err(e) => fail(&format!("Error: {}", e)),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
