//! docoutline CLI - document outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docoutline::convert::{batch_inputs, convert_dir, ExtractorRegistry, OutlineOptions};
use docoutline::render::{to_json, JsonFormat};
use docoutline::{validate_value, OutlineDocument, PageMode, PageSelection, ParseOptions};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "docoutline")]
#[command(version)]
#[command(about = "Extract document outlines (title and headings) from PDF and Markdown to JSON", long_about = None)]
struct Cli {
    /// Input file (PDF, Markdown, or text-unit JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSON file (defaults to the input path with a .json extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Write JSON to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// Validate the output against the outline schema
    #[arg(long)]
    validate: bool,

    #[command(flatten)]
    extract: ExtractArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ExtractArgs {
    /// Estimated lines per page for page number calculation
    #[arg(long, global = true, default_value_t = 50)]
    lines_per_page: u32,

    /// Page numbering for Markdown headings without a page cue
    #[arg(long, global = true, value_enum, default_value = "estimated")]
    mode: ModeArg,

    /// PDF page range (e.g., "1-10", "1,3,5")
    #[arg(long, global = true)]
    pages: Option<String>,

    /// Pretty-print JSON output with indentation
    #[arg(long, global = true)]
    pretty: bool,

    /// Text encoding of Markdown input
    #[arg(long, global = true, default_value = "utf-8")]
    encoding: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every supported file in a directory
    Batch {
        /// Directory with input files
        #[arg(value_name = "INPUT_DIR", env = "INPUT_DIR", default_value = "input")]
        input_dir: PathBuf,

        /// Directory for JSON outlines
        #[arg(value_name = "OUTPUT_DIR", env = "OUTPUT_DIR", default_value = "output")]
        output_dir: PathBuf,

        /// Convert one file at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Print the extracted text units of a file as JSON
    Units {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Estimate pages from line position unless the line has a page cue
    Estimated,
    /// Use page cues only; headings without one stay on the current page
    Strict,
}

impl From<ModeArg> for PageMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Estimated => PageMode::Estimated,
            ModeArg::Strict => PageMode::Strict,
        }
    }
}

impl ExtractArgs {
    fn options(&self) -> CliResult<OutlineOptions> {
        let pages = match &self.pages {
            Some(p) => PageSelection::parse(p)?,
            None => PageSelection::All,
        };

        // Lenient so one unreadable page does not lose the whole outline
        let options = OutlineOptions::new()
            .with_mode(self.mode.into())
            .with_lines_per_page(self.lines_per_page)
            .with_encoding(self.encoding.clone())
            .with_parse_options(ParseOptions::new().lenient().with_pages(pages));
        options.validate()?;
        Ok(options)
    }

    fn format(&self) -> JsonFormat {
        if self.pretty {
            JsonFormat::Pretty
        } else {
            JsonFormat::Compact
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.extract.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match &cli.command {
        Some(Commands::Batch {
            input_dir,
            output_dir,
            sequential,
        }) => cmd_batch(input_dir, output_dir, !sequential, &cli.extract),
        Some(Commands::Units { input }) => cmd_units(input, &cli.extract),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = &cli.input {
                cmd_extract(
                    input,
                    cli.output.as_deref(),
                    cli.stdout,
                    cli.validate,
                    &cli.extract,
                )
            } else {
                println!("{}", "Usage: docoutline <FILE> [OUTPUT]".yellow());
                println!("       docoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn check_input(input: &Path) -> CliResult<()> {
    if !input.exists() {
        return Err(format!("Input file '{}' not found.", input.display()).into());
    }
    if !input.is_file() {
        return Err(format!("'{}' is not a file.", input.display()).into());
    }
    Ok(())
}

/// Input path with a `.json` extension; a `.json` input gets `.outline.json`
/// so it is not overwritten.
fn default_output_path(input: &Path) -> PathBuf {
    let output = input.with_extension("json");
    if output == input {
        input.with_extension("outline.json")
    } else {
        output
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    stdout: bool,
    validate: bool,
    args: &ExtractArgs,
) -> CliResult<()> {
    check_input(input)?;
    let options = args.options()?;

    let output = if stdout {
        None
    } else {
        Some(output.map_or_else(|| default_output_path(input), Path::to_path_buf))
    };

    log::info!("Input file: {}", input.display());
    if let Some(path) = &output {
        log::info!("Output file: {}", path.display());
    }
    log::info!("Lines per page: {}", options.lines_per_page);
    log::info!("Encoding: {}", options.encoding);

    let doc = ExtractorRegistry::with_defaults().extract(input, &options)?;

    log::info!("Found {} headers", doc.outline.len());
    log::info!("Document title: {}", doc.title);

    if validate {
        print_validation(&doc)?;
    }

    let json = to_json(&doc, args.format())?;

    match output {
        None => println!("{}", json),
        Some(path) => {
            fs::write(&path, &json)?;
            println!("{} {}", "Saved to".green(), path.display());
            log::info!("{}", output_size_message(&json));
        }
    }

    Ok(())
}

fn output_size_message(json: &str) -> String {
    format!("Output file size: {} bytes", json.len())
}

fn print_validation(doc: &OutlineDocument) -> CliResult<()> {
    let report = validate_value(&serde_json::to_value(doc)?);

    eprintln!("\n{}", "=== Validation Results ===".cyan().bold());
    if report.is_valid() {
        eprintln!("{}", "Output validates successfully!".green());
    } else {
        for issue in &report.issues {
            eprintln!("  {} {}", "✗".red(), issue);
        }
        eprintln!(
            "{}",
            "Warning: Output does not fully conform to expected schema.".yellow()
        );
    }
    Ok(())
}

fn cmd_units(input: &Path, args: &ExtractArgs) -> CliResult<()> {
    check_input(input)?;
    let options = args.options()?;

    let units = ExtractorRegistry::with_defaults().units(input, &options)?;
    let json = match args.format() {
        JsonFormat::Pretty => serde_json::to_string_pretty(&units)?,
        JsonFormat::Compact => serde_json::to_string(&units)?,
    };
    println!("{}", json);

    Ok(())
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    parallel: bool,
    args: &ExtractArgs,
) -> CliResult<()> {
    if !input_dir.is_dir() {
        return Err(format!("Input directory '{}' not found.", input_dir.display()).into());
    }
    let options = args.options()?;
    let registry = ExtractorRegistry::with_defaults();

    let total = batch_inputs(&registry, input_dir, output_dir)?.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = convert_dir(
        &registry,
        input_dir,
        output_dir,
        &options,
        args.format(),
        parallel,
        |outcome| {
            if let Some(name) = outcome.input.file_name() {
                pb.set_message(name.to_string_lossy().to_string());
            }
            pb.inc(1);
        },
    )?;

    pb.finish_with_message("Done!");

    println!(
        "\n{} {}/{} files -> {}",
        "Converted".green().bold(),
        report.succeeded(),
        report.outcomes.len(),
        output_dir.display()
    );

    let mut failed = 0;
    for outcome in report.failures() {
        if let Err(e) = &outcome.result {
            println!("  {} {}: {}", "✗".red(), outcome.input.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, report.outcomes.len()).into());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document outline extraction tool");
    println!();
    println!("Inputs: PDF (font sizes), Markdown (# headings), text-unit JSON");
    println!("License: MIT");
}
