//! gabc-lint: check gabc/nabc chant scores for gregorio errors.
//!
//! Two input modes:
//!
//! - **stdin mode**: `gabc-lint < score.gabc`
//! - **file mode**: `gabc-lint -F grelaon scores/*.gabc`
//!
//! Exit status: 0 when no error was reported, 1 when at least one
//! error-severity diagnostic was found, 2 when an input could not be read.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use gabc_syntax::{AlternationConfig, Document, FontFamily, Severity, ValidationContext};
use report::FileReport;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Label used for input read from stdin.
const STDIN_LABEL: &str = "<stdin>";

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "GABC_LINT_LOG";

#[derive(Parser)]
#[command(
    name = "gabc-lint",
    about = "Validate gabc/nabc Gregorian chant scores as the gregorio compiler reads them"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// nabc font family: gregall, gresgmodern or grelaon.
    /// Overrides the nabc-font header.
    #[arg(short = 'F', long)]
    font: Option<FontFamily>,

    /// Output format: text (default) or json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Report at most N diagnostics per file (0 = no limit)
    #[arg(short = 'm', long, default_value_t = 0)]
    max_diagnostics: usize,

    /// Alternation period, overriding the nabc-lines header
    #[arg(long)]
    nabc_lines: Option<u32>,

    /// Do not print information-level diagnostics
    #[arg(long)]
    no_info: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(clean) => std::process::exit(if clean { 0 } else { 1 }),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Lint every input and print the report. Returns whether no error was found.
fn run(cli: &Cli) -> Result<bool> {
    let reporter = report::create_reporter(&cli.format)?;

    let inputs = if cli.files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        vec![(STDIN_LABEL.to_string(), input)]
    } else {
        let paths = collect_scores(&cli.files)?;
        if paths.is_empty() {
            anyhow::bail!("no input files");
        }
        paths
            .iter()
            .map(|path| {
                fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))
                    .map(|text| (path.display().to_string(), text))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let mut clean = true;
    let mut reports = Vec::with_capacity(inputs.len());
    for (file, text) in inputs {
        let report = lint(cli, file, &text);
        clean &= !report.has_errors;
        reports.push(report);
    }

    print!("{}", reporter.render(&reports)?);
    Ok(clean)
}

/// Validate one score and apply the output filters.
fn lint(cli: &Cli, file: String, text: &str) -> FileReport {
    let document = Document::parse(text);
    let font = ValidationContext::resolve_font(&document, cli.font);
    let mut context = ValidationContext::for_document(&document, font);
    if let Some(period) = cli.nabc_lines {
        context = context.with_alternation(AlternationConfig::with_period(period));
    }
    tracing::debug!(file = %file, font = %context.font, period = context.alternation.period, "linting");

    let analysis = gabc_syntax::analyze_with(document, context);
    let has_errors = analysis.has_errors();
    let total = analysis.diagnostics.len();

    let mut diagnostics: Vec<_> = analysis
        .diagnostics
        .into_iter()
        .filter(|d| !(cli.no_info && d.severity == Severity::Information))
        .collect();
    if cli.max_diagnostics > 0 && diagnostics.len() > cli.max_diagnostics {
        tracing::info!(file = %file, total, shown = cli.max_diagnostics, "diagnostics capped");
        diagnostics.truncate(cli.max_diagnostics);
    }

    FileReport {
        file,
        diagnostics,
        has_errors,
    }
}

/// File extensions picked up when a directory is given.
const SUPPORTED_EXTENSIONS: &[&str] = &["gabc"];

/// Resolve command-line inputs to score files: plain files, score
/// directories (searched recursively) and glob patterns.
fn collect_scores(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut scores = BTreeSet::new();
    for input in inputs {
        let path = Path::new(input);
        let found = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            scores_under(path)?
        } else {
            matching(input)?
        };
        if found.is_empty() {
            eprintln!("warning: no files matched: {}", input);
        }
        scores.extend(found);
    }
    Ok(scores.into_iter().collect())
}

fn scores_under(dir: &Path) -> Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let mut found = Vec::new();
    for ext in SUPPORTED_EXTENSIONS {
        found.extend(matching(&format!("{}/**/*.{}", root, ext))?);
    }
    Ok(found)
}

fn matching(pattern: &str) -> Result<Vec<PathBuf>> {
    Ok(glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect())
}
