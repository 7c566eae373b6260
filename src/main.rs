use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use circuit_migrate::{run, FileConfig, Registry, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "circuit-migrate", about = "Upgrade code that uses Circuit UI", version)]
struct Cli {
    /// Transform to run (see --list).
    #[arg(short, long, required_unless_present = "list")]
    transform: Option<String>,

    /// TypeScript, JavaScript or Flow. Repeat or separate with commas.
    ///
    /// Flow files are read with the TSX grammar, so Flow-only syntax such as
    /// `?string` makes that file fail and it is left untouched.
    #[arg(short, long, value_delimiter = ',', required_unless_present = "list")]
    language: Vec<String>,

    /// Regex for file or directory names to skip; node_modules is always skipped.
    #[arg(long)]
    ignore: Vec<String>,

    /// JSON file with `ignore` and `dry_run` settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report what would change without writing.
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Log every file.
    #[arg(short, long)]
    verbose: bool,

    /// List the available transforms and exit.
    #[arg(long)]
    list: bool,

    /// File or directory to migrate.
    #[arg(required_unless_present = "list")]
    path: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("circuit_migrate={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn list_transforms() {
    let registry = Registry::builtin();
    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);
    for t in registry.iter() {
        println!("{:width$}  {}", t.name(), t.description());
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    if cli.list {
        list_transforms();
        return Ok(ExitCode::SUCCESS);
    }

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let mut ignore = file_config.ignore;
    ignore.extend(cli.ignore);

    let options = RunOptions {
        transform: cli.transform.unwrap_or_default(),
        languages: cli.language,
        path: cli.path.unwrap_or_default(),
        ignore,
        dry_run: cli.dry_run || file_config.dry_run,
    };
    let report = run(&options)?;

    for diagnostic in report.diagnostics() {
        eprintln!("{diagnostic}");
    }
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialise run report")?;
        println!("{json}");
    }

    Ok(if report.has_failures() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
