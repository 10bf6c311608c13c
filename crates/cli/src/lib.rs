use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use unitshift_rewrite::selftest;
use unitshift_rewrite::{RewriteConfig, UnitSymbolTable};

pub mod driver;
pub mod report;
pub mod scanner;

use driver::Driver;
use report::RunSummary;
use scanner::{ScanOptions, SourceScanner};

#[derive(Parser, Debug)]
#[command(name = "unitshift")]
#[command(about = "Migrate C++ sources from the units library to mp-units", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Files or directories to convert
    #[arg(required_unless_present = "self_test")]
    paths: Vec<PathBuf>,

    /// Run the built-in behavioral cases instead of converting files
    #[arg(long)]
    self_test: bool,

    /// Report what would change without writing files
    #[arg(long)]
    dry_run: bool,

    /// TOML file overriding sections of the unit symbol table
    #[arg(long, value_name = "TOML")]
    symbols: Option<PathBuf>,

    /// Never assume a capitalized identifier is a unit template argument
    #[arg(long)]
    no_assume_units: bool,

    /// Warn about units includes that are missing or unused
    #[arg(long)]
    check_includes: bool,

    /// Convert files outside native/cpp/include directories too
    #[arg(long)]
    all_dirs: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

pub fn main_entry() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if cli.self_test {
        return run_self_test(&cli);
    }
    run_conversions(&cli)
}

fn run_self_test(cli: &Cli) -> Result<ExitCode> {
    log::info!("Running tests");
    let reports = selftest::run_all();
    if cli.json {
        print_stdout(&serde_json::to_string_pretty(&reports)?)?;
    } else {
        print_stdout(&report::render_self_test(&reports))?;
    }
    if reports.iter().all(|r| r.passed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn build_config(cli: &Cli) -> Result<RewriteConfig> {
    let mut config = RewriteConfig::default();
    if let Some(path) = &cli.symbols {
        config.symbols = UnitSymbolTable::load(path)
            .with_context(|| format!("Failed to load symbol table {}", path.display()))?;
    }
    config.assume_capitalized_units = !cli.no_assume_units;
    config.check_includes = cli.check_includes;
    Ok(config)
}

fn run_conversions(cli: &Cli) -> Result<ExitCode> {
    log::info!("Running conversions");
    let start = Instant::now();
    let driver = Driver::new(build_config(cli)?, cli.dry_run)?;

    let options = ScanOptions {
        require_source_dir: !cli.all_dirs,
        ..Default::default()
    };
    let scan = SourceScanner::new(options).scan(&cli.paths);
    let files = scan.files.iter().map(|path| driver.process(path)).collect();

    let summary = RunSummary::new(cli.dry_run, scan.skipped, files, start.elapsed().as_secs_f64());
    if cli.json {
        print_stdout(&serde_json::to_string_pretty(&summary)?)?;
    } else {
        print_stdout(&report::render_run(&summary))?;
    }
    Ok(ExitCode::SUCCESS)
}
