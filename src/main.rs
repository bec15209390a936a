use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use tracing::info;

mod analysis;
mod config;
mod discovery;
mod graph;
mod ir;
mod registry;
mod report;

use analysis::LeakAnalyzer;
use config::Config;
use discovery::ExportFinder;
use ir::Unit;
use report::Reporter;

/// spannercheck - Find Cloud Spanner handles without a deferred cleanup
#[derive(Parser, Debug)]
#[command(name = "spannercheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory holding SSA exports
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target paths to scan (can be specified multiple times)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Output format (defaults to the config file, then terminal)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json/sarif formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Analyze functions of each unit in parallel
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Sarif,
}

impl From<OutputFormat> for report::ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => report::ReportFormat::Terminal,
            OutputFormat::Json => report::ReportFormat::Json,
            OutputFormat::Sarif => report::ReportFormat::Sarif,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("spannercheck v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;

    // Run analysis once
    let leak_count = run_analysis(&config, &cli)?;

    // Nonzero exit keeps CI builds honest
    if leak_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.target.is_empty() {
        config.targets = cli.target.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<usize> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;
    use std::time::Instant;

    let start_time = Instant::now();

    // Step 1: Discover SSA exports
    info!("Discovering SSA exports...");
    let finder = ExportFinder::new(config);
    let exports = finder.find_exports(&cli.path)?;

    info!("Found {} SSA exports to analyze", exports.len());

    if exports.is_empty() {
        println!("{}", "No SSA exports found.".yellow());
        return Ok(0);
    }

    // Step 2: Load units
    let units: Vec<Unit> = if cli.parallel {
        // Parallel loading mode
        println!(
            "{}",
            format!("⚡ Parallel mode: loading {} exports...", exports.len()).cyan()
        );
        exports
            .par_iter()
            .map(|path| {
                Unit::from_json_file(path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to load {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        // Sequential loading mode
        let pb = ProgressBar::new(exports.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );

        info!("Loading exports...");
        let mut units = Vec::with_capacity(exports.len());
        for path in &exports {
            let unit = Unit::from_json_file(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to load {}", path.display()))?;
            units.push(unit);
            pb.inc(1);
        }
        pb.finish_with_message("Loading complete");

        units
    };

    let load_time = start_time.elapsed();
    if cli.parallel {
        println!(
            "{}",
            format!(
                "⚡ Loaded {} exports in {:.2}s",
                exports.len(),
                load_time.as_secs_f64()
            )
            .green()
        );
    }

    // Step 3: Run the leak analysis
    info!("Scanning for undeferred handles...");
    let analyzer = LeakAnalyzer::new()
        .with_parallel(cli.parallel)
        .with_resources(config.resources.clone())
        .with_generated_markers(config.generated_markers.clone());

    let leaks = analyzer.analyze_units(&units);

    info!("Found {} undeferred handles", leaks.len());

    // Step 4: Report results
    let format = match &cli.format {
        Some(format) => format.clone().into(),
        None => parse_report_format(&config.report.format),
    };

    let reporter = Reporter::new(format, cli.output.clone())
        .with_functions(config.report.show_functions);
    reporter.report(&leaks)?;

    // Print timing
    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(leaks.len())
}

fn parse_report_format(s: &str) -> report::ReportFormat {
    match s.to_lowercase().as_str() {
        "json" => report::ReportFormat::Json,
        "sarif" => report::ReportFormat::Sarif,
        _ => report::ReportFormat::Terminal,
    }
}
