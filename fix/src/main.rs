mod cli;

use auto_fix::{FixConfig, FixSummary, LlmRepairService, fix_errors, load_errors, read_credential};
use autofix_core::diagnostic::DiagnosticFormat;
use clap::Parser;
use cli::Args;
use directories::ProjectDirs;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .init();

    match run(args) {
        Ok(true) => {}
        // Some errors could not be fixed.
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Runs the whole pipeline. Returns whether every discovered error was fixed.
fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let dirs =
        ProjectDirs::from("", "", "autofix").ok_or("Could not determine config directory")?;
    if args.print_config_path {
        println!(
            "Config file location: {:?}",
            cli::config_file(dirs.config_dir())
        );
        return Ok(true);
    }

    let input = args.input.clone().ok_or("No input file given")?;
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }

    let mut config = cli::load_config(&args, dirs.config_dir())?;
    config.validate();

    // The credential is checked before any diagnostics are parsed.
    match read_credential(&config.api_key_env) {
        Ok(key) => config.repair.api_key = Some(key),
        Err(e) if config.require_api_key => return Err(e.into()),
        Err(_) => warn!(
            "{} not set, calling {} without a credential",
            config.api_key_env, config.repair.backend
        ),
    }

    let format = DiagnosticFormat::from(args.format);
    info!("AI Auto-Fix");
    info!("Input: {}", input.display());
    info!("Type: {format}");
    info!(
        "Mode: {}",
        if config.dry_run { "Dry Run" } else { "Apply Fixes" }
    );

    let errors = load_errors(format, &input)?;
    if errors.is_empty() {
        info!("No errors found to fix!");
        return Ok(true);
    }
    info!("Found {} error(s) to fix", errors.len());

    let mut fix_config = FixConfig::from_config(&config);
    fix_config.root = args.root.clone();
    let service = LlmRepairService::new(&config.repair, fix_config.timeout)?;

    let summary = fix_errors(errors, &service, &fix_config);
    print_summary(&summary);

    if let Some(ref path) = args.summary {
        summary.write_json(path)?;
        info!("Detailed summary saved to: {}", path.display());
    }

    Ok(summary.all_fixed())
}

fn print_summary(summary: &FixSummary) {
    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("  Fixed: {}", summary.fixed);
    info!("  Failed: {}", summary.failed);
    info!(
        "  Duration: {}s",
        (summary.end_time - summary.start_time).num_seconds()
    );
    info!("{}", "=".repeat(60));
}
