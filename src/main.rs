//! recbench CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use recbench::config::cli::{Cli, Command, ReadArgs};
use recbench::config::{toml as config_toml, validator, Config};
use recbench::coordinator::Session;
use recbench::output::{self, json, text};
use recbench::target::DatasetWriter;
use recbench::worker::Workload;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = config_toml::load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Lookup(args) => run_read(&cli, Workload::Lookup, args, &mut config),
        Command::Scan(args) => {
            config_toml::merge_scan_args(args, &mut config)?;
            run_read(&cli, Workload::Scan, &args.read, &mut config)
        }
        Command::Write(args) => {
            config_toml::merge_write_args(args, &mut config.write)?;
            run_write(&cli, &config)
        }
    }
}

/// RUST_LOG wins; otherwise warn, or info with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn run_read(cli: &Cli, workload: Workload, args: &ReadArgs, config: &mut Config) -> Result<()> {
    config_toml::merge_read_args(args, &mut config.workload)?;

    validator::validate_workload(&config.workload).context("Configuration validation failed")?;
    if workload == Workload::Scan {
        for warning in validator::scan_warnings(&config.scan) {
            tracing::warn!("{}", warning);
        }
    }

    let session = Session::new(workload, &config.workload, &config.scan)
        .with_context(|| format!("Failed to prepare {} session", workload))?;
    if config.workload.block_size.is_none() {
        if let Some(warning) = validator::unaligned_record_warning(
            session.buffered(),
            session.record_size(),
            session.block_size(),
        ) {
            tracing::warn!("{}", warning);
        }
    }

    let arguments = output::session_arguments(&session);
    if cli.dry_run {
        print!("{}", text::render_arguments(&arguments));
        println!("dry run: configuration is valid");
        return Ok(());
    }

    let stats = session
        .run()
        .with_context(|| format!("{} session failed", workload))?;

    text::print_report(&arguments, &stats);

    if let Some(ref path) = cli.json_output {
        let report = json::SessionReport::new(workload, &arguments, &stats);
        json::write_json_output(path, &report, true)?;
        tracing::info!(path = %path.display(), "wrote JSON report");
    }

    Ok(())
}

fn run_write(cli: &Cli, config: &Config) -> Result<()> {
    let write = &config.write;
    validator::validate_write(write).context("Configuration validation failed")?;

    let arguments = vec![
        ("dir".to_string(), write.dir.display().to_string()),
        ("total-size".to_string(), write.total_size.to_string()),
        ("file-size".to_string(), write.file_size.to_string()),
        ("sequential".to_string(), write.sequential.to_string()),
    ];
    print!("{}", text::render_arguments(&arguments));

    if cli.dry_run {
        println!("dry run: configuration is valid");
        return Ok(());
    }

    let writer = DatasetWriter::new(&write.dir, write.total_size, write.file_size, write.sequential)
        .with_context(|| format!("Failed to prepare {}", write.dir.display()))?;
    let files = writer.write().context("Failed to write dataset")?;
    print!("{}", text::render_written(&files));
    Ok(())
}
