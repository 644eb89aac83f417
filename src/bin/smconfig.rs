//! smconfig CLI Binary
//!
//! Builds debugger/profiler rule request fragments and resolves JumpStart
//! model artifact URIs from the command line.

use clap::Parser;
use smconfig::cli::{map_error, Cli, RunContext};
use smconfig::config::SettingsLoader;
use smconfig::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("smconfig starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading settings: {:#}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Precedence: CLI flags override the settings file, which overrides defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref path) => SettingsLoader::load_from_file(path),
        None => SettingsLoader::load(&cli.workspace),
    };
    let mut config = loaded.map(|s| s.logging).unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    config
}
