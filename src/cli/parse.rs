//! CLI parse: clap types for smconfig. No behavior; definitions only.

use crate::jumpstart::ModelScope;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// smconfig - Debugger rule and JumpStart model configuration
#[derive(Parser)]
#[command(name = "smconfig")]
#[command(about = "Build debugger/profiler rule requests and resolve JumpStart model URIs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Settings file path (overrides layered settings loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List built-in debugger and profiler rules
    Rules,
    /// Print the request fragment for a built-in debugger rule
    DebuggerRule {
        /// Built-in rule name, e.g. VanishingGradient
        name: String,
        /// Rule configuration name (defaults to the built-in name)
        #[arg(long)]
        rule_name: Option<String>,
        #[arg(long)]
        s3_output_path: Option<String>,
        #[arg(long)]
        local_path: Option<String>,
        /// Output path of another trial to compare against (repeatable)
        #[arg(long = "other-trial")]
        other_trials: Vec<String>,
        /// Rule parameter override as KEY=VALUE (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,
    },
    /// Print the request fragment for a built-in profiler rule
    ProfilerRule {
        /// Built-in rule name, e.g. ProfilerReport
        name: String,
        #[arg(long)]
        rule_name: Option<String>,
        #[arg(long)]
        s3_output_path: Option<String>,
        #[arg(long)]
        local_path: Option<String>,
    },
    /// Resolve the S3 URI of a JumpStart model artifact
    ModelUri {
        /// Catalog JSON file (defaults to jumpstart.catalog_path)
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        model_id: String,
        #[arg(long)]
        model_version: String,
        #[arg(long, value_enum)]
        scope: Option<ModelScope>,
        /// Region (defaults to jumpstart.region)
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        tolerate_vulnerable: bool,
        #[arg(long)]
        tolerate_deprecated: bool,
    },
    /// Print the effective settings as TOML
    Settings,
}
