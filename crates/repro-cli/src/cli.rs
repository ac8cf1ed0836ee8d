//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "repro-eval",
    version,
    about = "Reproducibility study analysis - tables and figures from raw evaluation outputs",
    long_about = "Compute the statistics behind the reproducibility study and render its\n\
                  markdown tables, prose inserts, and figures.\n\n\
                  Ingests the control and treatment evaluation outputs (results databases,\n\
                  archive metadata, timing files, timeout lists) and reconciles the two\n\
                  conditions by script identity."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full analysis over a raw data folder.
    Analyze(AnalyzeArgs),

    /// Fetch archive metadata for a dataset inventory.
    FetchMetadata(FetchArgs),

    /// List the error categories and their matching rules.
    Categories,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Folder containing the raw evaluation outputs.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Output directory for markdown inserts (default: <DATA_DIR>/md_inserts).
    #[arg(long = "inserts-dir", value_name = "DIR")]
    pub inserts_dir: Option<PathBuf>,

    /// Output directory for figures (default: <DATA_DIR>/figures).
    #[arg(long = "figures-dir", value_name = "DIR")]
    pub figures_dir: Option<PathBuf>,

    /// Skip figure rendering.
    #[arg(long = "skip-figures")]
    pub skip_figures: bool,
}

#[derive(Parser)]
pub struct FetchArgs {
    /// Newline-delimited dataset identifier list.
    #[arg(value_name = "DOI_LIST")]
    pub doi_list: PathBuf,

    /// Archive API base URL.
    #[arg(long = "api-url", value_name = "URL", default_value = repro_fetch::DEFAULT_API_URL)]
    pub api_url: String,

    /// Output metadata JSON (default: doi_metadata.json next to the list).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Side file recording failed identifiers (default:
    /// metadata_problem.txt next to the list).
    #[arg(long = "problem-file", value_name = "PATH")]
    pub problem_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
