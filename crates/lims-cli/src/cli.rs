//! CLI argument definitions for `lims`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lims_model::InputFormat;

#[derive(Parser)]
#[command(
    name = "lims",
    version,
    about = "Specimen quality gate - validate, process and reconcile lab sample batches",
    long_about = "Validate lab sample batches through a strict quality gate.\n\n\
                  Reads JSON record lists or XML sample trees, quarantines records\n\
                  that fail validation, categorizes the rest, simulates downstream\n\
                  acknowledgments and keeps a checksummed audit trail."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Allow patient identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a batch through intake, processing and reconciliation.
    Run(RunArgs),

    /// Print the CRC-32 content hash of a string.
    Checksum {
        /// Text to hash (UTF-8).
        text: String,
    },
}

#[derive(Parser)]
pub struct RunArgs {
    /// Batch file (.json record list or .xml sample tree).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format (default: inferred from the file extension).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// SLA threshold in milliseconds (overrides the config file).
    #[arg(long = "sla-ms", value_name = "MS")]
    pub sla_ms: Option<u32>,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to write audit.csv and audit.json into.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Stop after processing; skip acknowledgment simulation.
    #[arg(long = "no-reconcile")]
    pub no_reconcile: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// JSON array of record objects.
    List,
    /// XML document of <sample> elements.
    Tree,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::List => InputFormat::List,
            FormatArg::Tree => InputFormat::Tree,
        }
    }
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
