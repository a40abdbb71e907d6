//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sharc",
    version,
    about = "Inspect, validate and repack SHARC shader archives",
    long_about = "Inspect, validate and repack SHARC shader archives.\n\n\
                  Supports schema versions 10 and 11 in either byte order."
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

    /// Log output format.
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
    /// Show the programs and sources of an archive.
    Info(InputArgs),

    /// Run the cross-reference checks and list every diagnostic.
    Check(CheckArgs),

    /// Write every shader source to a directory as UTF-8 text.
    Extract(ExtractArgs),

    /// Decode an archive and encode it again.
    Repack(RepackArgs),

    /// Print the decoded archive as JSON.
    Dump(DumpArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Archive to read.
    #[arg(value_name = "ARCHIVE")]
    pub input: PathBuf,

    /// Read the archive as big endian.
    #[arg(long = "big-endian")]
    pub big_endian: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Exit with an error when any warning-level diagnostic is found.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory (default: the archive path without its extension).
    #[arg(long = "output-dir", short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RepackArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path of the re-encoded archive.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Keep the stored archive name instead of renaming it to the output file stem.
    #[arg(long = "keep-name")]
    pub keep_name: bool,
}

#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Pretty-print the JSON output.
    #[arg(long = "pretty")]
    pub pretty: bool,
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
