// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `genomedag`.
///
/// Every workflow option is optional here; unset flags fall back to the
/// config file and then to built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "genomedag",
    version,
    about = "Build and run the 1000 genomes population analysis job graph.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Genomedag.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Submit the job graph for execution.
    #[arg(short = 's', long)]
    pub submit: bool,

    /// Execution site name.
    #[arg(short = 'e', long = "execution-site", value_name = "STR")]
    pub exec_site: Option<String>,

    /// Dataset folder.
    #[arg(short = 'D', long, value_name = "NAME")]
    pub dataset: Option<String>,

    /// Data file with list of input data.
    #[arg(short = 'f', long, value_name = "PATH")]
    pub datafile: Option<PathBuf>,

    /// Use the shell variants of individuals, individuals_merge and sifting.
    #[arg(short = 'b', long = "bash-jobs")]
    pub use_bash: bool,

    /// Number of individuals jobs created for each chromosome.
    ///
    /// Clamped to the number of rows of the chromosome, so each job then
    /// processes one row.
    #[arg(short = 'i', long = "individuals-jobs", value_name = "N")]
    pub shards: Option<u64>,

    /// Source directory holding `bin/` and `data/`.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub src_path: Option<PathBuf>,

    /// Use Decaf to stage shard data through memory.
    #[arg(short = 'd', long, conflicts_with = "pmc")]
    pub decaf: bool,

    /// Use MPI cluster mode for shard and merge jobs.
    #[arg(short = 'c', long)]
    pub pmc: bool,

    /// Name of the run directory (default: `<name>-<unix time>`).
    #[arg(short = 'n', long, value_name = "STR")]
    pub dir_name: Option<String>,

    /// Directory listing the population files.
    #[arg(long, value_name = "PATH")]
    pub populations_dir: Option<PathBuf>,

    /// Seconds to block on each wait for a completed task.
    #[arg(long, value_name = "SECS")]
    pub wait_timeout: Option<u64>,

    /// Maximum concurrently running local processes.
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Write the job graph in Graphviz DOT format to this path.
    #[arg(long, value_name = "PATH")]
    pub dot: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GENOMEDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Build and validate the graph, print it, but don't submit anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
