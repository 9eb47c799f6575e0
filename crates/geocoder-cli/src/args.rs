use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for geocoder-cli
#[derive(Debug, Parser)]
#[command(
    name = "geocoder",
    version,
    about = "Build, inspect and query hierarchical geocoder indexes"
)]
pub struct CliArgs {
    /// JSON config file with geocoder settings (beam_size, max_results, load_threads)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a JSON Lines hierarchy and write a binary index
    Build {
        /// Hierarchy in JSON Lines, optionally gzip-compressed (.gz)
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Where to write the binary index
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Parse workers (default: from config, else all cores)
        #[arg(short = 't', long = "threads")]
        threads: Option<usize>,
    },

    /// Geocode a free-text query against a binary index
    Query {
        /// Binary index built with `build`
        #[arg(long = "index")]
        index: PathBuf,

        /// Maximum number of results to print
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,

        /// Query words, e.g. `84 Main Street Springfield`
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show a summary of a binary index
    Stats {
        /// Binary index built with `build`
        #[arg(long = "index")]
        index: PathBuf,
    },
}
