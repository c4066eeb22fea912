/*!
 * Configuration handling for drivescan
 */

use std::io;
use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

/// Command-line arguments for drivescan
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "drivescan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scan a drive tree and aggregate per-folder sizes",
    long_about = "Walks a folder hierarchy up to a depth bound, skipping transient system \
                  artifacts, and reports the largest files and folders by cumulative size."
)]
pub struct Args {
    /// Root directory to scan
    #[clap(default_value = ".")]
    pub root: String,

    /// Maximum number of folder levels below the root to expand
    #[clap(long, default_value = "16")]
    pub max_depth: usize,

    /// Comma-separated list of extra glob patterns to treat as noise
    #[clap(long, value_delimiter = ',')]
    pub noise_patterns: Vec<String>,

    /// Number of threads to use for processing
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Dispatch root-level subtrees to parallel workers
    #[clap(long)]
    pub parallel: bool,

    /// Abandon the scan after this many seconds, keeping partial results
    #[clap(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Number of largest files/folders to show in the report
    #[clap(long, default_value = "10")]
    pub top: usize,

    /// Write the full scan result to this JSON file
    #[clap(long, value_name = "FILE")]
    pub output: Option<String>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Root directory to scan
    pub root: PathBuf,

    /// Maximum folder depth below the root
    pub max_depth: usize,

    /// Extra noise glob patterns
    pub noise_patterns: Vec<String>,

    /// Number of threads to use for processing
    pub num_threads: usize,

    /// Whether to use the parallel scan variant
    pub parallel: bool,

    /// Scan timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Number of rows in the top-files/top-folders tables
    pub top: usize,

    /// JSON output file path, if requested
    pub output_file: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            root: PathBuf::from(args.root),
            max_depth: args.max_depth,
            noise_patterns: args.noise_patterns,
            num_threads: args.threads,
            parallel: args.parallel,
            timeout_secs: args.timeout,
            top: args.top,
            output_file: args.output.map(PathBuf::from),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> io::Result<()> {
        // Check if the root directory exists and is readable
        if !self.root.exists() || !self.root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Root directory not found: {}", self.root.display()),
            ));
        }

        // Check if the output file directory exists and is writable
        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.exists() && parent != PathBuf::from("") {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Output directory not found: {}", parent.display()),
                    ));
                }
            }
        }

        if self.num_threads == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Thread count must be at least 1",
            ));
        }

        Ok(())
    }
}
