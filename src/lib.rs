/*!
 * drivescan - Bounded-depth scan of hierarchical drive storage
 *
 * Walks a folder hierarchy from a root node through a pluggable listing
 * capability, respecting a depth bound and a noise filter, and produces a
 * flat file list plus a folder-path to cumulative-size map.
 */

pub mod config;
pub mod error;
pub mod noise;
pub mod parallel;
pub mod report;
pub mod scanner;
pub mod source;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::Config;
pub use error::{DriveScanError, Result};
pub use noise::{NoiseFilter, NoisePredicate, DEFAULT_NOISE};
pub use report::{ReportFormat, Reporter, ScanReport};
pub use scanner::{ScanStatistics, SkippedSubtree, TreeScanner};
pub use source::{local::LocalDrive, ChildLister, ListError, ListResult};
pub use types::{Item, ItemKind, NodeId, ScanResult};
pub use utils::{count_files, format_file_size};
pub use writer::JsonWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
