/*!
 * JSON writer implementation for drivescan
 *
 * Serializes the scan result plus a metadata envelope. Spreadsheet-side
 * formatting is left to whatever consumes this file.
 */

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use crate::error::Result;
use crate::scanner::ScanStatistics;
use crate::types::ScanResult;

/// Metadata recorded alongside the scan result
#[derive(Debug, Serialize)]
struct ScanEnvelope<'a> {
    /// Export timestamp
    timestamp: String,
    /// Hostname of the machine that ran the scan
    hostname: String,
    /// Logical path of the scan root
    root: &'a str,
    /// Depth bound used for the scan
    max_depth: usize,
    /// Number of folders listed
    folders_listed: usize,
    /// Number of subtrees skipped after listing failures
    skipped_subtrees: usize,
    /// Whether the scan was cancelled before completing
    cancelled: bool,
    /// The scan result itself
    result: &'a ScanResult,
}

/// JSON writer for scan results
pub struct JsonWriter {
    /// Output file path
    output_file: PathBuf,
    /// Depth bound, echoed into the envelope
    max_depth: usize,
}

impl JsonWriter {
    /// Create a new JSON writer
    pub fn new(output_file: PathBuf, max_depth: usize) -> Self {
        Self {
            output_file,
            max_depth,
        }
    }

    /// Write the scan result to the output file
    pub fn write(
        &self,
        root: &str,
        result: &ScanResult,
        statistics: &ScanStatistics,
    ) -> Result<()> {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let envelope = ScanEnvelope {
            timestamp: Local::now().to_rfc3339(),
            hostname,
            root,
            max_depth: self.max_depth,
            folders_listed: statistics.folders_listed,
            skipped_subtrees: statistics.skipped.len(),
            cancelled: statistics.cancelled,
            result,
        };

        let file = File::create(&self.output_file)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &envelope)?;
        Ok(())
    }
}
