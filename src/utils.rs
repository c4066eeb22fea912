/*!
 * Utility functions for drivescan
 */

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::Config;
use crate::noise::{NoiseFilter, NoisePredicate};
use crate::types::Item;

/// Count files under a local root for progress tracking
///
/// Mirrors the scanner's own rules (depth bound, noise filter) so the
/// progress bar length matches what the scan will actually retain.
pub fn count_files(dir: &Path, config: &Config) -> io::Result<u64> {
    let filter = NoiseFilter::with_patterns(config.noise_patterns.clone());
    let mut count = 0;

    for entry in WalkDir::new(dir)
        .min_depth(1)
        // WalkDir depth counts the entry itself, so files inside a folder
        // at the scanner's max_depth sit at max_depth + 1
        .max_depth(config.max_depth.saturating_add(1))
        .into_iter()
        .filter_entry(|e| {
            // The root itself is never a noise candidate
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy().to_string();
            let probe = if e.file_type().is_dir() {
                Item::folder("", name)
            } else {
                Item::file("", name, 0)
            };
            !filter.is_noise(&probe)
        })
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if entry.file_type().is_file() {
            count += 1;
        }
    }

    Ok(count)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
