/*!
 * Reporting functionality for drivescan
 *
 * Provides functionality for generating formatted reports of scan results
 * using the tabled library for clean, consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::scanner::ScanStatistics;
use crate::types::ScanResult;
use crate::utils::format_file_size;

/// Statistics for a drive scan, ready for presentation
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Logical path of the scan root
    pub root: String,
    /// Time taken to scan
    pub duration: Duration,
    /// Scanner statistics
    pub statistics: ScanStatistics,
    /// The scan result itself
    pub result: ScanResult,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    // Other formats could be added in the future
}

/// Report generator for scan results
pub struct Reporter {
    format: ReportFormat,
    /// Number of rows in the top-files and top-folders tables
    top: usize,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat, top: usize) -> Self {
        Self { format, top }
    }

    /// Generate a report string based on the scan outcome
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Format path to be root-relative and truncate if needed
    fn format_path(&self, path: &str, root: &str, max_len: usize) -> String {
        let rel_path = path
            .strip_prefix(root)
            .map(|p| p.trim_start_matches('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(path);

        if rel_path.len() <= max_len {
            return rel_path.to_string();
        }

        // Keep the last few path segments
        let parts: Vec<&str> = rel_path.split('/').collect();
        let mut segments = Vec::new();
        let mut current_len = 3; // start with "..."

        for part in parts.iter().rev() {
            let part_len = part.len() + 1; // +1 for '/'
            if current_len + part_len <= max_len {
                segments.push(*part);
                current_len += part_len;
            } else {
                break;
            }
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let mut rows = vec![
            SummaryRow {
                key: "📂 Scan Root".to_string(),
                value: report.root.clone(),
            },
            SummaryRow {
                key: "⏱️ Scan Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Found".to_string(),
                value: stats.files_found.to_string(),
            },
            SummaryRow {
                key: "📁 Folders Listed".to_string(),
                value: stats.folders_listed.to_string(),
            },
            SummaryRow {
                key: "💾 Total Size".to_string(),
                value: format_file_size(report.result.total_file_size()),
            },
            SummaryRow {
                key: "🧹 Noise Skipped".to_string(),
                value: stats.noise_skipped.to_string(),
            },
        ];

        if stats.depth_truncated > 0 {
            rows.push(SummaryRow {
                key: "📏 Depth-Truncated Folders".to_string(),
                value: stats.depth_truncated.to_string(),
            });
        }

        if !stats.skipped.is_empty() {
            rows.push(SummaryRow {
                key: "⚠️ Skipped Subtrees".to_string(),
                value: stats.skipped.len().to_string(),
            });
        }

        if stats.cancelled {
            rows.push(SummaryRow {
                key: "🛑 Cancelled".to_string(),
                value: "scan stopped early; results are partial".to_string(),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a top-files table using the tabled crate
    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File")]
            path: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        // Sort files by size, largest first
        let mut files: Vec<_> = report.result.files.iter().collect();
        files.sort_by(|a, b| b.size().cmp(&a.size()));
        files.truncate(self.top);

        let rows: Vec<FileRow> = files
            .iter()
            .map(|item| FileRow {
                path: self.format_path(&item.path(), &report.root, 60),
                size: format_file_size(item.size()),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a top-folders table from the transitively rolled-up sizes
    fn create_folders_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FolderRow {
            #[tabled(rename = "Folder")]
            path: String,

            #[tabled(rename = "Total Size")]
            size: String,
        }

        let rolled_up = report.result.rolled_up_sizes(&report.root);
        let mut folders: Vec<_> = rolled_up.into_iter().collect();
        folders.sort_by(|(_, a), (_, b)| b.cmp(a));
        folders.truncate(self.top);

        let rows: Vec<FolderRow> = folders
            .iter()
            .map(|(path, size)| FolderRow {
                path: self.format_path(path, &report.root, 60),
                size: format_file_size(*size),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ScanReport) -> String {
        let files_table = self.create_files_table(report);
        let folders_table = self.create_folders_table(report);
        let summary_table = self.create_summary_table(report);

        let files_title = format!("📋  TOP {} LARGEST FILES", self.top);
        let folders_title = format!("🗂️  TOP {} LARGEST FOLDERS", self.top);
        let summary_title = if report.statistics.cancelled {
            "🛑  SCAN CANCELLED (PARTIAL RESULTS)"
        } else {
            "✅  SCAN COMPLETE"
        };

        format!(
            "{}\n{}\n\n{}\n{}\n\n{}\n{}",
            files_title, files_table, folders_title, folders_table, summary_title, summary_table
        )
    }
}
