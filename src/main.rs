/*!
 * Command-line interface for drivescan
 */

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;

use drivescan::config::{Args, Config};
use drivescan::error::ResultExt;
use drivescan::noise::NoiseFilter;
use drivescan::report::{ReportFormat, Reporter, ScanReport};
use drivescan::scanner::TreeScanner;
use drivescan::source::local::LocalDrive;
use drivescan::utils::count_files;
use drivescan::writer::JsonWriter;

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Emit shell completions and exit if requested
    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "drivescan", &mut io::stdout());
        return Ok(());
    }

    // Create configuration
    let config = Config::from_args(args);

    // Validate configuration
    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        eprintln!("Warning: Failed to set thread pool size: {}", e);
    }

    // Create progress bar with steady tick so remote stalls stay visible
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
            .unwrap(),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Setup");
    progress.set_message(format!("📂 Scanning drive root: {}", config.root.display()));

    // Count files for progress tracking
    let total_files = match count_files(&config.root, &config) {
        Ok(count) => {
            progress.set_message(format!("🔎 Found {} files to process", count));
            count
        }
        Err(e) => {
            progress.set_message(format!("⚠️ Warning: Failed to count files: {}", e));
            0
        }
    };

    progress.set_length(total_files);
    progress.set_prefix("📊 Scanning");
    progress.set_message("Starting scan...");

    // Create the listing source and scanner
    let source = LocalDrive::new(config.root.clone());
    let noise = NoiseFilter::with_patterns(config.noise_patterns.clone());
    let cancel = Arc::new(AtomicBool::new(false));
    let scanner = TreeScanner::new(&source, &noise, config.max_depth)
        .with_progress(Arc::new(progress.clone()))
        .with_cancel_flag(Arc::clone(&cancel));

    // Arm the timeout, if any; the scan keeps partial results on expiry
    if let Some(secs) = config.timeout_secs {
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            cancel.store(true, Ordering::Relaxed);
        });
    }

    let root_id = source.root_id();
    let root_path = config.root.to_string_lossy().to_string();

    // Scan the tree
    let start_time = Instant::now();
    let result = if config.parallel {
        scanner.scan_parallel(&root_id, &root_path)
    } else {
        scanner.scan(&root_id, &root_path)
    };
    let duration = start_time.elapsed();

    // Clear the progress bar
    progress.finish_and_clear();

    let statistics = scanner.get_statistics();

    // Write JSON output if requested
    if let Some(output_file) = &config.output_file {
        let writer = JsonWriter::new(output_file.clone(), config.max_depth);
        writer
            .write(&root_path, &result, &statistics)
            .with_context(|| format!("Failed to write scan result to {}", output_file.display()))?;
    }

    // Prepare the scan report
    let scan_report = ScanReport {
        root: root_path,
        duration,
        statistics,
        result,
    };

    // Create a reporter and print the report
    let reporter = Reporter::new(ReportFormat::ConsoleTable, config.top);
    reporter.print_report(&scan_report);

    Ok(())
}
