/*!
 * Tests for drivescan functionality
 */

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tempfile::tempdir;

use crate::config::Config;
use crate::noise::{KeepAll, NoiseFilter};
use crate::scanner::TreeScanner;
use crate::source::local::LocalDrive;
use crate::source::{ChildLister, ListError, ListResult};
use crate::types::{Item, NodeId, ScanResult};
use crate::utils::count_files;

/// In-memory listing source with deterministic failure injection
struct FixtureTree {
    children: HashMap<NodeId, Vec<Item>>,
    failing: HashSet<NodeId>,
}

impl FixtureTree {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    fn add(&mut self, parent: &str, items: Vec<Item>) {
        self.children.insert(NodeId::from(parent), items);
    }

    fn fail(&mut self, node: &str) {
        self.failing.insert(NodeId::from(node));
    }
}

impl ChildLister for FixtureTree {
    fn list_children(&self, id: &NodeId) -> ListResult<Vec<Item>> {
        if self.failing.contains(id) {
            return Err(ListError::Transient {
                node: id.clone(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(self.children.get(id).cloned().unwrap_or_default())
    }
}

// The concrete tree from the depth-bound scenario: root `R` holds folder `A`
// (file f1, 1000 bytes) and file f2 (500 bytes); `A` holds subfolder `B`
// (file f3, 2000 bytes).
fn scenario_tree() -> FixtureTree {
    let mut tree = FixtureTree::new();
    tree.add(
        "R",
        vec![Item::folder("A", "A"), Item::file("f2", "f2", 500)],
    );
    tree.add(
        "A",
        vec![Item::folder("B", "B"), Item::file("f1", "f1", 1000)],
    );
    tree.add("B", vec![Item::file("f3", "f3", 2000)]);
    tree
}

fn file_paths(result: &ScanResult) -> HashSet<String> {
    result.files.iter().map(|f| f.path()).collect()
}

// Helper function to create a test directory structure
fn setup_test_directory() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;

    fs::create_dir(temp_dir.path().join("dir1"))?;
    fs::create_dir(temp_dir.path().join("dir2"))?;
    fs::create_dir(temp_dir.path().join("dir1").join("subdir"))?;

    let mut file1 = File::create(temp_dir.path().join("file1.txt"))?;
    file1.write_all(&[0u8; 100])?;

    let mut file2 = File::create(temp_dir.path().join("dir1").join("file2.txt"))?;
    file2.write_all(&[0u8; 200])?;

    let mut file3 = File::create(
        temp_dir
            .path()
            .join("dir1")
            .join("subdir")
            .join("file3.txt"),
    )?;
    file3.write_all(&[0u8; 300])?;

    // Noise entries that must never be retained
    let mut thumbs = File::create(temp_dir.path().join("dir2").join("Thumbs.db"))?;
    thumbs.write_all(&[0u8; 4096])?;
    let mut lock = File::create(temp_dir.path().join("~$report.xlsx"))?;
    lock.write_all(&[0u8; 64])?;
    fs::create_dir(temp_dir.path().join(".cache"))?;
    let mut cached = File::create(temp_dir.path().join(".cache").join("blob"))?;
    cached.write_all(&[0u8; 9999])?;

    Ok(temp_dir)
}

// Test that every reachable file is found exactly once and the folder map
// balances against the file list
#[test]
fn test_full_scan_counts_all_files() {
    let tree = scenario_tree();
    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 8);

    let result = scanner.scan(&NodeId::from("R"), "R");

    assert_eq!(result.file_count(), 3);
    assert_eq!(
        file_paths(&result),
        HashSet::from(["R/f2".to_string(), "R/A/f1".to_string(), "R/A/B/f3".to_string()])
    );
    // Immediate-parent aggregation never double-counts
    assert_eq!(
        result.folder_sizes.values().sum::<u64>(),
        result.total_file_size()
    );

    let stats = scanner.get_statistics();
    assert_eq!(stats.files_found, 3);
    assert_eq!(stats.folders_listed, 3);
    assert!(stats.skipped.is_empty());
    assert!(!stats.cancelled);
}

// Test the depth bound: max_depth = 1 keeps f1 and f2 but never lists B
#[test]
fn test_depth_bound_scenario() {
    let tree = scenario_tree();
    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 1);

    let result = scanner.scan(&NodeId::from("R"), "R");

    assert_eq!(
        file_paths(&result),
        HashSet::from(["R/f2".to_string(), "R/A/f1".to_string()])
    );
    assert_eq!(
        result.folder_sizes,
        HashMap::from([("R".to_string(), 500), ("R/A".to_string(), 1000)])
    );
    assert_eq!(scanner.get_statistics().depth_truncated, 1);
}

// Test that max_depth = 0 yields only the root's direct file children
#[test]
fn test_depth_zero_only_root_files() {
    let tree = scenario_tree();
    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 0);

    let result = scanner.scan(&NodeId::from("R"), "R");

    assert_eq!(file_paths(&result), HashSet::from(["R/f2".to_string()]));
    assert_eq!(scanner.get_statistics().folders_listed, 1);
}

// Test that a failed listing skips exactly that subtree and nothing else
#[test]
fn test_failed_subtree_is_skipped() {
    let mut tree = scenario_tree();
    tree.fail("A");
    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 8);

    let result = scanner.scan(&NodeId::from("R"), "R");

    // The failed subtree is fully absent; its sibling file is intact
    assert_eq!(file_paths(&result), HashSet::from(["R/f2".to_string()]));

    // Exactly one warning, referencing the failed node
    let stats = scanner.get_statistics();
    assert_eq!(stats.skipped.len(), 1);
    assert_eq!(stats.skipped[0].node, NodeId::from("A"));
    assert_eq!(stats.skipped[0].path, "R/A");
}

// Test idempotence against a deterministic source
#[test]
fn test_scan_is_idempotent() {
    let tree = scenario_tree();
    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 8);

    let first = scanner.scan(&NodeId::from("R"), "R");
    let second = scanner.scan(&NodeId::from("R"), "R");

    assert_eq!(file_paths(&first), file_paths(&second));
    assert_eq!(first.folder_sizes, second.folder_sizes);
}

// Test that noise entries are invisible to both the file list and the map
#[test]
fn test_noise_files_never_counted() {
    let mut tree = FixtureTree::new();
    tree.add(
        "R",
        vec![
            Item::file("f1", "report.docx", 700),
            Item::file("t1", "~temp.tmp", 123),
            Item::folder("junk", ".cache"),
        ],
    );
    tree.add("junk", vec![Item::file("c1", "blob", 9999)]);

    let noise = NoiseFilter::new();
    let scanner = TreeScanner::new(&tree, &noise, 8);
    let result = scanner.scan(&NodeId::from("R"), "R");

    assert_eq!(file_paths(&result), HashSet::from(["R/report.docx".to_string()]));
    assert_eq!(result.folder_sizes, HashMap::from([("R".to_string(), 700)]));
    // The noise folder was pruned, not just its contents filtered
    assert_eq!(scanner.get_statistics().folders_listed, 1);
    assert_eq!(scanner.get_statistics().noise_skipped, 2);
}

// Test that a pre-set cancellation flag stops the scan before any listing
#[test]
fn test_cancellation_returns_partial_result() {
    let tree = scenario_tree();
    let noise = KeepAll;
    let cancel = Arc::new(AtomicBool::new(true));
    let scanner = TreeScanner::new(&tree, &noise, 8).with_cancel_flag(Arc::clone(&cancel));

    let result = scanner.scan(&NodeId::from("R"), "R");

    assert!(result.is_empty());
    let stats = scanner.get_statistics();
    assert!(stats.cancelled);
    assert_eq!(stats.folders_listed, 0);
}

// Test that the parallel variant merges to the same totals as sequential
#[test]
fn test_parallel_matches_sequential() {
    let tree = scenario_tree();
    let noise = KeepAll;

    let sequential = TreeScanner::new(&tree, &noise, 8).scan(&NodeId::from("R"), "R");
    let parallel = TreeScanner::new(&tree, &noise, 8).scan_parallel(&NodeId::from("R"), "R");

    assert_eq!(file_paths(&sequential), file_paths(&parallel));
    assert_eq!(sequential.folder_sizes, parallel.folder_sizes);
    assert_eq!(sequential.total_file_size(), parallel.total_file_size());
}

// Test that a cancelled parallel scan also sets the flag and stays consistent
#[test]
fn test_parallel_cancellation() {
    let tree = scenario_tree();
    let noise = KeepAll;
    let cancel = Arc::new(AtomicBool::new(true));
    let scanner = TreeScanner::new(&tree, &noise, 8).with_cancel_flag(cancel);

    let result = scanner.scan_parallel(&NodeId::from("R"), "R");

    assert!(result.is_empty());
    assert!(scanner.get_statistics().cancelled);
}

// Test merge semantics directly: sizes sum by key, files concatenate
#[test]
fn test_merge_sums_folder_sizes() {
    let mut left = ScanResult::new();
    let mut f1 = Item::file("f1", "f1", 100);
    f1.parent_path = "R".to_string();
    left.push_file(f1);

    let mut right = ScanResult::new();
    let mut f2 = Item::file("f2", "f2", 250);
    f2.parent_path = "R".to_string();
    right.push_file(f2);
    let mut f3 = Item::file("f3", "f3", 50);
    f3.parent_path = "R/A".to_string();
    right.push_file(f3);

    left.merge(right);

    assert_eq!(left.file_count(), 3);
    assert_eq!(
        left.folder_sizes,
        HashMap::from([("R".to_string(), 350), ("R/A".to_string(), 50)])
    );
}

// Test the transitive roll-up post-pass
#[test]
fn test_rolled_up_sizes() {
    let tree = scenario_tree();
    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 8);
    let result = scanner.scan(&NodeId::from("R"), "R");

    let rolled = result.rolled_up_sizes("R");
    assert_eq!(rolled.get("R"), Some(&3500));
    assert_eq!(rolled.get("R/A"), Some(&3000));
    assert_eq!(rolled.get("R/A/B"), Some(&2000));
    // The stored map stays immediate-parent only
    assert_eq!(result.folder_sizes.get("R"), Some(&500));
}

// Test that the roll-up never produces folders above the scan root, even
// when the root is an absolute path
#[test]
fn test_rolled_up_sizes_stops_at_root() {
    let mut tree = FixtureTree::new();
    tree.add(
        "share",
        vec![Item::folder("docs", "docs"), Item::file("f1", "f1", 1000)],
    );
    tree.add("docs", vec![Item::file("f2", "f2", 200)]);

    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 8);
    let root = "/data/share";
    let result = scanner.scan(&NodeId::from("share"), root);

    let rolled = result.rolled_up_sizes(root);
    assert_eq!(
        rolled,
        HashMap::from([
            ("/data/share".to_string(), 1200),
            ("/data/share/docs".to_string(), 200),
        ])
    );
    // No ancestor of the root leaks into the totals
    assert!(rolled.keys().all(|k| k.len() >= root.len()));
}

// Test that long multibyte file names survive the scan intact
#[test]
fn test_multibyte_file_names() {
    let mut tree = FixtureTree::new();
    // Both below and above the display-truncation threshold
    tree.add(
        "R",
        vec![
            Item::file("short", "é".repeat(25), 100),
            Item::file("long", "é".repeat(45), 200),
        ],
    );

    let noise = KeepAll;
    let scanner = TreeScanner::new(&tree, &noise, 1);
    let result = scanner.scan(&NodeId::from("R"), "R");

    assert_eq!(result.file_count(), 2);
    assert_eq!(result.total_file_size(), 300);
}

// Test scanning an actual directory tree through the local drive source
#[test]
fn test_local_drive_scan() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;

    let source = LocalDrive::new(temp_dir.path());
    let noise = NoiseFilter::new();
    let scanner = TreeScanner::new(&source, &noise, 8);

    let root_path = temp_dir.path().to_string_lossy().to_string();
    let result = scanner.scan(&source.root_id(), &root_path);

    let names: HashSet<String> = result.files.iter().map(|f| f.name.clone()).collect();
    assert_eq!(
        names,
        HashSet::from([
            "file1.txt".to_string(),
            "file2.txt".to_string(),
            "file3.txt".to_string(),
        ])
    );
    assert_eq!(result.total_file_size(), 600);
    assert_eq!(result.folder_sizes.values().sum::<u64>(), 600);

    // Noise artifacts contributed nothing
    assert!(!names.contains("Thumbs.db"));
    assert!(!names.contains("~$report.xlsx"));
    Ok(())
}

// Test that the local source reports a missing folder as a skippable error
#[test]
fn test_local_drive_missing_folder() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let source = LocalDrive::new(temp_dir.path());
    let missing = NodeId::new(
        temp_dir
            .path()
            .join("does-not-exist")
            .to_string_lossy()
            .to_string(),
    );

    assert!(source.list_children(&missing).is_err());

    // A scan over the missing node degrades to a skip, not a panic
    let noise = NoiseFilter::new();
    let scanner = TreeScanner::new(&source, &noise, 2);
    let result = scanner.scan(&missing, "gone");
    assert!(result.is_empty());
    assert_eq!(scanner.get_statistics().skipped.len(), 1);
    Ok(())
}

// Test that the progress pre-count agrees with what the scan retains
#[test]
fn test_count_files_matches_scan() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;

    let config = Config {
        root: temp_dir.path().to_path_buf(),
        max_depth: 8,
        noise_patterns: vec![],
        num_threads: 1,
        parallel: false,
        timeout_secs: None,
        top: 10,
        output_file: None,
    };

    let counted = count_files(temp_dir.path(), &config)?;

    let source = LocalDrive::new(temp_dir.path());
    let noise = NoiseFilter::new();
    let scanner = TreeScanner::new(&source, &noise, 8);
    let root_path = temp_dir.path().to_string_lossy().to_string();
    let result = scanner.scan(&source.root_id(), &root_path);

    assert_eq!(counted, result.file_count() as u64);
    Ok(())
}

// Test that an extreme depth bound does not overflow the pre-count walk
#[test]
fn test_count_files_unbounded_depth() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;

    let config = Config {
        root: temp_dir.path().to_path_buf(),
        max_depth: usize::MAX,
        noise_patterns: vec![],
        num_threads: 1,
        parallel: false,
        timeout_secs: None,
        top: 10,
        output_file: None,
    };

    assert_eq!(count_files(temp_dir.path(), &config)?, 3);
    Ok(())
}

// Test custom noise patterns layered over the defaults
#[test]
fn test_custom_noise_patterns() {
    let mut tree = FixtureTree::new();
    tree.add(
        "R",
        vec![
            Item::file("a", "keep.txt", 10),
            Item::file("b", "drop.iso", 20),
        ],
    );

    let noise = NoiseFilter::with_patterns(vec!["*.iso".to_string()]);
    let scanner = TreeScanner::new(&tree, &noise, 1);
    let result = scanner.scan(&NodeId::from("R"), "R");

    assert_eq!(file_paths(&result), HashSet::from(["R/keep.txt".to_string()]));
}

// Test human-readable size formatting
#[test]
fn test_format_file_size() {
    use crate::utils::format_file_size;

    assert_eq!(format_file_size(512), "512 bytes");
    assert_eq!(format_file_size(2048), "2.00 KB");
    assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
}
