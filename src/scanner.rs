/*!
 * Bounded-depth tree scanning and size aggregation
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use indicatif::ProgressBar;

use crate::noise::NoisePredicate;
use crate::source::ChildLister;
use crate::types::{Item, NodeId, ScanResult};

/// One subtree that was skipped because its listing failed
#[derive(Debug, Clone)]
pub struct SkippedSubtree {
    /// Node whose listing failed
    pub node: NodeId,
    /// Logical path of the node within the scan
    pub path: String,
    /// Failure reason as reported by the listing source
    pub reason: String,
}

/// Scanner statistics
#[derive(Debug, Clone, Default)]
pub struct ScanStatistics {
    /// Number of folders whose children were listed
    pub folders_listed: usize,
    /// Number of files retained in the result
    pub files_found: usize,
    /// Number of entries excluded by the noise predicate
    pub noise_skipped: usize,
    /// Number of folders left unexpanded by the depth bound
    pub depth_truncated: usize,
    /// Subtrees skipped because their listing failed, one entry per node
    pub skipped: Vec<SkippedSubtree>,
    /// Whether the scan stopped early on a cancellation signal
    pub cancelled: bool,
}

/// One pending folder expansion on the work list
struct WorkEntry {
    id: NodeId,
    path: String,
    depth: usize,
}

/// Scanner for hierarchical drive contents
///
/// Walks the tree reachable from a root node through a [`ChildLister`],
/// bounded by `max_depth` folder levels below the root. A failed listing
/// skips that subtree and the scan continues with siblings; cancellation
/// stops new listings and returns the partial result accumulated so far.
///
/// The scanner holds no state between invocations beyond its shared
/// statistics, which are reset at the start of each `scan`.
pub struct TreeScanner<'a, L> {
    /// Listing capability
    pub(crate) source: &'a L,
    /// Noise predicate applied to every listed entry
    pub(crate) noise: &'a dyn NoisePredicate,
    /// Maximum number of folder levels below the root to expand
    pub(crate) max_depth: usize,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Cancellation flag, shared with the caller
    pub(crate) cancel: Arc<AtomicBool>,
    /// Scanner statistics
    pub(crate) statistics: Arc<Mutex<ScanStatistics>>,
}

impl<'a, L: ChildLister> TreeScanner<'a, L> {
    /// Create a new scanner
    pub fn new(source: &'a L, noise: &'a dyn NoisePredicate, max_depth: usize) -> Self {
        Self {
            source,
            noise,
            max_depth,
            progress: Arc::new(ProgressBar::hidden()),
            cancel: Arc::new(AtomicBool::new(false)),
            statistics: Arc::new(Mutex::new(ScanStatistics::default())),
        }
    }

    /// Use the given progress bar for per-file progress updates
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Share the given cancellation flag; setting it stops the scan after
    /// the listing currently in flight
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get scanner statistics
    pub fn get_statistics(&self) -> ScanStatistics {
        self.statistics.lock().unwrap().clone()
    }

    /// The cancellation flag observed by this scanner
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Scan the tree under the root node and return the aggregate result
    ///
    /// `root_path` is the logical path recorded as the parent of the root's
    /// direct file children.
    pub fn scan(&self, root_id: &NodeId, root_path: &str) -> ScanResult {
        *self.statistics.lock().unwrap() = ScanStatistics::default();
        self.scan_from(root_id.clone(), root_path.to_string(), 0)
    }

    /// Walk the subtree rooted at one folder node
    ///
    /// Used directly by the parallel variant to fan sibling subtrees out to
    /// workers; each call owns its result, so no locking on the way down.
    pub(crate) fn scan_from(&self, id: NodeId, path: String, depth: usize) -> ScanResult {
        let mut result = ScanResult::new();
        let mut work = vec![WorkEntry { id, path, depth }];

        while let Some(entry) = work.pop() {
            if self.cancel.load(Ordering::Relaxed) {
                self.statistics.lock().unwrap().cancelled = true;
                break;
            }

            let children = match self.source.list_children(&entry.id) {
                Ok(children) => children,
                Err(e) => {
                    eprintln!("Warning: skipping subtree at {}: {}", entry.path, e);
                    self.statistics.lock().unwrap().skipped.push(SkippedSubtree {
                        node: entry.id.clone(),
                        path: entry.path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            self.statistics.lock().unwrap().folders_listed += 1;

            for mut child in children {
                if self.noise.is_noise(&child) {
                    self.statistics.lock().unwrap().noise_skipped += 1;
                    continue;
                }

                // The scan owns logical paths; whatever the source put
                // here is replaced by the traversal's own notion.
                child.parent_path = entry.path.clone();

                if child.is_folder() {
                    if entry.depth + 1 <= self.max_depth {
                        let child_path = child.path();
                        work.push(WorkEntry {
                            id: child.id,
                            path: child_path,
                            depth: entry.depth + 1,
                        });
                    } else {
                        self.statistics.lock().unwrap().depth_truncated += 1;
                    }
                } else {
                    self.progress.inc(1);
                    self.set_progress_message(&child);
                    self.statistics.lock().unwrap().files_found += 1;
                    result.push_file(child);
                }
            }
        }

        result
    }

    /// Update the progress message to show the current file
    fn set_progress_message(&self, item: &Item) {
        // Truncate if too long to avoid display issues; cut on char
        // boundaries so multibyte names cannot panic the scan
        let name = &item.name;
        let char_count = name.chars().count();
        let display_name = if char_count > 40 {
            let tail: String = name.chars().skip(char_count - 37).collect();
            format!("...{}", tail)
        } else {
            name.clone()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));
    }
}
