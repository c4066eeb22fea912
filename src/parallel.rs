/*!
 * Parallel scan variant
 *
 * Dispatches the root's folder subtrees to rayon workers. Each worker walks
 * its subtree into a private partial [`ScanResult`]; the partials are merged
 * at the end (folder sizes summed by key, file lists concatenated), so the
 * accumulating result is never shared mutable state. Worth it only against
 * a high-latency listing source; ordering guarantees are unchanged (none).
 */

use std::sync::atomic::Ordering;

use rayon::prelude::*;

use crate::scanner::{SkippedSubtree, TreeScanner};
use crate::types::{NodeId, ScanResult};

impl<L: crate::source::ChildLister> TreeScanner<'_, L> {
    /// Scan the tree under the root node, fanning root-level subtrees out
    /// to the rayon thread pool
    ///
    /// Produces the same file set and folder sizes as [`TreeScanner::scan`]
    /// for an unchanged tree. Cancellation stops workers from issuing new
    /// listings; whatever partials completed are still merged and returned.
    pub fn scan_parallel(&self, root_id: &NodeId, root_path: &str) -> ScanResult {
        *self.statistics.lock().unwrap() = Default::default();

        let mut result = ScanResult::new();
        if self.cancel.load(Ordering::Relaxed) {
            self.statistics.lock().unwrap().cancelled = true;
            return result;
        }

        // The root level is listed on the calling thread; only subtrees
        // are dispatched.
        let children = match self.source.list_children(root_id) {
            Ok(children) => children,
            Err(e) => {
                eprintln!("Warning: skipping subtree at {}: {}", root_path, e);
                self.statistics.lock().unwrap().skipped.push(SkippedSubtree {
                    node: root_id.clone(),
                    path: root_path.to_string(),
                    reason: e.to_string(),
                });
                return result;
            }
        };
        self.statistics.lock().unwrap().folders_listed += 1;

        let mut subtrees = Vec::new();
        for mut child in children {
            if self.noise.is_noise(&child) {
                self.statistics.lock().unwrap().noise_skipped += 1;
                continue;
            }
            child.parent_path = root_path.to_string();

            if child.is_folder() {
                if self.max_depth >= 1 {
                    let child_path = child.path();
                    subtrees.push((child.id, child_path));
                } else {
                    self.statistics.lock().unwrap().depth_truncated += 1;
                }
            } else {
                self.progress.inc(1);
                self.statistics.lock().unwrap().files_found += 1;
                result.push_file(child);
            }
        }

        let merged = subtrees
            .into_par_iter()
            .map(|(id, path)| self.scan_from(id, path, 1))
            .reduce(ScanResult::new, |mut acc, partial| {
                acc.merge(partial);
                acc
            });
        result.merge(merged);

        result
    }
}
