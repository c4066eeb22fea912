/*!
 * Core types and data structures for the drivescan library
 */

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Opaque identifier used to request the children of a node from the
/// listing source. The scanner never interprets the payload; for the
/// built-in local drive source it happens to be an absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Whether an item is a file or a folder
///
/// Files carry their byte size; folders never do, their aggregate size is
/// derived during the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    /// A file with its size in bytes
    File {
        /// Size in bytes
        size: u64,
    },
    /// A folder whose children can be listed
    Folder,
}

/// One node produced by a listing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Identifier used to list this item's children (folders only, but
    /// the listing source assigns one to every entry it returns)
    pub id: NodeId,
    /// Entry name within its parent folder
    pub name: String,
    /// Logical path of the containing folder. Listing sources may leave
    /// this empty; the scanner assigns it from its own traversal state.
    pub parent_path: String,
    /// File-or-folder classification
    pub kind: ItemKind,
}

impl Item {
    /// Create a file item
    pub fn file(id: impl Into<NodeId>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_path: String::new(),
            kind: ItemKind::File { size },
        }
    }

    /// Create a folder item
    pub fn folder(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_path: String::new(),
            kind: ItemKind::Folder,
        }
    }

    /// Whether this item is a folder
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder)
    }

    /// Size in bytes for files, zero for folders
    pub fn size(&self) -> u64 {
        match self.kind {
            ItemKind::File { size } => size,
            ItemKind::Folder => 0,
        }
    }

    /// Logical path of the item itself (`parent_path` + `/` + `name`)
    pub fn path(&self) -> String {
        if self.parent_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.parent_path, self.name)
        }
    }
}

/// The aggregate output of one tree scan
///
/// `folder_sizes` maps each folder path to the summed size of the files it
/// *directly* contains. Transitive roll-up to ancestors is a post-pass; see
/// [`ScanResult::rolled_up_sizes`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Retained file items, in unspecified traversal order
    pub files: Vec<Item>,
    /// Folder path to cumulative size of directly contained files
    pub folder_sizes: HashMap<String, u64>,
}

impl ScanResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one retained file, charging its size to its immediate parent
    pub fn push_file(&mut self, item: Item) {
        let size = item.size();
        *self
            .folder_sizes
            .entry(item.parent_path.clone())
            .or_insert(0) += size;
        self.files.push(item);
    }

    /// Fold another partial result into this one: file lists are
    /// concatenated, folder sizes are summed by key.
    pub fn merge(&mut self, other: ScanResult) {
        self.files.extend(other.files);
        for (path, size) in other.folder_sizes {
            *self.folder_sizes.entry(path).or_insert(0) += size;
        }
    }

    /// Total size of all retained files
    pub fn total_file_size(&self) -> u64 {
        self.files.iter().map(|f| f.size()).sum()
    }

    /// Number of retained files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Whether the scan retained anything at all
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folder_sizes.is_empty()
    }

    /// Transitive roll-up: each folder's total includes every file at or
    /// below it, computed by charging each file to its path-prefix
    /// ancestors down to the scan root. Prefixes above `root` (the path
    /// the scan was seeded with) are never produced, so an absolute root
    /// does not leak `/`, `/data`, or `""` entries. The stored
    /// `folder_sizes` map stays immediate-parent only.
    pub fn rolled_up_sizes(&self, root: &str) -> HashMap<String, u64> {
        let mut totals: HashMap<String, u64> = HashMap::new();
        for file in &self.files {
            let size = file.size();
            let parent = &file.parent_path;
            let mut end = parent.len();
            loop {
                *totals.entry(parent[..end].to_string()).or_insert(0) += size;
                if end <= root.len() {
                    break;
                }
                match parent[..end].rfind('/') {
                    Some(pos) if pos >= root.len() => end = pos,
                    _ => break,
                }
            }
        }
        totals
    }
}
