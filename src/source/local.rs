//! Local-filesystem listing source
//!
//! Node identifiers are absolute paths, so no per-scan state is needed. A
//! failed `read_dir` or a failed metadata lookup surfaces as an error value;
//! the scanner decides what to do with it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::source::{ChildLister, ListError, ListResult};
use crate::types::{Item, NodeId};

/// `ChildLister` over a local directory tree
pub struct LocalDrive {
    root: PathBuf,
}

impl LocalDrive {
    /// Create a source rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Node identifier for the root directory, for seeding a scan
    pub fn root_id(&self) -> NodeId {
        NodeId::new(self.root.to_string_lossy().to_string())
    }

    fn entry_item(&self, path: &Path) -> ListResult<Option<Item>> {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => return Ok(None),
        };
        let id = NodeId::new(path.to_string_lossy().to_string());

        // symlink_metadata so links are not followed into cycles
        let metadata = fs::symlink_metadata(path)?;
        if metadata.is_dir() {
            Ok(Some(Item::folder(id, name)))
        } else if metadata.is_file() {
            Ok(Some(Item::file(id, name, metadata.len())))
        } else {
            // Symlinks and special files are not part of the data model
            Ok(None)
        }
    }
}

impl ChildLister for LocalDrive {
    fn list_children(&self, id: &NodeId) -> ListResult<Vec<Item>> {
        let dir = PathBuf::from(id.as_str());
        let entries = fs::read_dir(&dir).map_err(|e| ListError::Transient {
            node: id.clone(),
            reason: e.to_string(),
        })?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ListError::Transient {
                node: id.clone(),
                reason: e.to_string(),
            })?;
            if let Some(item) = self.entry_item(&entry.path())? {
                items.push(item);
            }
        }
        Ok(items)
    }
}
