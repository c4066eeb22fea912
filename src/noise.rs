/*!
 * Noise filtering for scanned items
 *
 * Drives accumulate transient system artifacts (editor lock files,
 * thumbnail caches, temp files) that should never count toward folder
 * sizes. The predicate is fully pluggable; [`NoiseFilter`] is the default.
 */

use glob_match::glob_match;
use once_cell::sync::Lazy;

use crate::types::Item;

/// Predicate deciding whether an item is a transient/system artifact
pub trait NoisePredicate: Send + Sync {
    /// Whether the item should be excluded from scan results
    fn is_noise(&self, item: &Item) -> bool;
}

impl<F> NoisePredicate for F
where
    F: Fn(&Item) -> bool + Send + Sync,
{
    fn is_noise(&self, item: &Item) -> bool {
        self(item)
    }
}

/// Default patterns treated as noise
pub static DEFAULT_NOISE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // OS artifacts
        "Thumbs.db",
        "ehthumbs.db",
        "desktop.ini",
        ".DS_Store",
        ".directory",
        "Icon\r",
        // Office lock files
        "~$*",
        // Temp and backup files
        "*.tmp",
        "*.temp",
        "*.bak",
        "*.swp",
        "*.swo",
        "*.partial",
        "*.crdownload",
        // Sync engine leftovers
        "*.laccdb",
        "*.lock",
    ]
});

/// Default noise filter: leading `~`, leading `.`, the [`DEFAULT_NOISE`]
/// table, plus any caller-supplied glob patterns
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    /// Additional glob patterns matched against item names
    patterns: Vec<String>,
}

impl NoiseFilter {
    /// Create a filter with the built-in rules only
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with extra caller-supplied glob patterns
    pub fn with_patterns(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl NoisePredicate for NoiseFilter {
    fn is_noise(&self, item: &Item) -> bool {
        let name = item.name.as_str();

        // Leading-tilde and leading-dot names are always noise
        if name.starts_with('~') || name.starts_with('.') {
            return true;
        }

        if DEFAULT_NOISE.iter().any(|p| glob_match(p, name)) {
            return true;
        }

        self.patterns.iter().any(|p| glob_match(p, name))
    }
}

/// A predicate that retains everything
pub struct KeepAll;

impl NoisePredicate for KeepAll {
    fn is_noise(&self, _item: &Item) -> bool {
        false
    }
}
