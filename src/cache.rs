//! Content-addressed memoisation of pipeline results.
//!
//! Keys are SHA-256 digests of the serialised node subtree plus whatever
//! else the cached computation reads (markup, component type, parent fill),
//! so different inputs never share an entry. Maps sit behind `RwLock`s and
//! are safe to share between concurrent invocations.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use sha2::{Digest, Sha256};
use tracing::trace;

use crate::error::Result;
use crate::types::{ClassificationResult, ComponentType, DesignNode, SubtreeLayout};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey([u8; 32]);

impl ContentKey {
    /// Key over a node subtree.
    pub fn for_node(node: &DesignNode) -> Result<Self> {
        let node = serde_json::to_vec(node)?;
        Ok(Self::digest(&[&node]))
    }

    /// Key over everything the correction stages read.
    pub fn for_correction(
        node: &DesignNode,
        parent: Option<&DesignNode>,
        markup: &str,
        component: ComponentType,
    ) -> Result<Self> {
        let node = serde_json::to_vec(node)?;
        let parent_fill = parent
            .and_then(DesignNode::solid_fill)
            .map(|c| c.to_hex())
            .unwrap_or_default();
        let component = component.to_string();
        Ok(Self::digest(&[
            &node,
            parent_fill.as_bytes(),
            component.as_bytes(),
            markup.as_bytes(),
        ]))
    }

    fn digest(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            // Length prefix keeps ("ab", "c") and ("a", "bc") apart.
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({self})")
    }
}

/// Thread-safe read-through map from content keys to values.
#[derive(Debug)]
pub struct ContentCache<V> {
    entries: RwLock<HashMap<ContentKey, V>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<V> Default for ContentCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }
}

impl<V: Clone> ContentCache<V> {
    pub fn get(&self, key: &ContentKey) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    pub fn insert(&self, key: ContentKey, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, value);
    }

    /// Cached value for `key`, computing and storing it on a miss.
    ///
    /// The lock is not held while `compute` runs; two racing callers may
    /// both compute, and the first stored value wins.
    pub fn get_or_insert_with(&self, key: ContentKey, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(%key, "cache hit");
            return value;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert(value).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Caches owned by one [`crate::pipeline::Pipeline`].
#[derive(Debug, Default)]
pub struct AnalysisCache {
    pub classification: ContentCache<ClassificationResult>,
    pub layout: ContentCache<SubtreeLayout>,
    pub correction: ContentCache<crate::pipeline::Corrected>,
}

impl AnalysisCache {
    pub fn clear(&self) {
        self.classification.clear();
        self.layout.clear();
        self.correction.clear();
    }
}
