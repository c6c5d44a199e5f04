//! Shared, thread-safe caches: document-type and project-context (§4.6,
//! §5).
//!
//! Lookups are lock-free reads in spirit (a single `parking_lot::RwLock`
//! read guard, uncontended in the common case); writes are serialised
//! through the same lock, which is simpler than per-key striping and
//! sufficient at the batch sizes §5 describes.

use std::collections::HashMap;
use std::sync::Arc;

use oaslint_ast::ClassifierCache;
use oaslint_ast::DocumentType;
use parking_lot::RwLock;

use crate::context::ProjectContext;

/// A thread-safe wrapper over the document-type classifier's LRU cache.
pub struct SharedDocTypeCache {
    inner: RwLock<ClassifierCache>,
}

impl SharedDocTypeCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(ClassifierCache::new(capacity)),
        }
    }

    /// Returns the cached classification for `(uri, hash)`, if present.
    pub fn get(&self, uri: &str, hash: u64) -> Option<DocumentType> {
        self.inner.write().get(uri, hash)
    }

    /// Inserts a classification result.
    pub fn insert(&self, uri: String, hash: u64, ty: DocumentType) {
        self.inner.write().insert(uri, hash, ty);
    }

    /// Evicts every cached classification for `uri`.
    pub fn invalidate(&self, uri: &str) {
        self.inner.write().invalidate(uri);
    }
}

/// Caches assembled [`ProjectContext`]s by their `{uri, hash}`-derived key
/// (§6), invalidated wholesale whenever any participating document changes.
#[derive(Default)]
pub struct ProjectCache {
    entries: RwLock<HashMap<String, Arc<ProjectContext>>>,
}

impl ProjectCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a previously cached project by its cache key.
    pub fn get(&self, key: &str) -> Option<Arc<ProjectContext>> {
        self.entries.read().get(key).cloned()
    }

    /// Inserts an assembled project under its own cache key.
    pub fn insert(&self, project: ProjectContext) -> Arc<ProjectContext> {
        let key = project.cache_key();
        let arc = Arc::new(project);
        self.entries.write().insert(key, arc.clone());
        arc
    }

    /// Evicts every cached project that contains `uri` among its
    /// documents, per §4.6's "invalidation on any constituent's change
    /// evicts the entry and all others that contained that URI".
    pub fn invalidate(&self, uri: &str) {
        self.entries
            .write()
            .retain(|_, project| !project.docs.contains_key(uri));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_type_cache_round_trips() {
        let cache = SharedDocTypeCache::new(4);
        cache.insert("a".into(), 1, DocumentType::Root);
        assert_eq!(cache.get("a", 1), Some(DocumentType::Root));
        cache.invalidate("a");
        assert_eq!(cache.get("a", 1), None);
    }
}
