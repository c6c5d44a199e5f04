//! Root discovery and the context resolver (§4.6).

use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use oaslint_ast::identify_document_type;
use oaslint_ast::Accessor;
use oaslint_ast::DocumentType;
use oaslint_ast::ProjectView;
use oaslint_syntax::document::Format;
use oaslint_syntax::Arena;
use oaslint_syntax::Document;
use oaslint_syntax::IoError;
use tracing::debug;
use url::Url;

use crate::cache::ProjectCache;
use crate::cache::SharedDocTypeCache;
use crate::fs::strip_fragment;
use crate::fs::Filesystem;
use crate::graph::build_graph;
use crate::graph::normalize_ref;
use crate::graph::ReferenceGraph;
use crate::index::build_index;
use crate::index::ProjectIndex;

/// How the resolver should choose among several owning roots for a
/// fragment (§4.4, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// Return only the root whose path is closest to the fragment.
    Closest,
    /// Return every owning root.
    All,
}

/// The complete set of documents, graph and indexes needed to lint one
/// root in isolation (§3, glossary).
#[derive(Debug)]
pub struct ProjectContext {
    /// Every reachable document, keyed by normalised URI.
    pub docs: IndexMap<String, Document>,
    /// The project's `$ref` graph.
    pub graph: ReferenceGraph,
    /// The derived project index.
    pub index: ProjectIndex,
    /// The root document(s) this context was assembled for.
    pub root_uris: Vec<String>,
    /// The detected OpenAPI major-minor version of the primary root.
    pub version: String,
}

impl ProjectView for ProjectContext {
    fn document_uris(&self) -> Vec<String> {
        self.docs.keys().cloned().collect()
    }

    fn arena(&self, uri: &str) -> Option<&Arena> {
        self.docs.get(uri).map(|d| &d.ir)
    }

    fn root_uris(&self) -> &[String] {
        &self.root_uris
    }
}

impl ProjectContext {
    /// A stable cache key derived from the sorted `{uri, hash}` pairs of
    /// every participating document (§6's project-context cache key).
    pub fn cache_key(&self) -> String {
        docs_cache_key(&self.docs)
    }
}

/// Computes [`ProjectContext::cache_key`]'s value directly from a `docs`
/// map, so a project's cache key is known before its graph and index are
/// built.
fn docs_cache_key(docs: &IndexMap<String, Document>) -> String {
    let mut pairs: Vec<(&str, u64)> = docs.iter().map(|(u, d)| (u.as_str(), d.hash)).collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(u, h)| format!("{u}@{h:x}"))
        .collect::<Vec<_>>()
        .join(";")
}

/// The result of resolving a linting context for one input URI (§4.6).
#[derive(Debug)]
pub enum LintingContext {
    /// `uri` is a root, or a fragment with exactly one owning root.
    ProjectAware(Arc<ProjectContext>),
    /// The fragment has several owning roots; each is linted independently.
    MultiRoot(Vec<Arc<ProjectContext>>),
    /// No root could be discovered; only single-file-scoped rules may run.
    Fragment {
        /// The fragment's URI.
        uri: String,
        /// The loaded (but otherwise unrelated) document.
        doc: Document,
    },
}

fn load_document(uri: &str, fs: &dyn Filesystem) -> Result<Document, IoError> {
    let stripped = strip_fragment(uri);
    let url = Url::parse(stripped)
        .map_err(|_| IoError::UnsupportedFormat(stripped.to_string()))?;
    let format = Format::from_uri(&url)?;
    let bytes = fs.read(stripped)?;
    let text = String::from_utf8(bytes).map_err(|_| IoError::ReadFailed {
        uri: stripped.to_string(),
        reason: "not valid UTF-8".to_string(),
    })?;
    Ok(Document::parse(url, format, text, None))
}

/// Every `$ref` target URI reachable in one hop from `doc`, deduplicated.
fn referenced_uris(doc: &Document) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let Some(root) = doc.ir.root() else {
        return out;
    };
    collect_refs(doc, root, &mut out, &mut seen);
    out
}

fn collect_refs(doc: &Document, node_id: oaslint_syntax::NodeId, out: &mut Vec<String>, seen: &mut HashSet<String>) {
    let node = doc.ir.get(node_id);
    if node.kind == oaslint_syntax::Kind::Object {
        if let Some(ref_str) = node.children.iter().find_map(|&id| {
            let child = doc.ir.get(id);
            (child.key.as_deref() == Some("$ref") && child.kind == oaslint_syntax::Kind::String)
                .then(|| child.scalar.clone())
                .flatten()
        }) {
            let (target_uri, _) = normalize_ref(&doc.uri, &ref_str);
            if seen.insert(target_uri.clone()) {
                out.push(target_uri);
            }
        }
    }
    for &child_id in &node.children {
        collect_refs(doc, child_id, out, seen);
    }
}

/// Loads a root document and transitively every document it reaches
/// through `$ref`, then builds the graph and index over the result — unless
/// `project_cache` already holds an assembled context under the same set of
/// `{uri, hash}` pairs, in which case that context is reused as-is.
fn load_project_from_root(
    root_uri: &str,
    fs: &dyn Filesystem,
    project_cache: Option<&ProjectCache>,
) -> Result<Arc<ProjectContext>, IoError> {
    let mut docs: IndexMap<String, Document> = IndexMap::new();
    let mut queue = VecDeque::from([root_uri.to_string()]);
    let mut seen = HashSet::new();

    while let Some(uri) = queue.pop_front() {
        let stripped = strip_fragment(&uri).to_string();
        if !seen.insert(stripped.clone()) {
            continue;
        }
        let doc = match load_document(&stripped, fs) {
            Ok(doc) => doc,
            Err(err) => {
                debug!(uri = %stripped, error = %err, "failed to load referenced document");
                continue;
            }
        };
        for target in referenced_uris(&doc) {
            if !seen.contains(&target) {
                queue.push_back(target);
            }
        }
        docs.insert(stripped, doc);
    }

    if let Some(cache) = project_cache {
        let key = docs_cache_key(&docs);
        if let Some(cached) = cache.get(&key) {
            return Ok(cached);
        }
    }

    let version = docs
        .get(root_uri)
        .and_then(|doc| doc.ir.root())
        .and_then(|root_id| {
            let doc = docs.get(root_uri).unwrap();
            let acc = Accessor::new(&doc.ir, root_id);
            acc.get_string("openapi")
                .or_else(|| acc.get_string("swagger"))
                .map(str::to_string)
        })
        .unwrap_or_default();

    let graph = build_graph(&docs);
    let root_uris = vec![root_uri.to_string()];
    let index = build_index(&docs, &root_uris);

    let project = ProjectContext {
        docs,
        graph,
        index,
        root_uris,
        version,
    };

    Ok(match project_cache {
        Some(cache) => cache.insert(project),
        None => Arc::new(project),
    })
}

fn is_root_document(doc: &Document, doc_type_cache: &SharedDocTypeCache) -> bool {
    if let Some(cached) = doc_type_cache.get(doc.uri.as_str(), doc.hash) {
        return cached == DocumentType::Root;
    }
    let ty = doc
        .ir
        .root()
        .map(|id| identify_document_type(&Accessor::new(&doc.ir, id)))
        .unwrap_or(DocumentType::Unknown);
    doc_type_cache.insert(doc.uri.as_str().to_string(), doc.hash, ty);
    ty == DocumentType::Root
}

/// `path_distance` is a simple heuristic for §4.6's "closest by path
/// distance" preference: the number of differing path segments between two
/// URIs' paths.
fn path_distance(a: &str, b: &str) -> usize {
    let a_segments: Vec<&str> = a.split('/').collect();
    let b_segments: Vec<&str> = b.split('/').collect();
    let common = a_segments
        .iter()
        .zip(b_segments.iter())
        .take_while(|(x, y)| x == y)
        .count();
    (a_segments.len() - common) + (b_segments.len() - common)
}

/// Resolves the linting context for `uri` (§4.6).
///
/// `doc_type_cache` is consulted (and populated) for every document's
/// root/fragment classification; `project_cache` is consulted (and
/// populated) before an owning root's project is rebuilt from scratch, so
/// repeated calls against an unchanged project graph skip straight to a
/// cached [`ProjectContext`].
pub fn resolve_linting_context(
    uri: &str,
    fs: &dyn Filesystem,
    workspace_folders: &[String],
    doc_type_cache: &SharedDocTypeCache,
    project_cache: Option<&ProjectCache>,
    preference: Preference,
) -> Result<LintingContext, IoError> {
    let stripped = strip_fragment(uri).to_string();
    let doc = load_document(&stripped, fs)?;

    if is_root_document(&doc, doc_type_cache) {
        return Ok(LintingContext::ProjectAware(load_project_from_root(
            &stripped,
            fs,
            project_cache,
        )?));
    }

    let mut patterns = Vec::new();
    for folder in workspace_folders {
        patterns.push(format!("{folder}/**/*.json"));
        patterns.push(format!("{folder}/**/*.yaml"));
        patterns.push(format!("{folder}/**/*.yml"));
    }
    let candidates = fs.glob(&patterns)?;

    let mut owning = Vec::new();
    for candidate in candidates {
        let candidate_doc = match load_document(&candidate, fs) {
            Ok(doc) => doc,
            Err(_) => continue,
        };
        if !is_root_document(&candidate_doc, doc_type_cache) {
            continue;
        }
        let project = load_project_from_root(&candidate, fs, project_cache)?;
        if project.docs.contains_key(&stripped) {
            owning.push(project);
        }
    }

    match owning.len() {
        0 => Ok(LintingContext::Fragment { uri: stripped, doc }),
        1 => Ok(LintingContext::ProjectAware(owning.into_iter().next().unwrap())),
        _ => match preference {
            Preference::All => Ok(LintingContext::MultiRoot(owning)),
            Preference::Closest => {
                let closest = owning
                    .into_iter()
                    .min_by_key(|p| path_distance(&p.root_uris[0], &stripped))
                    .expect("owning is non-empty");
                Ok(LintingContext::ProjectAware(closest))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::fs::EntryKind;
    use crate::fs::Stat;

    use super::*;

    struct MemFs {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Filesystem for MemFs {
        fn read(&self, uri: &str) -> Result<Vec<u8>, IoError> {
            self.files
                .lock()
                .unwrap()
                .get(uri)
                .cloned()
                .ok_or_else(|| IoError::NotFound(uri.to_string()))
        }

        fn stat(&self, uri: &str) -> Option<Stat> {
            self.files.lock().unwrap().get(uri).map(|b| Stat {
                kind: EntryKind::File,
                size: b.len() as u64,
            })
        }

        fn read_directory(&self, _uri: &str) -> Result<Vec<(String, EntryKind)>, IoError> {
            Ok(Vec::new())
        }

        fn glob(&self, _patterns: &[String]) -> Result<Vec<String>, IoError> {
            Ok(self.files.lock().unwrap().keys().cloned().collect())
        }
    }

    #[test]
    fn project_aware_for_a_root_uri() {
        let mut files = HashMap::new();
        files.insert(
            "file:///a.json".to_string(),
            br#"{"openapi": "3.1.0", "info": {"title": "t", "version": "1"}}"#.to_vec(),
        );
        let fs = MemFs {
            files: Mutex::new(files),
        };

        let doc_type_cache = SharedDocTypeCache::new(8);
        let ctx = resolve_linting_context(
            "file:///a.json",
            &fs,
            &[],
            &doc_type_cache,
            None,
            Preference::Closest,
        )
        .unwrap();
        assert!(matches!(ctx, LintingContext::ProjectAware(_)));
    }

    #[test]
    fn fragment_with_no_owning_root() {
        let mut files = HashMap::new();
        files.insert(
            "file:///b.json".to_string(),
            br#"{"type": "object"}"#.to_vec(),
        );
        let fs = MemFs {
            files: Mutex::new(files),
        };

        let doc_type_cache = SharedDocTypeCache::new(8);
        let ctx = resolve_linting_context(
            "file:///b.json",
            &fs,
            &[],
            &doc_type_cache,
            None,
            Preference::Closest,
        )
        .unwrap();
        assert!(matches!(ctx, LintingContext::Fragment { .. }));
    }

    #[test]
    fn project_cache_is_reused_across_resolutions() {
        let mut files = HashMap::new();
        files.insert(
            "file:///a.json".to_string(),
            br#"{"openapi": "3.1.0", "info": {"title": "t", "version": "1"}}"#.to_vec(),
        );
        let fs = MemFs {
            files: Mutex::new(files),
        };
        let doc_type_cache = SharedDocTypeCache::new(8);
        let project_cache = ProjectCache::new();

        let first = resolve_linting_context(
            "file:///a.json",
            &fs,
            &[],
            &doc_type_cache,
            Some(&project_cache),
            Preference::Closest,
        )
        .unwrap();
        let second = resolve_linting_context(
            "file:///a.json",
            &fs,
            &[],
            &doc_type_cache,
            Some(&project_cache),
            Preference::Closest,
        )
        .unwrap();

        let (LintingContext::ProjectAware(first), LintingContext::ProjectAware(second)) =
            (first, second)
        else {
            panic!("expected ProjectAware on both resolutions");
        };
        assert!(Arc::ptr_eq(&first, &second));
    }
}
