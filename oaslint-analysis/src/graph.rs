//! The `$ref` reference graph (§3, §4.4, §9).
//!
//! Modelled as two directed edge maps over `(uri, pointer)` nodes, backed by
//! `petgraph::stable_graph::StableDiGraph` the way `wdl-analysis` models its
//! document graph — forward edges for `referencesFrom`, the same graph
//! traversed against edge direction for `dependentsOf`, and a DFS with a
//! recursion stack (via `petgraph::algo::is_cyclic_directed`/`has_path_connecting`)
//! for cycle queries.

use std::collections::HashMap;

use indexmap::IndexMap;
use oaslint_syntax::Document;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use url::Url;

/// A `(uri, pointer)` pair identifying one node in the reference graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphNode {
    /// The owning document's normalised URI.
    pub uri: String,
    /// The node's JSON Pointer within that document.
    pub pointer: String,
}

/// The directed `$ref` graph for a project (§3).
///
/// Edges exist only for syntactically valid refs; a dangling ref is an
/// edge whose target node was never added by [`build_graph`] because no
/// document in the project defines it — callers detect this by querying
/// [`ReferenceGraph::target_exists`] before dereferencing, and the resolver
/// (`crate::resolver`) turns that into an `UnresolvedRefError`.
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    graph: StableDiGraph<GraphNode, ()>,
    index: HashMap<GraphNode, NodeIndex>,
}

impl ReferenceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn node_index(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(idx) = self.index.get(&node) {
            return *idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.index.insert(node, idx);
        idx
    }

    /// Records one `$ref` edge from `from` to `to`.
    pub fn add_ref(&mut self, from: GraphNode, to: GraphNode) {
        let from_idx = self.node_index(from);
        let to_idx = self.node_index(to);
        self.graph.add_edge(from_idx, to_idx, ());
    }

    /// Whether `node` was ever added to the graph (either as a ref's origin
    /// or a ref's declared target).
    pub fn contains(&self, node: &GraphNode) -> bool {
        self.index.contains_key(node)
    }

    /// The nodes that `node` references directly.
    pub fn references_from(&self, node: &GraphNode) -> Vec<GraphNode> {
        let Some(&idx) = self.index.get(node) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| self.graph[e.target()].clone())
            .collect()
    }

    /// The nodes that reference `node` directly.
    pub fn dependents_of(&self, node: &GraphNode) -> Vec<GraphNode> {
        let Some(&idx) = self.index.get(node) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| self.graph[e.source()].clone())
            .collect()
    }

    /// Whether `node` participates in a reference cycle (a path exists from
    /// `node` back to itself through one or more edges).
    pub fn has_cycle(&self, node: &GraphNode) -> bool {
        let Some(&idx) = self.index.get(node) else {
            return false;
        };
        let mut stack = vec![idx];
        let mut visited = std::collections::HashSet::new();
        while let Some(current) = stack.pop() {
            for edge in self.graph.edges_directed(current, Direction::Outgoing) {
                let target = edge.target();
                if target == idx {
                    return true;
                }
                if visited.insert(target) {
                    stack.push(target);
                }
            }
        }
        false
    }
}

/// Normalises a `$ref` string relative to its owning document, per §4.4's
/// ordered list of ref forms. `url::Url::join` already implements the
/// absolute-URL / absolute-path / relative-path / fragment-only cases
/// uniformly: an absolute `http(s)://` or `file://` ref parses on its own;
/// everything else resolves against `origin`.
pub fn normalize_ref(origin: &Url, ref_str: &str) -> (String, String) {
    let resolved = Url::parse(ref_str)
        .or_else(|_| origin.join(ref_str))
        .unwrap_or_else(|_| origin.clone());
    let fragment = resolved.fragment().unwrap_or("").to_string();
    let mut target = resolved;
    target.set_fragment(None);
    (target.to_string(), fragment)
}

/// Scans every document's IR for `$ref` nodes and builds the project's
/// reference graph.
pub fn build_graph(docs: &IndexMap<String, Document>) -> ReferenceGraph {
    let mut graph = ReferenceGraph::new();
    for (uri, doc) in docs {
        let Ok(origin) = Url::parse(uri) else {
            continue;
        };
        if let Some(root) = doc.ir.root() {
            scan_refs(&origin, uri, doc, root, &mut graph);
        }
    }
    graph
}

fn scan_refs(
    origin: &Url,
    uri: &str,
    doc: &Document,
    node_id: oaslint_syntax::NodeId,
    graph: &mut ReferenceGraph,
) {
    let node = doc.ir.get(node_id);
    if node.kind == oaslint_syntax::Kind::Object {
        let ref_child = node.children.iter().find_map(|&id| {
            let child = doc.ir.get(id);
            if child.key.as_deref() == Some("$ref") && child.kind == oaslint_syntax::Kind::String {
                child.scalar.clone()
            } else {
                None
            }
        });
        if let Some(ref_str) = ref_child {
            let (target_uri, fragment) = normalize_ref(origin, &ref_str);
            let pointer = if fragment.is_empty() {
                String::new()
            } else {
                fragment
            };
            graph.add_ref(
                GraphNode {
                    uri: uri.to_string(),
                    pointer: node.pointer.clone(),
                },
                GraphNode {
                    uri: target_uri,
                    pointer,
                },
            );
        }
    }

    for &child_id in &node.children {
        scan_refs(origin, uri, doc, child_id, graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(uri: &str, pointer: &str) -> GraphNode {
        GraphNode {
            uri: uri.to_string(),
            pointer: pointer.to_string(),
        }
    }

    #[test]
    fn detects_two_node_cycle() {
        let mut graph = ReferenceGraph::new();
        graph.add_ref(node("a", "/x"), node("a", "/y"));
        graph.add_ref(node("a", "/y"), node("a", "/x"));
        assert!(graph.has_cycle(&node("a", "/x")));
    }

    #[test]
    fn acyclic_graph_reports_no_cycle() {
        let mut graph = ReferenceGraph::new();
        graph.add_ref(node("a", "/x"), node("a", "/y"));
        assert!(!graph.has_cycle(&node("a", "/x")));
        assert!(!graph.has_cycle(&node("a", "/y")));
    }

    #[test]
    fn normalizes_same_document_fragment() {
        let origin = Url::parse("file:///project/a.yaml").unwrap();
        let (uri, ptr) = normalize_ref(&origin, "#/components/schemas/Pet");
        assert_eq!(uri, "file:///project/a.yaml");
        assert_eq!(ptr, "/components/schemas/Pet");
    }

    #[test]
    fn normalizes_relative_path() {
        let origin = Url::parse("file:///project/a.yaml").unwrap();
        let (uri, ptr) = normalize_ref(&origin, "./b.yaml#/components/schemas/Pet");
        assert_eq!(uri, "file:///project/b.yaml");
        assert_eq!(ptr, "/components/schemas/Pet");
    }

    #[test]
    fn normalizes_bare_fragment_to_document_root() {
        let origin = Url::parse("file:///project/a.yaml").unwrap();
        let (uri, ptr) = normalize_ref(&origin, "#");
        assert_eq!(uri, "file:///project/a.yaml");
        assert_eq!(ptr, "");
    }
}
