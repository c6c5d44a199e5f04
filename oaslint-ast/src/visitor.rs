//! Visitor dispatch over a project's reachable IR (§4.7).
//!
//! Each typed ref shares a `{uri, pointer, node}` base (§9's "typed visitor
//! refs" design note) and dispatch is a sequence of passes over the project
//! rather than a single recursive walk, since the visitation order spec'd
//! in §4.7 groups callbacks by event kind, not by tree position.

use oaslint_syntax::Arena;
use oaslint_syntax::NodeId;

use crate::accessor::Accessor;
use crate::classify::identify_document_type;
use crate::classify::DocumentType;

/// Whether a node-bracketing callback fires on entering or leaving a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitReason {
    /// The callback fires before descending into the node's children.
    Enter,
    /// The callback fires after the node's children have been visited.
    Exit,
}

/// The `{uri, pointer, node}` base shared by every typed ref (§9).
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The owning document's URI.
    pub uri: &'a str,
    /// The node's JSON Pointer.
    pub pointer: &'a str,
    /// The node itself.
    pub node: NodeId,
}

/// Payload for a `Document` event.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRef<'a> {
    /// The document's URI.
    pub uri: &'a str,
    /// The document's root IR node.
    pub root: NodeId,
}

/// Payload for a `Root` event.
#[derive(Debug, Clone, Copy)]
pub struct RootRef<'a> {
    /// The base ref.
    pub base: NodeRef<'a>,
    /// The detected OpenAPI major-minor version, if any.
    pub version: Option<&'a str>,
}

/// Payload for a `PathItem` event.
#[derive(Debug, Clone, Copy)]
pub struct PathItemRef<'a> {
    /// The base ref.
    pub base: NodeRef<'a>,
    /// The path template, e.g. `/users/{id}`.
    pub template: &'a str,
}

/// Payload for an `Operation` event.
#[derive(Debug, Clone, Copy)]
pub struct OperationRef<'a> {
    /// The base ref.
    pub base: NodeRef<'a>,
    /// The HTTP method, lowercase.
    pub method: &'a str,
}

/// Payload for a `Reference` event.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceRef<'a> {
    /// The base ref, pointing at the object that contains `$ref`.
    pub base: NodeRef<'a>,
    /// The raw `$ref` string value.
    pub ref_str: &'a str,
}

/// Payload for a `Component` event.
#[derive(Debug, Clone, Copy)]
pub struct ComponentRef<'a> {
    /// The base ref.
    pub base: NodeRef<'a>,
    /// The `components` section the entry belongs to, e.g. `schemas`.
    pub section: &'a str,
    /// The component's name within its section.
    pub name: &'a str,
}

/// A visitor receives one callback per event kind from §4.7's table.
///
/// Node-bracketing callbacks (those taking a [`VisitReason`]) fire twice;
/// leaf callbacks fire once. Default bodies do nothing, so a rule only
/// implements the events it cares about.
#[allow(unused_variables)]
pub trait Visitor {
    /// Rule-private mutable state, owned by the runtime for the duration of
    /// one project run (§4.7, §9).
    type State;

    /// Fires once per reachable document.
    fn document(&mut self, state: &mut Self::State, doc: &DocumentRef<'_>) {}

    /// Fires once per root document.
    fn root(&mut self, state: &mut Self::State, reason: VisitReason, root: &RootRef<'_>) {}

    /// Fires once per root document, for its `info` object, if present.
    fn info(&mut self, state: &mut Self::State, info: &NodeRef<'_>) {}

    /// Fires for each entry of a root's `tags` array.
    fn tag(&mut self, state: &mut Self::State, tag: &NodeRef<'_>) {}

    /// Fires for each entry in a root's `paths` object.
    fn path_item(&mut self, state: &mut Self::State, reason: VisitReason, item: &PathItemRef<'_>) {
    }

    /// Fires for each HTTP-method entry on a path item.
    fn operation(
        &mut self,
        state: &mut Self::State,
        reason: VisitReason,
        op: &OperationRef<'_>,
    ) {
    }

    /// Fires for every parameter occurrence, anywhere in a reachable
    /// document.
    fn parameter(&mut self, state: &mut Self::State, param: &NodeRef<'_>) {}

    /// Fires for an operation's `requestBody`, if present.
    fn request_body(&mut self, state: &mut Self::State, body: &NodeRef<'_>) {}

    /// Fires for every response object, anywhere in a reachable document.
    fn response(&mut self, state: &mut Self::State, response: &NodeRef<'_>) {}

    /// Fires for every schema subtree, anywhere in a reachable document,
    /// including nested `properties`/`items`/composition members.
    fn schema(&mut self, state: &mut Self::State, schema: &NodeRef<'_>) {}

    /// Fires for every node carrying a literal `$ref`.
    fn reference(&mut self, state: &mut Self::State, reference: &ReferenceRef<'_>) {}

    /// Fires for each entry under `components/*` on a root.
    fn component(&mut self, state: &mut Self::State, component: &ComponentRef<'_>) {}

    /// Fires for every Example object, anywhere in a reachable document.
    fn example(&mut self, state: &mut Self::State, example: &NodeRef<'_>) {}

    /// Fires exactly once, after every other event for the project.
    fn project(&mut self, state: &mut Self::State) {}
}

/// What [`dispatch`] needs from a project: a set of reachable documents and
/// which of them are roots. Kept as a trait (rather than taking a concrete
/// project context) so this crate does not depend on `oaslint-analysis`.
pub trait ProjectView {
    /// The URIs of every reachable document, in a stable iteration order.
    fn document_uris(&self) -> Vec<String>;

    /// The IR arena for `uri`, if it is part of this project.
    fn arena(&self, uri: &str) -> Option<&Arena>;

    /// The URIs of the project's root document(s).
    fn root_uris(&self) -> &[String];
}

const COMPONENT_SECTIONS: &[&str] = &[
    "schemas",
    "parameters",
    "responses",
    "requestBodies",
    "securitySchemes",
    "examples",
    "headers",
    "links",
    "callbacks",
];

/// Walks a project's reachable documents, firing the events of §4.7 in the
/// order specified there.
pub fn dispatch<V: Visitor + ?Sized>(project: &impl ProjectView, visitor: &mut V, state: &mut V::State) {
    let root_uris = project.root_uris();

    for uri in project.document_uris() {
        if let Some(arena) = project.arena(&uri) {
            if let Some(root) = arena.root() {
                visitor.document(state, &DocumentRef { uri: &uri, root });
            }
        }
    }

    for root_uri in root_uris {
        let Some(arena) = project.arena(root_uri) else {
            continue;
        };
        let Some(root_id) = arena.root() else {
            continue;
        };
        visit_root(root_uri, arena, root_id, visitor, state);
    }

    // Non-root documents (fragments pulled in through `$ref`) never go
    // through `visit_root`, but §4.7's `Parameter`/`Response`/`Schema`/
    // `Reference`/`Example` events fire for every occurrence in every
    // reachable document, not just the root's own tree.
    for uri in project.document_uris() {
        if root_uris.contains(&uri) {
            continue;
        }
        let Some(arena) = project.arena(&uri) else {
            continue;
        };
        let Some(root_id) = arena.root() else {
            continue;
        };
        walk_generic(&uri, arena, root_id, visitor, state);
    }

    visitor.project(state);
}

fn visit_root<V: Visitor + ?Sized>(
    uri: &str,
    arena: &Arena,
    root_id: NodeId,
    visitor: &mut V,
    state: &mut V::State,
) {
    let root_acc = Accessor::new(arena, root_id);
    let version = root_acc
        .get_string("openapi")
        .or_else(|| root_acc.get_string("swagger"));
    let base = NodeRef {
        uri,
        pointer: arena.get(root_id).pointer.as_str(),
        node: root_id,
    };

    visitor.root(state, VisitReason::Enter, &RootRef { base, version });

    if let Some(info) = root_acc.get_object("info") {
        visitor.info(
            state,
            &NodeRef {
                uri,
                pointer: info.raw().pointer.as_str(),
                node: info.id(),
            },
        );
    }

    if let Some(tags) = root_acc.get_array("tags") {
        for &tag_id in tags {
            visitor.tag(
                state,
                &NodeRef {
                    uri,
                    pointer: arena.get(tag_id).pointer.as_str(),
                    node: tag_id,
                },
            );
        }
    }

    if let Some(paths) = root_acc.entries("paths") {
        for (template, item_acc) in paths {
            let item_base = NodeRef {
                uri,
                pointer: item_acc.raw().pointer.as_str(),
                node: item_acc.id(),
            };
            visitor.path_item(
                state,
                VisitReason::Enter,
                &PathItemRef {
                    base: item_base,
                    template,
                },
            );

            for &child_id in &item_acc.raw().children {
                let child = arena.get(child_id);
                let Some(method) = child.key.as_deref() else {
                    continue;
                };
                if !HTTP_METHODS.contains(&method) {
                    continue;
                }
                let op_acc = Accessor::new(arena, child_id);
                let op_base = NodeRef {
                    uri,
                    pointer: child.pointer.as_str(),
                    node: child_id,
                };
                visitor.operation(state, VisitReason::Enter, &OperationRef { base: op_base, method });

                if let Some(body) = op_acc.get_object("requestBody") {
                    visitor.request_body(
                        state,
                        &NodeRef {
                            uri,
                            pointer: body.raw().pointer.as_str(),
                            node: body.id(),
                        },
                    );
                }

                visitor.operation(state, VisitReason::Exit, &OperationRef { base: op_base, method });
            }

            visitor.path_item(
                state,
                VisitReason::Exit,
                &PathItemRef {
                    base: item_base,
                    template,
                },
            );
        }
    }

    walk_generic(uri, arena, root_id, visitor, state);

    if let Some(sections) = root_acc.get_object("components") {
        for &section_name in COMPONENT_SECTIONS {
            if let Some(entries) = sections.entries(section_name) {
                for (name, entry_acc) in entries {
                    visitor.component(
                        state,
                        &ComponentRef {
                            base: NodeRef {
                                uri,
                                pointer: entry_acc.raw().pointer.as_str(),
                                node: entry_acc.id(),
                            },
                            section: section_name,
                            name,
                        },
                    );
                }
            }
        }
    }

    visitor.root(state, VisitReason::Exit, &RootRef { base, version });
}

const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A pre-order walk of the whole document firing `Parameter`, `Response`,
/// `Schema`, `Example` and `Reference` for every matching node, in source
/// order (§4.7: "every occurrence", "every schema subtree", "every node
/// with a literal $ref").
fn walk_generic<V: Visitor + ?Sized>(
    uri: &str,
    arena: &Arena,
    node_id: NodeId,
    visitor: &mut V,
    state: &mut V::State,
) {
    let node = arena.get(node_id);
    if node.kind == oaslint_syntax::Kind::Object {
        let acc = Accessor::new(arena, node_id);
        let base = NodeRef {
            uri,
            pointer: node.pointer.as_str(),
            node: node_id,
        };
        match identify_document_type(&acc) {
            DocumentType::Parameter => visitor.parameter(state, &base),
            DocumentType::Response => visitor.response(state, &base),
            DocumentType::Schema => visitor.schema(state, &base),
            DocumentType::Example => visitor.example(state, &base),
            _ => {}
        }
        if let Some(ref_str) = acc.get_string("$ref") {
            visitor.reference(state, &ReferenceRef { base, ref_str });
        }
    }

    for &child_id in &node.children {
        walk_generic(uri, arena, child_id, visitor, state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use oaslint_syntax::ir;
    use oaslint_syntax::json;

    use super::*;

    struct FakeProject {
        docs: HashMap<String, Arena>,
        roots: Vec<String>,
    }

    impl ProjectView for FakeProject {
        fn document_uris(&self) -> Vec<String> {
            self.docs.keys().cloned().collect()
        }

        fn arena(&self, uri: &str) -> Option<&Arena> {
            self.docs.get(uri)
        }

        fn root_uris(&self) -> &[String] {
            &self.roots
        }
    }

    #[derive(Default)]
    struct Counters {
        operations: u32,
        path_items: u32,
        schemas: u32,
        references: u32,
        projects: u32,
    }

    struct CountingVisitor;
    impl Visitor for CountingVisitor {
        type State = Counters;

        fn operation(&mut self, state: &mut Counters, reason: VisitReason, _op: &OperationRef<'_>) {
            if reason == VisitReason::Enter {
                state.operations += 1;
            }
        }

        fn path_item(&mut self, state: &mut Counters, reason: VisitReason, _item: &PathItemRef<'_>) {
            if reason == VisitReason::Enter {
                state.path_items += 1;
            }
        }

        fn schema(&mut self, state: &mut Counters, _schema: &NodeRef<'_>) {
            state.schemas += 1;
        }

        fn reference(&mut self, state: &mut Counters, _reference: &ReferenceRef<'_>) {
            state.references += 1;
        }

        fn project(&mut self, state: &mut Counters) {
            state.projects += 1;
        }
    }

    #[test]
    fn dispatch_visits_paths_and_references() {
        let text = r##"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": {"200": {"description": "ok", "schema": {"$ref": "#/components/schemas/Pet"}}}
                    }
                }
            },
            "components": {"schemas": {"Pet": {"type": "object"}}}
        }"##;
        let (events, _) = json::parse(text);
        let arena = ir::build(&events);
        let mut docs = HashMap::new();
        docs.insert("file:///a.json".to_string(), arena);
        let project = FakeProject {
            docs,
            roots: vec!["file:///a.json".to_string()],
        };

        let mut visitor = CountingVisitor;
        let mut counters = Counters::default();
        dispatch(&project, &mut visitor, &mut counters);

        assert_eq!(counters.path_items, 1);
        assert_eq!(counters.operations, 1);
        assert_eq!(counters.references, 1);
        assert!(counters.schemas >= 1);
        assert_eq!(counters.projects, 1);
    }

    #[test]
    fn dispatch_walks_generic_events_in_non_root_documents() {
        let root_text = r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {}
        }"#;
        let fragment_text = r##"{
            "type": "object",
            "properties": {"name": {"$ref": "#/properties/other"}}
        }"##;
        let (root_events, _) = json::parse(root_text);
        let (fragment_events, _) = json::parse(fragment_text);
        let mut docs = HashMap::new();
        docs.insert("file:///a.json".to_string(), ir::build(&root_events));
        docs.insert("file:///b.json".to_string(), ir::build(&fragment_events));
        let project = FakeProject {
            docs,
            roots: vec!["file:///a.json".to_string()],
        };

        let mut visitor = CountingVisitor;
        let mut counters = Counters::default();
        dispatch(&project, &mut visitor, &mut counters);

        assert!(counters.schemas >= 1);
        assert_eq!(counters.references, 1);
    }
}
