//! The intermediate representation: an immutable, per-document arena of
//! [`IrNode`]s keyed by JSON Pointer (§3).
//!
//! Nodes are allocated into a single `Vec` per document rather than boxed
//! or reference-counted individually (see `SPEC_FULL.md` §3 / §9): a
//! [`NodeId`] is a plain `Copy` index, so rule code, graph edges and
//! cross-file origin maps can all hold node references cheaply, with no
//! lifetimes to thread through the visitor dispatch.

use std::collections::HashMap;

use crate::events::ParseEvent;
use crate::events::ScalarKind;
use crate::pointer;
use crate::span::Span;

/// An opaque, arena-local reference to an [`IrNode`].
///
/// `NodeId`s are only meaningful relative to the [`Arena`] that produced
/// them; comparing `NodeId`s across documents is a programmer error
/// (checked with `debug_assert!` at lookup sites that take a
/// `(uri, NodeId)` pair, see `oaslint-analysis`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// The shape of one IR node, from §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A JSON/YAML object (mapping).
    Object,
    /// A JSON/YAML array (sequence).
    Array,
    /// A string scalar.
    String,
    /// A numeric scalar.
    Number,
    /// A boolean scalar.
    Boolean,
    /// A null scalar.
    Null,
}

/// Byte-offset location metadata for one node (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loc {
    /// The full span of the node (key + value, for a map entry's value node
    /// this is just the value; see `key_start`/`key_end` for the key).
    pub start: u32,
    /// End of the full span.
    pub end: u32,
    /// Start of the entry's key token, if this node is a map entry's value.
    pub key_start: Option<u32>,
    /// End of the entry's key token.
    pub key_end: Option<u32>,
    /// Start of the entry's value token (usually equal to `start`).
    pub val_start: Option<u32>,
    /// End of the entry's value token (usually equal to `end`).
    pub val_end: Option<u32>,
}

impl Loc {
    /// The node's overall span.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// The key token's span, if present.
    pub fn key_span(&self) -> Option<Span> {
        Some(Span::new(self.key_start?, self.key_end?))
    }

    /// The value token's span, falling back to the overall span.
    pub fn value_span(&self) -> Span {
        match (self.val_start, self.val_end) {
            (Some(s), Some(e)) => Span::new(s, e),
            _ => self.span(),
        }
    }
}

/// One immutable node in a document's IR (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct IrNode {
    /// The node's shape.
    pub kind: Kind,
    /// The JSON Pointer from the document root.
    pub pointer: String,
    /// The map key this node was stored under, if it is a map entry's value.
    pub key: Option<String>,
    /// The raw scalar text, for leaf kinds.
    pub scalar: Option<String>,
    /// Children, in source order. Empty for scalar kinds.
    pub children: Vec<NodeId>,
    /// Source location.
    pub loc: Loc,
    /// For a YAML alias (`*name`), the pointer of the anchor's defining
    /// site, if it could be resolved during the same pass.
    pub alias_target_ptr: Option<String>,
}

/// An immutable, per-document arena of [`IrNode`]s.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<IrNode>,
    by_pointer: HashMap<String, NodeId>,
}

impl Arena {
    /// Looks up a node by id.
    pub fn get(&self, id: NodeId) -> &IrNode {
        &self.nodes[id.0 as usize]
    }

    /// The root node of the document (pointer `""`), if any node was built.
    pub fn root(&self) -> Option<NodeId> {
        self.by_pointer.get("").copied()
    }

    /// Looks up a node by its JSON Pointer.
    ///
    /// This is the property-tested round trip from §8:
    /// `find_by_pointer(arena, n.pointer) == Some(n)` for every `n` in the
    /// arena.
    pub fn find_by_pointer(&self, ptr: &str) -> Option<NodeId> {
        self.by_pointer.get(ptr).copied()
    }

    /// Iterates all nodes with their ids, in allocation (source) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &IrNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// The number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes (only true for a degenerate/empty
    /// document that failed to parse before producing any events).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: IrNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.by_pointer.insert(node.pointer.clone(), id);
        self.nodes.push(node);
        id
    }
}

/// Lowers a [`ParseEvent`] stream (produced by either the JSON or the YAML
/// front end) into an [`Arena`].
///
/// This function is what actually guarantees the format-agnostic IR
/// contract from §4.2: both front ends funnel through it, so a rule
/// cannot observe which parser produced a given node.
pub fn build(events: &[ParseEvent]) -> Arena {
    let mut arena = Arena::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut anchors: HashMap<String, String> = HashMap::new();
    let mut pending_alias: Option<String> = None;

    for event in events {
        match event {
            ParseEvent::MapStart { span, anchor } => {
                stack.push(Frame::new_container(pointer_for(&stack), *span, anchor.clone()));
            }
            ParseEvent::MapEnd { span } => {
                finish_container(&mut arena, &mut stack, *span, Kind::Object, &mut anchors);
            }
            ParseEvent::SeqStart { span, anchor } => {
                stack.push(Frame::new_container(pointer_for(&stack), *span, anchor.clone()));
            }
            ParseEvent::SeqEnd { span } => {
                finish_container(&mut arena, &mut stack, *span, Kind::Array, &mut anchors);
            }
            ParseEvent::Key { text, span } => {
                stack
                    .last_mut()
                    .expect("key event without an open container")
                    .pending_key = Some((text.clone(), *span));
            }
            ParseEvent::Scalar {
                kind,
                text,
                span,
                anchor,
                alias,
            } => {
                let ptr = pointer_for(&stack);
                let key_text = stack.last().and_then(|f| f.current_key());
                let key_span = stack
                    .last_mut()
                    .and_then(|f| f.pending_key.take())
                    .map(|(_, s)| s);
                let resolved_alias = alias
                    .as_ref()
                    .and_then(|name| anchors.get(name).cloned());
                let node = IrNode {
                    kind: scalar_kind(kind),
                    pointer: ptr.clone(),
                    key: key_text,
                    scalar: Some(text.clone()),
                    children: Vec::new(),
                    loc: Loc {
                        start: key_span.map(|s| s.start).unwrap_or(span.start),
                        end: span.end,
                        key_start: key_span.map(|s| s.start),
                        key_end: key_span.map(|s| s.end),
                        val_start: Some(span.start),
                        val_end: Some(span.end),
                    },
                    alias_target_ptr: resolved_alias,
                };
                let id = arena.push(node);
                if let Some(name) = anchor {
                    anchors.insert(name.clone(), ptr);
                }
                if let Some(frame) = stack.last_mut() {
                    frame.children.push(id);
                    if key_span.is_none() {
                        frame.index += 1;
                    }
                }
                pending_alias = None;
            }
            ParseEvent::DocEnd => {}
        }
    }

    let _ = pending_alias;
    arena
}

/// Per-container bookkeeping while walking the event stream.
struct Frame {
    pointer: String,
    span: Span,
    pending_key: Option<(String, Span)>,
    index: u32,
    children: Vec<NodeId>,
    anchor: Option<String>,
    is_array: Option<bool>,
}

impl Frame {
    fn new_container(pointer: String, span: Span, anchor: Option<String>) -> Self {
        Self {
            pointer,
            span,
            pending_key: None,
            index: 0,
            children: Vec::new(),
            anchor,
            is_array: None,
        }
    }

    /// The key/index this frame's *next child* will be stored under, given
    /// the most recently consumed `Key` event (for maps) or the running
    /// index (for arrays). Only meaningful right when a scalar/container
    /// child is about to be attached.
    fn current_key(&self) -> Option<String> {
        self.pending_key.as_ref().map(|(k, _)| k.clone())
    }
}

fn pointer_for(stack: &[Frame]) -> String {
    match stack.last() {
        None => String::new(),
        Some(frame) => {
            if let Some((key, _)) = &frame.pending_key {
                pointer::child(&frame.pointer, key)
            } else {
                pointer::child(&frame.pointer, &frame.index.to_string())
            }
        }
    }
}

fn finish_container(
    arena: &mut Arena,
    stack: &mut Vec<Frame>,
    end_span: Span,
    kind: Kind,
    anchors: &mut HashMap<String, String>,
) {
    let frame = stack.pop().expect("container end without matching start");
    let key_text = stack.last().and_then(|f| f.current_key());
    let key_span = stack
        .last_mut()
        .and_then(|f| f.pending_key.take())
        .map(|(_, s)| s);
    let node = IrNode {
        kind,
        pointer: frame.pointer.clone(),
        key: key_text,
        scalar: None,
        children: frame.children,
        loc: Loc {
            start: key_span.map(|s| s.start).unwrap_or(frame.span.start),
            end: end_span.end,
            key_start: key_span.map(|s| s.start),
            key_end: key_span.map(|s| s.end),
            val_start: Some(frame.span.start),
            val_end: Some(end_span.end),
        },
        alias_target_ptr: None,
    };
    let id = arena.push(node);
    if let Some(name) = &frame.anchor {
        anchors.insert(name.clone(), frame.pointer.clone());
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(id);
        parent.index += 1;
    }
}

fn scalar_kind(kind: &ScalarKind) -> Kind {
    match kind {
        ScalarKind::String => Kind::String,
        ScalarKind::Number => Kind::Number,
        ScalarKind::Boolean => Kind::Boolean,
        ScalarKind::Null => Kind::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ParseEvent;
    use crate::events::ScalarKind;

    fn span(a: u32, b: u32) -> Span {
        Span::new(a, b)
    }

    #[test]
    fn builds_pointers_for_nested_object() {
        // { "a": { "b": 1 } }
        let events = vec![
            ParseEvent::MapStart { span: span(0, 18), anchor: None },
            ParseEvent::Key { text: "a".into(), span: span(1, 4) },
            ParseEvent::MapStart { span: span(6, 16), anchor: None },
            ParseEvent::Key { text: "b".into(), span: span(7, 10) },
            ParseEvent::Scalar {
                kind: ScalarKind::Number,
                text: "1".into(),
                span: span(12, 13),
                anchor: None,
                alias: None,
            },
            ParseEvent::MapEnd { span: span(15, 16) },
            ParseEvent::MapEnd { span: span(17, 18) },
        ];
        let arena = build(&events);
        let b = arena.find_by_pointer("/a/b").expect("node at /a/b");
        assert_eq!(arena.get(b).kind, Kind::Number);
        assert_eq!(arena.get(b).scalar.as_deref(), Some("1"));
    }

    #[test]
    fn array_children_use_numeric_pointer_segments() {
        let events = vec![
            ParseEvent::SeqStart { span: span(0, 10), anchor: None },
            ParseEvent::Scalar {
                kind: ScalarKind::String,
                text: "x".into(),
                span: span(1, 2),
                anchor: None,
                alias: None,
            },
            ParseEvent::Scalar {
                kind: ScalarKind::String,
                text: "y".into(),
                span: span(4, 5),
                anchor: None,
                alias: None,
            },
            ParseEvent::SeqEnd { span: span(9, 10) },
        ];
        let arena = build(&events);
        assert!(arena.find_by_pointer("/0").is_some());
        assert!(arena.find_by_pointer("/1").is_some());
    }

    #[test]
    fn root_pointer_is_empty_string() {
        let events = vec![
            ParseEvent::MapStart { span: span(0, 2), anchor: None },
            ParseEvent::MapEnd { span: span(0, 2) },
        ];
        let arena = build(&events);
        let root = arena.root().expect("root node");
        assert_eq!(arena.get(root).pointer, "");
    }
}
