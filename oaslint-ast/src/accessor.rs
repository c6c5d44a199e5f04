//! Typed getters over an IR object node (§4.9 rule-author surface).
//!
//! An [`Accessor`] never panics on an absent field or a field of the wrong
//! shape; every getter returns `None` in that case, mirroring the source
//! protocol's "absent field returns `undefined`" contract.

use oaslint_syntax::Arena;
use oaslint_syntax::IrNode;
use oaslint_syntax::Kind;
use oaslint_syntax::NodeId;

/// A read-only view over one IR node, with typed field lookups for object
/// nodes.
#[derive(Debug, Clone, Copy)]
pub struct Accessor<'a> {
    arena: &'a Arena,
    id: NodeId,
}

impl<'a> Accessor<'a> {
    /// Wraps a node for typed access.
    pub fn new(arena: &'a Arena, id: NodeId) -> Self {
        Self { arena, id }
    }

    /// The underlying node.
    pub fn raw(&self) -> &'a IrNode {
        self.arena.get(self.id)
    }

    /// The node's own id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether an object field named `key` is present.
    pub fn has(&self, key: &str) -> bool {
        self.child(key).is_some()
    }

    /// The child node stored under `key`, if `self` is an object and the key
    /// is present.
    fn child(&self, key: &str) -> Option<NodeId> {
        let node = self.raw();
        if node.kind != Kind::Object {
            return None;
        }
        node.children
            .iter()
            .copied()
            .find(|id| self.arena.get(*id).key.as_deref() == Some(key))
    }

    /// The string value of field `key`, or `None` if absent or not a string.
    pub fn get_string(&self, key: &str) -> Option<&'a str> {
        let id = self.child(key)?;
        let node = self.arena.get(id);
        if node.kind == Kind::String {
            node.scalar.as_deref()
        } else {
            None
        }
    }

    /// The child ids of an array field `key`, or `None` if absent or not an
    /// array.
    pub fn get_array(&self, key: &str) -> Option<&'a [NodeId]> {
        let id = self.child(key)?;
        let node = self.arena.get(id);
        if node.kind == Kind::Array {
            Some(&node.children)
        } else {
            None
        }
    }

    /// An accessor over the object field `key`, or `None` if absent or not
    /// an object.
    pub fn get_object(&self, key: &str) -> Option<Accessor<'a>> {
        let id = self.child(key)?;
        if self.arena.get(id).kind == Kind::Object {
            Some(Accessor::new(self.arena, id))
        } else {
            None
        }
    }

    /// The entries of an object field `key` as `(name, Accessor)` pairs, in
    /// source order, or `None` if absent or not an object.
    pub fn entries(&self, key: &str) -> Option<Vec<(&'a str, Accessor<'a>)>> {
        let obj = self.get_object(key)?;
        Some(
            obj.raw()
                .children
                .iter()
                .filter_map(|id| {
                    let node = self.arena.get(*id);
                    let name = node.key.as_deref()?;
                    Some((name, Accessor::new(self.arena, *id)))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use oaslint_syntax::ir;
    use oaslint_syntax::json;

    use super::*;

    #[test]
    fn reads_typed_fields() {
        let (events, _) = json::parse(r#"{"name": "Pet", "tags": ["a", "b"], "nested": {"x": 1}}"#);
        let arena = ir::build(&events);
        let root = arena.root().unwrap();
        let acc = Accessor::new(&arena, root);

        assert_eq!(acc.get_string("name"), Some("Pet"));
        assert!(acc.has("tags"));
        assert_eq!(acc.get_array("tags").unwrap().len(), 2);
        assert!(acc.get_object("nested").is_some());
        assert_eq!(acc.get_string("missing"), None);
        assert_eq!(acc.get_string("tags"), None);
    }
}
