//! A small fluent builder over [`PatchOp`]/[`FilePatch`] (§4.9).

use oaslint_syntax::pointer;
use oaslint_syntax::FilePatch;
use oaslint_syntax::PatchOp;
use serde_json::Value;

/// Accumulates JSON-Patch operations against one document, to be attached
/// to a diagnostic with [`crate::runtime::RuleCtx::fix`].
pub struct FixBuilder {
    uri: String,
    ops: Vec<PatchOp>,
}

impl FixBuilder {
    /// Starts a fix targeting `uri`.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ops: Vec::new(),
        }
    }

    /// Adds a field to the object at `parent_pointer`.
    pub fn add_field(self, parent_pointer: &str, field: &str, value: Value) -> Self {
        self.add_at_path(&pointer::child(parent_pointer, field), value)
    }

    /// Sets (replaces) a field on the object at `parent_pointer`.
    pub fn set_field(self, parent_pointer: &str, field: &str, value: Value) -> Self {
        self.set_at_path(&pointer::child(parent_pointer, field), value)
    }

    /// Removes a field from the object at `parent_pointer`.
    pub fn remove_field(self, parent_pointer: &str, field: &str) -> Self {
        self.remove_at_path(&pointer::child(parent_pointer, field))
    }

    /// Adds a value at an explicit JSON Pointer path.
    pub fn add_at_path(self, path: &str, value: Value) -> Self {
        self.add_op(PatchOp::Add {
            path: path.to_string(),
            value,
        })
    }

    /// Replaces the value at an explicit JSON Pointer path.
    pub fn set_at_path(self, path: &str, value: Value) -> Self {
        self.add_op(PatchOp::Replace {
            path: path.to_string(),
            value,
        })
    }

    /// Removes the value at an explicit JSON Pointer path.
    pub fn remove_at_path(self, path: &str) -> Self {
        self.add_op(PatchOp::Remove {
            path: path.to_string(),
        })
    }

    /// Appends a raw [`PatchOp`].
    pub fn add_op(mut self, op: PatchOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Whether any operation has been added yet.
    pub fn has_ops(&self) -> bool {
        !self.ops.is_empty()
    }

    /// Finalizes the builder into a [`FilePatch`].
    pub fn build(self) -> FilePatch {
        FilePatch {
            uri: self.uri,
            ops: self.ops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_add_field_patch() {
        let patch = FixBuilder::new("file:///a.json")
            .add_field("/paths/~1pets", "description", Value::String("ok".into()))
            .build();
        assert_eq!(patch.ops.len(), 1);
        assert!(matches!(&patch.ops[0], PatchOp::Add { path, .. } if path == "/paths/~1pets/description"));
    }

    #[test]
    fn empty_builder_has_no_ops() {
        assert!(!FixBuilder::new("file:///a.json").has_ops());
    }
}
