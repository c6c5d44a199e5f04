//! The diagnostic and fix envelopes emitted by the engine (§3, §6).

use serde::Deserialize;
use serde::Serialize;

use crate::span::Range;

/// Diagnostic severity, mapped to LSP's `error=1, warning=2, info=3,
/// hint=4` on the wire (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suppresses emission entirely; never appears on an emitted diagnostic.
    Off,
    /// Informational hint.
    Hint,
    /// Informational, non-blocking.
    Info,
    /// Should usually be fixed.
    Warning,
    /// Must be fixed.
    Error,
}

impl Severity {
    /// The LSP wire value for this severity (`1..=4`), or `None` for `Off`.
    pub fn lsp_code(self) -> Option<u8> {
        match self {
            Severity::Off => None,
            Severity::Error => Some(1),
            Severity::Warning => Some(2),
            Severity::Info => Some(3),
            Severity::Hint => Some(4),
        }
    }
}

/// One JSON-Patch operation (`add`/`replace`/`remove`) against a target
/// document, addressed by RFC 6901 path (§3, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    /// Adds a value at `path`.
    Add {
        /// The JSON Pointer path.
        path: String,
        /// The value to add.
        value: serde_json::Value,
    },
    /// Replaces the value at `path`.
    Replace {
        /// The JSON Pointer path.
        path: String,
        /// The replacement value.
        value: serde_json::Value,
    },
    /// Removes the value at `path`.
    Remove {
        /// The JSON Pointer path.
        path: String,
    },
}

/// A set of patch operations against one document (§3, §6).
///
/// Patches are advisory: the engine computes and attaches them but never
/// writes them back to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePatch {
    /// The document the operations apply to.
    pub uri: String,
    /// The ordered list of operations.
    pub ops: Vec<PatchOp>,
}

/// A single lint diagnostic (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The document the diagnostic applies to.
    pub uri: String,
    /// The `[start, end)` range, computed from a shared line-offset table.
    pub range: Range,
    /// The effective severity after override resolution (§4.8).
    pub severity: Severity,
    /// The human-readable message.
    pub message: String,
    /// The rule that produced the diagnostic, or a synthetic id such as
    /// `parse-error` / `load-error`.
    pub rule_id: String,
    /// An optional machine-readable code, distinct from `rule_id`.
    pub code: Option<String>,
    /// The engine name, reported as the diagnostic's `source` (§6).
    pub source: Option<String>,
    /// Fixes attached via `ctx.fix` (§4.9).
    pub fixes: Vec<FilePatch>,
}

impl Diagnostic {
    /// Returns whether the diagnostic's range satisfies §8's range-validity
    /// property.
    pub fn has_valid_range(&self) -> bool {
        self.range.is_valid()
    }
}
