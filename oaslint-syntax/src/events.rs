//! The format-agnostic parse event stream shared by the JSON and YAML
//! front ends (§4.1, §4.2).
//!
//! Both [`crate::json`] and [`crate::yaml`] lower their respective
//! grammars into this common stream, which [`crate::ir::build`] then
//! lowers into the IR. This is the mechanism, not just the convention,
//! behind the "a rule receives the same IR regardless of source format"
//! guarantee.

use crate::span::Span;

/// The scalar leaf kinds recognised by the IR (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// A string value. Quoted YAML scalars are always strings, even if
    /// their text looks numeric (§4.2).
    String,
    /// A numeric value.
    Number,
    /// A boolean value.
    Boolean,
    /// A null value.
    Null,
}

/// One event in the shared parse stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// The start of an object/mapping. `anchor` carries a YAML anchor
    /// name (`&name`) if one was attached; always `None` for JSON.
    MapStart { span: Span, anchor: Option<String> },
    /// The end of the most recently opened object/mapping.
    MapEnd { span: Span },
    /// The start of an array/sequence.
    SeqStart { span: Span, anchor: Option<String> },
    /// The end of the most recently opened array/sequence.
    SeqEnd { span: Span },
    /// A map entry's key. Always followed by exactly one value event
    /// (`MapStart`, `SeqStart`, or `Scalar`) before any further `Key` or
    /// `MapEnd` event at the same depth.
    Key { text: String, span: Span },
    /// A scalar leaf value. `alias` carries a YAML alias name (`*name`)
    /// when this scalar is a placeholder standing in for an anchor
    /// defined elsewhere; always `None` for JSON.
    Scalar {
        kind: ScalarKind,
        text: String,
        span: Span,
        anchor: Option<String>,
        alias: Option<String>,
    },
    /// Marks the end of the top-level document value.
    DocEnd,
}
