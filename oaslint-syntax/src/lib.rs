//! Format-agnostic parsing, the shared intermediate representation, and the
//! diagnostic/patch wire types that sit underneath `oaslint`'s analysis and
//! lint layers.
//!
//! This crate owns everything up to and including the IR (§3, §4.1, §4.2):
//! JSON and YAML front ends that both lower into one [`events::ParseEvent`]
//! stream, the arena-backed [`ir::Arena`] that stream is built into, JSON
//! Pointer helpers, byte-offset/line-position conversion, and the
//! [`diagnostic::Diagnostic`]/[`diagnostic::FilePatch`] types rules and
//! fixes are expressed in. Nothing in this crate knows what an OpenAPI
//! document looks like; that begins one layer up, in `oaslint-ast`.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod document;
pub mod error;
pub mod events;
pub mod ir;
pub mod json;
pub mod pointer;
pub mod span;
pub mod yaml;

pub use diagnostic::Diagnostic;
pub use diagnostic::FilePatch;
pub use diagnostic::PatchOp;
pub use diagnostic::Severity;
pub use document::Document;
pub use document::Format;
pub use error::IoError;
pub use error::ParseError;
pub use events::ParseEvent;
pub use events::ScalarKind;
pub use ir::Arena;
pub use ir::IrNode;
pub use ir::Kind;
pub use ir::NodeId;
pub use span::LineOffsets;
pub use span::Position;
pub use span::Range;
pub use span::Span;
