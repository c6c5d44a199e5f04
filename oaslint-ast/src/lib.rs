//! Document-type classification, typed IR accessors, and visitor dispatch
//! layered over `oaslint-syntax`'s format-agnostic IR.
//!
//! This crate turns a bare [`oaslint_syntax::Arena`] into something a rule
//! can reason about in OpenAPI terms: "is this node a schema, a parameter,
//! a path item?" (`classify`), "what's the value of this field?"
//! (`accessor`), and "walk every reachable document and tell me about every
//! operation/schema/reference in it" (`visitor`).

#![warn(missing_docs)]

pub mod accessor;
pub mod classify;
pub mod visitor;

pub use accessor::Accessor;
pub use classify::identify_document_type;
pub use classify::ClassifierCache;
pub use classify::DocumentType;
pub use visitor::dispatch;
pub use visitor::ComponentRef;
pub use visitor::DocumentRef;
pub use visitor::NodeRef;
pub use visitor::OperationRef;
pub use visitor::PathItemRef;
pub use visitor::ProjectView;
pub use visitor::ReferenceRef;
pub use visitor::RootRef;
pub use visitor::VisitReason;
pub use visitor::Visitor;
