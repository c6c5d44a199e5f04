//! Project-wide analysis: the `$ref` graph, the chain-following resolver,
//! the derived project index, root discovery, the context resolver, and
//! the shared caches that sit above `oaslint-ast`'s per-document view.

#![warn(missing_docs)]

pub mod cache;
pub mod context;
pub mod error;
pub mod fs;
pub mod graph;
pub mod index;
pub mod resolver;

pub use cache::ProjectCache;
pub use cache::SharedDocTypeCache;
pub use context::resolve_linting_context;
pub use context::LintingContext;
pub use context::Preference;
pub use context::ProjectContext;
pub use error::CycleError;
pub use error::UnresolvedRefError;
pub use fs::EntryKind;
pub use fs::Filesystem;
pub use fs::Stat;
pub use graph::GraphNode;
pub use graph::ReferenceGraph;
pub use index::Location;
pub use index::ProjectIndex;
pub use resolver::ResolveError;
pub use resolver::ResolvedRef;
pub use resolver::Resolver;
