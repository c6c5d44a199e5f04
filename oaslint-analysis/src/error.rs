//! Error types owned by the analysis layer (§4.4, §7).

use thiserror::Error;

/// The resolver could not follow a `$ref` chain to a value (§4.4, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnresolvedRefError {
    /// The target document is not part of the project.
    #[error("{ref_str} in {origin_uri} points to an unknown document {target_uri}")]
    UnknownDocument {
        /// The document containing the `$ref`.
        origin_uri: String,
        /// The raw `$ref` string.
        ref_str: String,
        /// The target document's normalised URI.
        target_uri: String,
    },
    /// The target document exists but the fragment pointer is not present
    /// in its IR.
    #[error("{ref_str} in {origin_uri} points to a missing pointer {pointer} in {target_uri}")]
    DanglingPointer {
        /// The document containing the `$ref`.
        origin_uri: String,
        /// The raw `$ref` string.
        ref_str: String,
        /// The target document's normalised URI.
        target_uri: String,
        /// The fragment pointer that was not found.
        pointer: String,
    },
}

/// A `$ref` chain exceeded the bounded follow depth (default 32) without
/// reaching a non-`$ref` value (§4.4).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("reference chain starting at {origin_uri}{origin_pointer} exceeds the maximum depth of {max_depth}")]
pub struct CycleError {
    /// The document the chain started from.
    pub origin_uri: String,
    /// The pointer the chain started from.
    pub origin_pointer: String,
    /// The configured maximum depth.
    pub max_depth: u32,
}
