//! The filesystem port consumed by the core (§6).
//!
//! The core never touches `std::fs` directly; every read goes through this
//! trait so the engine can run against an in-memory workspace in tests and
//! a real filesystem in the CLI (`oaslint-cli`).

use oaslint_syntax::IoError;

/// The kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Anything else (symlink to nowhere, device file, ...).
    Other,
}

/// Metadata about a URI, as returned by [`Filesystem::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    /// The entry's kind.
    pub kind: EntryKind,
    /// Size in bytes, for files.
    pub size: u64,
}

/// The filesystem abstraction the analysis layer is built against (§6).
///
/// All methods take and return URIs, with fragments stripped by the caller
/// before the call, per §6's "fragments are document-level, not file-level"
/// rule.
pub trait Filesystem: Send + Sync {
    /// Reads the full contents of `uri`.
    fn read(&self, uri: &str) -> Result<Vec<u8>, IoError>;

    /// Returns metadata for `uri`, or `None` if it does not exist.
    fn stat(&self, uri: &str) -> Option<Stat>;

    /// Lists the immediate entries of the directory at `uri`.
    fn read_directory(&self, uri: &str) -> Result<Vec<(String, EntryKind)>, IoError>;

    /// Expands a set of Prettier-style glob patterns (`**`, `*`, `?`, `[]`,
    /// `{,}`) into matching URIs. Patterns prefixed with `!` exclude
    /// matches of the remaining patterns rather than adding to them.
    fn glob(&self, patterns: &[String]) -> Result<Vec<String>, IoError>;
}

/// Strips a URI's fragment, per §6: filesystem operations never see a
/// fragment, since fragments are document-level addressing.
pub fn strip_fragment(uri: &str) -> &str {
    match uri.find('#') {
        Some(idx) => &uri[..idx],
        None => uri,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_fragment_removes_trailing_fragment() {
        assert_eq!(strip_fragment("file:///a.yaml#/components"), "file:///a.yaml");
        assert_eq!(strip_fragment("file:///a.yaml"), "file:///a.yaml");
    }
}
