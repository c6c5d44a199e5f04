//! Documents: a single parsed file identified by a normalised URI (§3).

use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::time::SystemTime;

use url::Url;

use crate::error::IoError;
use crate::error::ParseError;
use crate::ir;
use crate::ir::Arena;
use crate::span::LineOffsets;
use crate::{json, yaml};

/// The two document formats the loader understands (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// A `.json` file.
    Json,
    /// A `.yaml`/`.yml` file.
    Yaml,
}

impl Format {
    /// Infers the format from a URI's file extension.
    pub fn from_uri(uri: &Url) -> Result<Self, IoError> {
        let path = uri.path();
        if path.ends_with(".json") {
            Ok(Format::Json)
        } else if path.ends_with(".yaml") || path.ends_with(".yml") {
            Ok(Format::Yaml)
        } else {
            Err(IoError::UnsupportedFormat(uri.to_string()))
        }
    }
}

/// A single loaded and parsed document (§3).
///
/// `hash` determines cache identity: two documents with equal hash are
/// defined to have structurally identical IR, so callers may use it as a
/// cheap proxy for full IR equality (e.g. in the project-context cache
/// key, §6).
#[derive(Debug)]
pub struct Document {
    /// The document's normalised URI (any fragment stripped).
    pub uri: Url,
    /// The detected format.
    pub format: Format,
    /// The raw source text.
    pub text: String,
    /// A content hash of `text`.
    pub hash: u64,
    /// Best-effort modification time, if the filesystem port provided one.
    pub mtime: Option<SystemTime>,
    /// The lowered IR.
    pub ir: Arena,
    /// Parse errors, if any; a non-empty list means a `parse-error`
    /// diagnostic should be synthesised and no other rules should run
    /// against this document (§4.1, §7).
    pub parse_errors: Vec<ParseError>,
    /// The shared line-offset table for this document's text.
    pub lines: LineOffsets,
}

impl Document {
    /// Parses `text` as the given format into a [`Document`].
    ///
    /// `uri` is normalised by stripping any fragment, since fragments are
    /// document-level addressing, not file identity (§6).
    pub fn parse(mut uri: Url, format: Format, text: String, mtime: Option<SystemTime>) -> Self {
        uri.set_fragment(None);

        let (events, parse_errors) = match format {
            Format::Json => json::parse(&text),
            Format::Yaml => yaml::parse(&text),
        };
        let ir = ir::build(&events);
        let hash = content_hash(&text);
        let lines = LineOffsets::new(&text);

        Self {
            uri,
            format,
            text,
            hash,
            mtime,
            ir,
            parse_errors,
            lines,
        }
    }

    /// Whether this document failed to parse.
    pub fn has_parse_errors(&self) -> bool {
        !self.parse_errors.is_empty()
    }
}

fn content_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            Format::from_uri(&Url::parse("file:///a/b.json").unwrap()).unwrap(),
            Format::Json
        );
        assert_eq!(
            Format::from_uri(&Url::parse("file:///a/b.yaml").unwrap()).unwrap(),
            Format::Yaml
        );
        assert!(Format::from_uri(&Url::parse("file:///a/b.txt").unwrap()).is_err());
    }

    #[test]
    fn equal_text_has_equal_hash() {
        let a = Document::parse(
            Url::parse("file:///a.json").unwrap(),
            Format::Json,
            "{}".to_string(),
            None,
        );
        let b = Document::parse(
            Url::parse("file:///b.json").unwrap(),
            Format::Json,
            "{}".to_string(),
            None,
        );
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn fragment_is_stripped_from_uri() {
        let doc = Document::parse(
            Url::parse("file:///a.json#/components").unwrap(),
            Format::Json,
            "{}".to_string(),
            None,
        );
        assert_eq!(doc.uri.fragment(), None);
    }
}
