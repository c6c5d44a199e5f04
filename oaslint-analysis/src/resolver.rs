//! Dereferencing a `$ref` to its target IR node (§4.4).

use indexmap::IndexMap;
use oaslint_syntax::Document;
use oaslint_syntax::NodeId;
use thiserror::Error;
use url::Url;

use crate::error::CycleError;
use crate::error::UnresolvedRefError;
use crate::graph::normalize_ref;

/// The default bound on `$ref`-chain length before giving up (§4.4).
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Either failure mode of [`Resolver::deref`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The chain never reached a non-`$ref` value.
    #[error(transparent)]
    Unresolved(#[from] UnresolvedRefError),
    /// The chain exceeded the configured depth bound.
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// A successfully dereferenced value.
#[derive(Debug, Clone)]
pub struct ResolvedRef {
    /// The URI of the document the resolved node lives in.
    pub uri: String,
    /// The resolved node's pointer.
    pub pointer: String,
    /// The resolved node.
    pub node: NodeId,
    /// Every `(uri, pointer)` hop visited en route, starting with the
    /// origin ref and ending with the resolved node's own location — the
    /// `originOf` trace from §4.4, so rules can point a diagnostic back at
    /// whichever hop is most useful.
    pub chain: Vec<(String, String)>,
}

/// Follows `$ref` chains to a concrete IR node (§4.4).
pub struct Resolver<'a> {
    docs: &'a IndexMap<String, Document>,
    max_depth: u32,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given project documents, using the
    /// default maximum chain depth.
    pub fn new(docs: &'a IndexMap<String, Document>) -> Self {
        Self {
            docs,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Dereferences `ref_str` as it appears in `origin_uri`.
    pub fn deref(&self, origin_uri: &str, ref_str: &str) -> Result<ResolvedRef, ResolveError> {
        let mut chain = Vec::new();
        let mut current_origin = origin_uri.to_string();
        let mut current_ref = ref_str.to_string();

        for _ in 0..self.max_depth {
            let origin_url = Url::parse(&current_origin).unwrap_or_else(|_| {
                Url::parse("file:///").expect("file:/// is a valid base URL")
            });
            let (target_uri, pointer) = normalize_ref(&origin_url, &current_ref);
            chain.push((current_origin.clone(), current_ref.clone()));

            let doc = self.docs.get(&target_uri).ok_or_else(|| {
                UnresolvedRefError::UnknownDocument {
                    origin_uri: origin_uri.to_string(),
                    ref_str: ref_str.to_string(),
                    target_uri: target_uri.clone(),
                }
            })?;

            let node_id = doc.ir.find_by_pointer(&pointer).ok_or_else(|| {
                UnresolvedRefError::DanglingPointer {
                    origin_uri: origin_uri.to_string(),
                    ref_str: ref_str.to_string(),
                    target_uri: target_uri.clone(),
                    pointer: pointer.clone(),
                }
            })?;

            let node = doc.ir.get(node_id);
            let next_ref = node.children.iter().find_map(|&id| {
                let child = doc.ir.get(id);
                if child.key.as_deref() == Some("$ref") && child.kind == oaslint_syntax::Kind::String
                {
                    child.scalar.clone()
                } else {
                    None
                }
            });

            match next_ref {
                Some(next) => {
                    current_origin = target_uri;
                    current_ref = next;
                }
                None => {
                    return Ok(ResolvedRef {
                        uri: target_uri,
                        pointer,
                        node: node_id,
                        chain,
                    });
                }
            }
        }

        Err(CycleError {
            origin_uri: origin_uri.to_string(),
            origin_pointer: ref_str.to_string(),
            max_depth: self.max_depth,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use oaslint_syntax::document::Format;
    use oaslint_syntax::Document as Doc;

    use super::*;

    fn doc(uri: &str, text: &str) -> (String, Doc) {
        let url = Url::parse(uri).unwrap();
        (uri.to_string(), Doc::parse(url, Format::Json, text.to_string(), None))
    }

    #[test]
    fn resolves_cross_document_ref() {
        let mut docs = IndexMap::new();
        let (a, a_doc) = doc(
            "file:///a.json",
            r#"{"components": {"schemas": {"Owner": {"$ref": "./b.json#/components/schemas/Pet"}}}}"#,
        );
        docs.insert(a, a_doc);
        let (b, b_doc) = doc(
            "file:///b.json",
            r#"{"components": {"schemas": {"Pet": {"type": "object"}}}}"#,
        );
        docs.insert(b, b_doc);

        let resolver = Resolver::new(&docs);
        let resolved = resolver
            .deref("file:///a.json", "./b.json#/components/schemas/Pet")
            .expect("resolves");
        assert_eq!(resolved.uri, "file:///b.json");
        assert_eq!(resolved.pointer, "/components/schemas/Pet");
    }

    #[test]
    fn dangling_ref_is_unresolved() {
        let mut docs = IndexMap::new();
        let (a, a_doc) = doc("file:///a.json", r#"{}"#);
        docs.insert(a, a_doc);

        let resolver = Resolver::new(&docs);
        let err = resolver
            .deref("file:///a.json", "#/components/schemas/Missing")
            .unwrap_err();
        assert!(matches!(err, ResolveError::Unresolved(_)));
    }

    #[test]
    fn self_referential_chain_exceeds_depth() {
        let mut docs = IndexMap::new();
        let (a, a_doc) = doc("file:///a.json", r##"{"a": {"$ref": "#/a"}}"##);
        docs.insert(a, a_doc);

        let resolver = Resolver::new(&docs);
        let err = resolver.deref("file:///a.json", "#/a").unwrap_err();
        assert!(matches!(err, ResolveError::Cycle(_)));
    }
}
