//! The document-type classifier (§4.3): a pure predicate over an object
//! node's shape, plus an LRU cache keyed by URI and content hash.

use indexmap::IndexMap;

use crate::accessor::Accessor;

/// The classification tags from §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// An OpenAPI root document.
    Root,
    /// A path-item object.
    PathItem,
    /// An operation object.
    Operation,
    /// A `components` container.
    Components,
    /// A schema object.
    Schema,
    /// A parameter object.
    Parameter,
    /// A response object.
    Response,
    /// A security-scheme object.
    SecurityScheme,
    /// An example object.
    Example,
    /// None of the above.
    Unknown,
}

const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Classifies an object node's shape. Depends only on the accessor's own
/// fields (§8 classification-purity property): equal shapes yield equal
/// tags, regardless of where the node lives.
pub fn identify_document_type(acc: &Accessor<'_>) -> DocumentType {
    if acc.get_string("openapi").is_some() || acc.get_string("swagger").is_some() {
        return DocumentType::Root;
    }
    if acc.has("info") || acc.has("paths") || acc.has("components") || acc.has("webhooks") {
        return DocumentType::Root;
    }
    if HTTP_METHODS
        .iter()
        .any(|m| acc.get_object(m).is_some())
    {
        return DocumentType::PathItem;
    }
    if (acc.has("operationId") || acc.has("summary")) && acc.get_object("responses").is_some() {
        return DocumentType::Operation;
    }
    if acc.has("components") {
        return DocumentType::Components;
    }
    let scheme_type = acc.get_string("type");
    if matches!(
        scheme_type,
        Some("apiKey") | Some("http") | Some("oauth2") | Some("openIdConnect")
    ) || acc.has("flows")
    {
        return DocumentType::SecurityScheme;
    }
    if (acc.has("value") || acc.has("externalValue"))
        && (acc.has("summary") || acc.has("description"))
    {
        return DocumentType::Example;
    }
    if acc.get_string("name").is_some() && acc.get_string("in").is_some() {
        return DocumentType::Parameter;
    }
    if acc.has("description") && (acc.has("content") || acc.has("schema")) {
        return DocumentType::Response;
    }
    if scheme_type.is_some()
        || acc.has("$ref")
        || acc.has("allOf")
        || acc.has("oneOf")
        || acc.has("anyOf")
    {
        return DocumentType::Schema;
    }
    DocumentType::Unknown
}

/// An LRU cache of classification results, keyed by `(uri, content hash)`
/// per §4.3.
pub struct ClassifierCache {
    capacity: usize,
    entries: IndexMap<(String, u64), DocumentType>,
}

impl ClassifierCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
        }
    }

    /// Returns the cached classification for `(uri, hash)`, if any, marking
    /// it most-recently-used.
    pub fn get(&mut self, uri: &str, hash: u64) -> Option<DocumentType> {
        let key = (uri.to_string(), hash);
        let value = self.entries.shift_remove(&key)?;
        self.entries.insert(key, value);
        Some(value)
    }

    /// Inserts a classification result, evicting the least-recently-used
    /// entry if the cache is at capacity.
    pub fn insert(&mut self, uri: String, hash: u64, ty: DocumentType) {
        let key = (uri, hash);
        self.entries.shift_remove(&key);
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, ty);
    }

    /// Drops every cached classification for `uri`, regardless of hash.
    pub fn invalidate(&mut self, uri: &str) {
        self.entries.retain(|(u, _), _| u != uri);
    }
}

#[cfg(test)]
mod tests {
    use oaslint_syntax::ir;
    use oaslint_syntax::json;

    use super::*;

    fn classify_json(text: &str) -> DocumentType {
        let (events, _) = json::parse(text);
        let arena = ir::build(&events);
        let root = arena.root().unwrap();
        identify_document_type(&Accessor::new(&arena, root))
    }

    #[test]
    fn classifies_root_by_openapi_field() {
        assert_eq!(classify_json(r#"{"openapi": "3.1.0", "info": {}}"#), DocumentType::Root);
    }

    #[test]
    fn classifies_path_item_by_method_key() {
        assert_eq!(
            classify_json(r#"{"get": {"responses": {}}}"#),
            DocumentType::PathItem
        );
    }

    #[test]
    fn classifies_operation_over_path_item_when_nested_alone() {
        assert_eq!(
            classify_json(r#"{"operationId": "listPets", "responses": {"200": {}}}"#),
            DocumentType::Operation
        );
    }

    #[test]
    fn classifies_schema_by_type_field() {
        assert_eq!(classify_json(r#"{"type": "string"}"#), DocumentType::Schema);
    }

    #[test]
    fn classification_is_pure() {
        let a = classify_json(r#"{"name": "id", "in": "query"}"#);
        let b = classify_json(r#"{"name": "id", "in": "query"}"#);
        assert_eq!(a, b);
        assert_eq!(a, DocumentType::Parameter);
    }

    #[test]
    fn lru_cache_evicts_oldest_entry() {
        let mut cache = ClassifierCache::new(2);
        cache.insert("a".into(), 1, DocumentType::Root);
        cache.insert("b".into(), 1, DocumentType::Schema);
        cache.insert("c".into(), 1, DocumentType::Unknown);
        assert!(cache.get("a", 1).is_none());
        assert!(cache.get("b", 1).is_some());
        assert!(cache.get("c", 1).is_some());
    }
}
