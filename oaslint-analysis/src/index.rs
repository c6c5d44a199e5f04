//! The project index: derived lookup tables built once per project (§4.5).

use std::collections::HashMap;
use std::collections::HashSet;

use indexmap::IndexMap;
use oaslint_ast::Accessor;
use oaslint_syntax::Document;

const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const COMPONENT_SECTIONS: &[&str] = &[
    "schemas",
    "parameters",
    "responses",
    "requestBodies",
    "securitySchemes",
    "examples",
    "headers",
    "links",
    "callbacks",
];

/// A `(uri, pointer)` location, as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// The owning document's URI.
    pub uri: String,
    /// The node's JSON Pointer.
    pub pointer: String,
}

/// Derived views over a project's reachable root documents (§4.5).
///
/// Rebuilt whenever the project's document set changes; never mutated
/// during rule execution.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    /// `operationId` -> every operation declared with that id (duplicates
    /// are preserved so rules can flag them).
    pub operations_by_id: HashMap<String, Vec<Location>>,
    /// Path template -> the path-item's location.
    pub operations_by_path: HashMap<String, Location>,
    /// `components` section name -> component name -> its location.
    pub components_by_section: HashMap<String, HashMap<String, Location>>,
    /// Every tag name declared at a root's `tags` array.
    pub tag_names: HashSet<String>,
}

/// Builds the project index from every root document in `docs`.
pub fn build_index(docs: &IndexMap<String, Document>, root_uris: &[String]) -> ProjectIndex {
    let mut index = ProjectIndex::default();

    for uri in root_uris {
        let Some(doc) = docs.get(uri) else { continue };
        let Some(root_id) = doc.ir.root() else { continue };
        let root = Accessor::new(&doc.ir, root_id);

        if let Some(paths) = root.entries("paths") {
            for (template, item_acc) in paths {
                index.operations_by_path.insert(
                    template.to_string(),
                    Location {
                        uri: uri.clone(),
                        pointer: item_acc.raw().pointer.clone(),
                    },
                );

                for &method in HTTP_METHODS {
                    let Some(op) = item_acc.get_object(method) else {
                        continue;
                    };
                    if let Some(id) = op.get_string("operationId") {
                        index
                            .operations_by_id
                            .entry(id.to_string())
                            .or_default()
                            .push(Location {
                                uri: uri.clone(),
                                pointer: op.raw().pointer.clone(),
                            });
                    }
                }
            }
        }

        if let Some(components) = root.get_object("components") {
            for &section in COMPONENT_SECTIONS {
                let Some(entries) = components.entries(section) else {
                    continue;
                };
                let bucket = index
                    .components_by_section
                    .entry(section.to_string())
                    .or_default();
                for (name, entry_acc) in entries {
                    bucket.insert(
                        name.to_string(),
                        Location {
                            uri: uri.clone(),
                            pointer: entry_acc.raw().pointer.clone(),
                        },
                    );
                }
            }
        }

        if let Some(tags) = root.get_array("tags") {
            for &tag_id in tags {
                let tag_acc = Accessor::new(&doc.ir, tag_id);
                if let Some(name) = tag_acc.get_string("name") {
                    index.tag_names.insert(name.to_string());
                }
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use oaslint_syntax::document::Format;
    use url::Url;

    use super::*;

    #[test]
    fn indexes_operations_and_components() {
        let text = r#"{
            "paths": {
                "/pets": {"get": {"operationId": "listPets", "responses": {}}}
            },
            "components": {"schemas": {"Pet": {"type": "object"}}},
            "tags": [{"name": "pets"}]
        }"#;
        let doc = Document::parse(
            Url::parse("file:///a.json").unwrap(),
            Format::Json,
            text.to_string(),
            None,
        );
        let mut docs = IndexMap::new();
        docs.insert("file:///a.json".to_string(), doc);

        let index = build_index(&docs, &["file:///a.json".to_string()]);
        assert!(index.operations_by_id.contains_key("listPets"));
        assert!(index.operations_by_path.contains_key("/pets"));
        assert!(index
            .components_by_section
            .get("schemas")
            .unwrap()
            .contains_key("Pet"));
        assert!(index.tag_names.contains("pets"));
    }
}
