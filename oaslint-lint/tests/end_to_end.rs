//! End-to-end scenarios from the linter's testable-properties list: one
//! document per bundled rule, each exercising exactly the condition the
//! rule flags.

use std::sync::Arc;

use oaslint_analysis::context::ProjectContext;
use oaslint_analysis::graph::build_graph;
use oaslint_analysis::index::build_index;
use oaslint_lint::Linter;
use oaslint_lint::RuleOverrides;
use oaslint_syntax::document::Format;
use oaslint_syntax::Document;
use tokio_util::sync::CancellationToken;
use url::Url;

fn project_of(uri: &str, text: &str) -> Arc<ProjectContext> {
    let url = Url::parse(uri).unwrap();
    let doc = Document::parse(url, Format::Json, text.to_string(), None);
    let mut docs = indexmap::IndexMap::new();
    docs.insert(uri.to_string(), doc);
    let root_uris = vec![uri.to_string()];
    let graph = build_graph(&docs);
    let index = build_index(&docs, &root_uris);
    Arc::new(ProjectContext {
        docs,
        graph,
        index,
        root_uris,
        version: "3.1.0".to_string(),
    })
}

fn run(uri: &str, text: &str) -> Vec<oaslint_syntax::Diagnostic> {
    let project = project_of(uri, text);
    Linter::new()
        .run(&project, &RuleOverrides::new(), true, &CancellationToken::new())
        .diagnostics
}

#[test]
fn trailing_slash_path_is_flagged() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets/": {"get": {"description": "list", "responses": {}}}}
        }"#,
    );
    assert!(diagnostics.iter().any(|d| d.rule_id == "path-no-trailing-slash"));
}

#[test]
fn lowercase_schema_name_is_flagged() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {},
            "components": {"schemas": {"pet": {"type": "object"}}}
        }"#,
    );
    assert!(diagnostics.iter().any(|d| d.rule_id == "component-schema-name-capital"));
}

#[test]
fn missing_operation_description_is_flagged() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"get": {"responses": {}}}}
        }"#,
    );
    assert!(diagnostics.iter().any(|d| d.rule_id == "operation-description-required"));
}

#[test]
fn dangling_ref_is_flagged() {
    let diagnostics = run(
        "file:///a.json",
        r##"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"get": {"description": "list", "responses": {
                "200": {"description": "ok", "schema": {"$ref": "#/components/schemas/Missing"}}
            }}}}
        }"##,
    );
    assert!(diagnostics.iter().any(|d| d.rule_id == "unresolved-ref" && d.severity == oaslint_syntax::Severity::Error));
}

#[test]
fn insecure_server_url_is_flagged() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "servers": [{"url": "http://api.example.com"}],
            "paths": {}
        }"#,
    );
    assert!(diagnostics.iter().any(|d| d.rule_id == "server-url-https"));
}

#[test]
fn localhost_server_url_is_not_flagged() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "servers": [{"url": "http://localhost:8080"}],
            "paths": {}
        }"#,
    );
    assert!(!diagnostics.iter().any(|d| d.rule_id == "server-url-https"));
}

#[test]
fn missing_pagination_params_produce_two_diagnostics() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"get": {
                "description": "list",
                "responses": {"200": {"description": "ok", "schema": {"type": "array"}}}
            }}}
        }"#,
    );
    let pagination: Vec<_> = diagnostics.iter().filter(|d| d.rule_id == "operation-pagination").collect();
    assert_eq!(pagination.len(), 2);
    assert!(pagination.iter().all(|d| d.severity == oaslint_syntax::Severity::Error));
}

#[test]
fn pagination_params_present_produce_no_diagnostic() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"get": {
                "description": "list",
                "parameters": [{"name": "limit", "in": "query"}, {"name": "offset", "in": "query"}],
                "responses": {"200": {"description": "ok", "schema": {"type": "array"}}}
            }}}
        }"#,
    );
    assert!(!diagnostics.iter().any(|d| d.rule_id == "operation-pagination"));
}

#[test]
fn parse_error_is_emitted_as_synthetic_diagnostic() {
    let diagnostics = run("file:///a.json", r#"{"openapi": "3.1.0", "info": {"#);
    assert!(diagnostics.iter().any(|d| d.rule_id == oaslint_lint::PARSE_ERROR_RULE_ID));
}

#[test]
fn diagnostics_are_sorted_deterministically() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets/": {"get": {"responses": {}}}}
        }"#,
    );
    let mut sorted = diagnostics.clone();
    sorted.sort_by(|a, b| {
        (&a.uri, a.range.start.line, a.range.start.character, &a.rule_id, &a.message)
            .cmp(&(&b.uri, b.range.start.line, b.range.start.character, &b.rule_id, &b.message))
    });
    assert_eq!(diagnostics, sorted);
}

#[test]
fn every_diagnostic_has_a_valid_range() {
    let diagnostics = run(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets/": {"get": {"responses": {}}}}
        }"#,
    );
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(oaslint_syntax::Diagnostic::has_valid_range));
}

#[test]
fn off_override_suppresses_a_rule() {
    let project = project_of(
        "file:///a.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets/": {"get": {"description": "list", "responses": {}}}}
        }"#,
    );
    let mut overrides = RuleOverrides::new();
    overrides.set("path-no-trailing-slash", oaslint_syntax::Severity::Off);
    let diagnostics = Linter::new()
        .run(&project, &overrides, true, &CancellationToken::new())
        .diagnostics;
    assert!(!diagnostics.iter().any(|d| d.rule_id == "path-no-trailing-slash"));
}

#[test]
fn cross_file_rules_are_skipped_when_not_allowed() {
    let project = project_of(
        "file:///a.json",
        r##"{
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"get": {"description": "list", "responses": {
                "200": {"description": "ok", "schema": {"$ref": "#/components/schemas/Missing"}}
            }}}}
        }"##,
    );
    let diagnostics = Linter::new()
        .run(&project, &RuleOverrides::new(), false, &CancellationToken::new())
        .diagnostics;
    assert!(!diagnostics.iter().any(|d| d.rule_id == "unresolved-ref"));
}
