//! Validator combinators over a field of the current node, calling into
//! [`RuleCtx::report_at`] on failure (§4.9).

use oaslint_ast::Accessor;
use oaslint_syntax::NodeId;
use regex::Regex;

use crate::runtime::RuleCtx;

/// Reports `message` at `field` if it is absent from the object at `node`.
///
/// Returns whether the field was present.
pub fn required(ctx: &mut RuleCtx, uri: &str, node: NodeId, field: &str, message: &str) -> bool {
    let present = ctx
        .arena(uri)
        .map(|arena| Accessor::new(arena, node).has(field))
        .unwrap_or(false);
    if !present {
        ctx.report_at(uri, node, field, message);
    }
    present
}

/// Reports `message` at `field` if its string value matches any of
/// `patterns`.
///
/// Absent or non-string fields pass silently; pair with [`required`] to
/// also enforce presence.
pub fn forbid_patterns(
    ctx: &mut RuleCtx,
    uri: &str,
    node: NodeId,
    field: &str,
    patterns: &[Regex],
    message: &str,
) -> bool {
    let matched = ctx
        .arena(uri)
        .and_then(|arena| Accessor::new(arena, node).get_string(field).map(str::to_string))
        .map(|value| patterns.iter().any(|re| re.is_match(&value)))
        .unwrap_or(false);
    if matched {
        ctx.report_at(uri, node, field, message);
    }
    !matched
}

#[cfg(test)]
mod tests {
    use oaslint_syntax::document::Format;
    use oaslint_syntax::Document;
    use std::sync::Arc;
    use url::Url;

    use super::*;
    use crate::runtime::RuleOverrides;
    use oaslint_analysis::context::ProjectContext;
    use oaslint_analysis::graph::ReferenceGraph;
    use oaslint_analysis::index::ProjectIndex;

    fn ctx_for(text: &str) -> (RuleCtx, NodeId) {
        let uri = "file:///a.json";
        let doc = Document::parse(Url::parse(uri).unwrap(), Format::Json, text.to_string(), None);
        let root = doc.ir.root().unwrap();
        let mut docs = indexmap::IndexMap::new();
        docs.insert(uri.to_string(), doc);
        let project = Arc::new(ProjectContext {
            docs,
            graph: ReferenceGraph::new(),
            index: ProjectIndex::default(),
            root_uris: vec![uri.to_string()],
            version: "3.1.0".to_string(),
        });
        let ctx = RuleCtx::new(project, "test-rule", oaslint_syntax::Severity::Warning, &RuleOverrides::new());
        (ctx, root)
    }

    #[test]
    fn required_reports_when_absent() {
        let (mut ctx, root) = ctx_for(r#"{"type": "object"}"#);
        assert!(!required(&mut ctx, "file:///a.json", root, "description", "missing"));
    }

    #[test]
    fn required_passes_when_present() {
        let (mut ctx, root) = ctx_for(r#"{"description": "x"}"#);
        assert!(required(&mut ctx, "file:///a.json", root, "description", "missing"));
    }

    #[test]
    fn forbid_patterns_flags_match() {
        let (mut ctx, root) = ctx_for(r#"{"url": "http://example.com"}"#);
        let patterns = vec![Regex::new("^http://").unwrap()];
        assert!(!forbid_patterns(&mut ctx, "file:///a.json", root, "url", &patterns, "insecure"));
    }
}
