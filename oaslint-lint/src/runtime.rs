//! The rule runtime: severity resolution, range computation, fix
//! attachment, rule isolation and deterministic ordering (§4.8).

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use oaslint_analysis::ProjectContext;
use oaslint_ast::dispatch;
use oaslint_syntax::Diagnostic;
use oaslint_syntax::FilePatch;
use oaslint_syntax::Kind;
use oaslint_syntax::NodeId;
use oaslint_syntax::Range;
use oaslint_syntax::Severity;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

use crate::rule::Rule;
use crate::rule::Scope;

/// The engine's name, reported as each diagnostic's `source` (§6).
pub const ENGINE_SOURCE: &str = "oaslint";

/// The synthetic rule id the runtime emits for documents that failed to
/// parse (§7): these never run through a [`Rule`], so they have no entry
/// in [`crate::rules::rules`].
pub const PARSE_ERROR_RULE_ID: &str = "parse-error";

/// Per-rule, per-project severity overrides (§4.8): `rule_id -> severity`,
/// with `Severity::Off` suppressing emission entirely.
#[derive(Debug, Clone, Default)]
pub struct RuleOverrides(HashMap<String, Severity>);

impl RuleOverrides {
    /// An empty override set: every rule runs at its own default severity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides `rule_id`'s effective severity.
    pub fn set(&mut self, rule_id: impl Into<String>, severity: Severity) {
        self.0.insert(rule_id.into(), severity);
    }

    /// The configured override for `rule_id`, if any.
    pub fn get(&self, rule_id: &str) -> Option<Severity> {
        self.0.get(rule_id).copied()
    }
}

/// The shared state every rule's visitor receives (§4.9): reporting,
/// range-location, and fix-attachment, plus read access to the project.
///
/// Built fresh for each `(rule, project)` pair so one rule's diagnostics
/// never leak into another's, and so a panicking rule cannot corrupt a
/// sibling rule's output (§4.8's rule-isolation guarantee).
pub struct RuleCtx {
    project: Arc<ProjectContext>,
    rule_id: &'static str,
    default_severity: Severity,
    effective_severity: Severity,
    diagnostics: Vec<Diagnostic>,
    last_index: Option<usize>,
}

impl RuleCtx {
    pub(crate) fn new(project: Arc<ProjectContext>, rule_id: &'static str, default_severity: Severity, overrides: &RuleOverrides) -> Self {
        let effective_severity = overrides.get(rule_id).unwrap_or(default_severity);
        Self {
            project,
            rule_id,
            default_severity,
            effective_severity,
            diagnostics: Vec::new(),
            last_index: None,
        }
    }

    /// The IR arena for `uri`, if it belongs to this project.
    pub fn arena(&self, uri: &str) -> Option<&oaslint_syntax::Arena> {
        self.project.docs.get(uri).map(|d| &d.ir)
    }

    /// The project this rule is running over.
    pub fn project(&self) -> &ProjectContext {
        &self.project
    }

    /// This rule's severity before any config override was applied.
    pub fn default_severity(&self) -> Severity {
        self.default_severity
    }

    /// Reports a diagnostic at an explicit range.
    ///
    /// Does nothing if the rule's effective severity is [`Severity::Off`].
    pub fn report(&mut self, uri: &str, range: Range, message: impl Into<String>) {
        if self.effective_severity == Severity::Off {
            return;
        }
        self.diagnostics.push(Diagnostic {
            uri: uri.to_string(),
            range,
            severity: self.effective_severity,
            message: message.into(),
            rule_id: self.rule_id.to_string(),
            code: None,
            source: Some(ENGINE_SOURCE.to_string()),
            fixes: Vec::new(),
        });
        self.last_index = Some(self.diagnostics.len() - 1);
    }

    /// Reports a diagnostic on the key-range of `field` within `node`.
    ///
    /// Falls back to `field`'s own value range if it has no key span, then
    /// to `node`'s own value range if `field` is absent entirely (§4.9).
    pub fn report_at(&mut self, uri: &str, node: NodeId, field: &str, message: impl Into<String>) {
        let Some(range) = self.field_range(uri, node, field) else {
            return;
        };
        self.report(uri, range, message);
    }

    /// Reports a diagnostic on `node`'s own natural location: its key
    /// range if it is a map entry, otherwise its value range (§4.9).
    pub fn report_here(&mut self, uri: &str, node: NodeId, message: impl Into<String>) {
        let Some(range) = self.node_key_or_value_range(uri, node) else {
            return;
        };
        self.report(uri, range, message);
    }

    fn field_range(&self, uri: &str, node: NodeId, field: &str) -> Option<Range> {
        let arena = self.arena(uri)?;
        let parent = arena.get(node);
        if parent.kind != Kind::Object {
            return self.node_key_or_value_range(uri, node);
        }
        let child_id = parent
            .children
            .iter()
            .copied()
            .find(|&id| arena.get(id).key.as_deref() == Some(field));
        match child_id {
            Some(id) => self.node_key_or_value_range(uri, id),
            None => self.node_key_or_value_range(uri, node),
        }
    }

    fn node_key_or_value_range(&self, uri: &str, node: NodeId) -> Option<Range> {
        let doc = self.project.docs.get(uri)?;
        let n = doc.ir.get(node);
        let span = n.loc.key_span().unwrap_or_else(|| n.loc.value_span());
        Some(doc.lines.range(span))
    }

    /// The key-range of `key` within the object at `parent_pointer`, if
    /// both exist (§4.9's `ctx.findKeyRange`).
    pub fn find_key_range(&self, uri: &str, parent_pointer: &str, key: &str) -> Option<Range> {
        let doc = self.project.docs.get(uri)?;
        let parent_id = doc.ir.find_by_pointer(parent_pointer)?;
        let parent = doc.ir.get(parent_id);
        let child_id = parent
            .children
            .iter()
            .copied()
            .find(|&id| doc.ir.get(id).key.as_deref() == Some(key))?;
        let child = doc.ir.get(child_id);
        let span = child.loc.key_span()?;
        Some(doc.lines.range(span))
    }

    /// The value range of the node at `pointer`, if it exists (§4.9's
    /// `ctx.locate`).
    pub fn locate(&self, uri: &str, pointer: &str) -> Option<Range> {
        let doc = self.project.docs.get(uri)?;
        let id = doc.ir.find_by_pointer(pointer)?;
        Some(doc.lines.range(doc.ir.get(id).loc.value_span()))
    }

    /// Converts a raw byte span into a document-relative range (§4.9's
    /// `ctx.offsetToRange`).
    pub fn offset_to_range(&self, uri: &str, start: u32, end: u32) -> Option<Range> {
        let doc = self.project.docs.get(uri)?;
        Some(doc.lines.range(oaslint_syntax::Span::new(start, end)))
    }

    /// Attaches `patch` to the most recently reported diagnostic.
    ///
    /// A no-op if nothing has been reported yet in this callback sequence
    /// (§4.9: `ctx.fix` without a preceding `ctx.report*` has no target).
    pub fn fix(&mut self, patch: FilePatch) {
        if let Some(idx) = self.last_index {
            self.diagnostics[idx].fixes.push(patch);
        }
    }

    /// Builds a [`FilePatch`] addressed to `uri`, child pointers computed
    /// relative to `parent_pointer` (§4.9's fix-builder helpers).
    pub fn fix_builder(&self, uri: impl Into<String>) -> crate::fix::FixBuilder {
        crate::fix::FixBuilder::new(uri)
    }
}

/// Output of one full engine run over a project (§4.8).
#[derive(Debug, Default)]
pub struct EngineOutput {
    /// Every diagnostic produced, sorted by `(uri, line, column, rule_id,
    /// message)` for deterministic output (§8).
    pub diagnostics: Vec<Diagnostic>,
}

/// The rule runtime. Holds the bundled (and any externally registered)
/// rule set and drives one project through all of them.
pub struct Linter {
    rules: Vec<Box<dyn Rule>>,
}

impl Linter {
    /// Builds a linter over the bundled rule set.
    pub fn new() -> Self {
        Self {
            rules: crate::rules::rules(),
        }
    }

    /// Builds a linter over an explicit rule set, for tests or embedders
    /// that want a subset of the bundled rules.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Runs every applicable rule over `project` and returns the merged,
    /// sorted output (§4.8).
    ///
    /// `cross_file_allowed` is `false` for a [`oaslint_analysis::LintingContext::Fragment`]
    /// (§4.6): single-file-scoped rules still run, cross-file rules are
    /// skipped entirely rather than running against a degenerate
    /// one-document project.
    ///
    /// `cancellation` is polled at each rule boundary; once cancelled, the
    /// runtime stops scheduling further rules and returns the diagnostics
    /// accumulated so far rather than running to completion (§4.8, §5).
    pub fn run(
        &self,
        project: &Arc<ProjectContext>,
        overrides: &RuleOverrides,
        cross_file_allowed: bool,
        cancellation: &CancellationToken,
    ) -> EngineOutput {
        let mut diagnostics = Vec::new();

        for (uri, doc) in &project.docs {
            for err in &doc.parse_errors {
                diagnostics.push(Diagnostic {
                    uri: uri.clone(),
                    range: doc.lines.range(err.span),
                    severity: Severity::Error,
                    message: err.message.clone(),
                    rule_id: PARSE_ERROR_RULE_ID.to_string(),
                    code: None,
                    source: Some(ENGINE_SOURCE.to_string()),
                    fixes: Vec::new(),
                });
            }
        }

        for rule in &self.rules {
            if cancellation.is_cancelled() {
                debug!("cancellation requested; stopping before the remaining rules run");
                break;
            }

            let meta = rule.meta();
            if meta.scope == Scope::CrossFile && !cross_file_allowed {
                continue;
            }

            let ctx = RuleCtx::new(project.clone(), meta.id, meta.default_severity, overrides);
            let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
                let mut visitor = rule.make_visitor();
                let mut ctx = ctx;
                dispatch(project.as_ref(), visitor.as_mut(), &mut ctx);
                ctx
            }));

            match result {
                Ok(ctx) => diagnostics.extend(ctx.diagnostics),
                Err(payload) => {
                    let cause = panic_message(&payload);
                    warn!(rule_id = meta.id, cause = %cause, "rule panicked during project run");
                    diagnostics.push(Diagnostic {
                        uri: project.root_uris.first().cloned().unwrap_or_default(),
                        range: Range {
                            start: oaslint_syntax::Position { line: 0, character: 0 },
                            end: oaslint_syntax::Position { line: 0, character: 0 },
                        },
                        severity: Severity::Error,
                        message: format!("rule `{}` failed to run: {cause}", meta.id),
                        rule_id: meta.id.to_string(),
                        code: None,
                        source: Some(ENGINE_SOURCE.to_string()),
                        fixes: Vec::new(),
                    });
                }
            }
        }

        diagnostics.sort_by(|a, b| {
            (
                &a.uri,
                a.range.start.line,
                a.range.start.character,
                &a.rule_id,
                &a.message,
            )
                .cmp(&(
                    &b.uri,
                    b.range.start.line,
                    b.range.start.character,
                    &b.rule_id,
                    &b.message,
                ))
        });

        EngineOutput { diagnostics }
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts a human-readable message from a `catch_unwind` payload, as
/// `std::panic::set_hook` would print it: `panic!("...")` and `.unwrap()`
/// on a `Debug` error both unwind with either a `&'static str` or a
/// `String`, never anything else in practice.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use oaslint_analysis::graph::ReferenceGraph;
    use oaslint_analysis::index::ProjectIndex;
    use oaslint_syntax::document::Format;
    use oaslint_syntax::Document;
    use url::Url;

    use super::*;

    fn project(text: &str) -> Arc<ProjectContext> {
        let uri = "file:///a.json";
        let doc = Document::parse(Url::parse(uri).unwrap(), Format::Json, text.to_string(), None);
        let mut docs = indexmap::IndexMap::new();
        docs.insert(uri.to_string(), doc);
        Arc::new(ProjectContext {
            docs,
            graph: ReferenceGraph::new(),
            index: ProjectIndex::default(),
            root_uris: vec![uri.to_string()],
            version: "3.1.0".to_string(),
        })
    }

    #[test]
    fn report_at_falls_back_to_node_range_when_field_absent() {
        let project = project(r#"{"info": {"title": "t"}}"#);
        let mut ctx = RuleCtx::new(project.clone(), "test", Severity::Warning, &RuleOverrides::new());
        let root = project.docs["file:///a.json"].ir.root().unwrap();
        ctx.report_at("file:///a.json", root, "missing-field", "no such field");
        assert_eq!(ctx.diagnostics.len(), 1);
        assert!(ctx.diagnostics[0].has_valid_range());
    }

    #[test]
    fn cancellation_stops_scheduling_before_any_rule_runs() {
        let project = project(
            r#"{
                "openapi": "3.1.0",
                "info": {"title": "t", "version": "1"},
                "paths": {"/pets/": {"get": {"description": "list", "responses": {}}}}
            }"#,
        );
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        let output = Linter::new().run(&project, &RuleOverrides::new(), true, &cancellation);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn panic_message_downcasts_str_and_string_payloads() {
        let str_payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*str_payload), "boom");

        let string_payload: Box<dyn std::any::Any + Send> = Box::new("boom".to_string());
        assert_eq!(panic_message(&*string_payload), "boom");
    }

    #[test]
    fn fix_attaches_to_most_recent_diagnostic() {
        let project = project(r#"{}"#);
        let mut ctx = RuleCtx::new(project.clone(), "test", Severity::Warning, &RuleOverrides::new());
        let root = project.docs["file:///a.json"].ir.root().unwrap();
        ctx.report_here("file:///a.json", root, "msg");
        ctx.fix(FilePatch {
            uri: "file:///a.json".to_string(),
            ops: vec![],
        });
        assert_eq!(ctx.diagnostics[0].fixes.len(), 1);
    }
}
