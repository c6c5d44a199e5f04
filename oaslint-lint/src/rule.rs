//! The rule-author surface: the [`Rule`] trait and its supporting types
//! (§4.9).

use oaslint_syntax::Severity;

use crate::runtime::RuleCtx;

/// Whether a rule is enforcing a requirement or only suggesting an
/// improvement, mirroring the `defineRule` meta shape of §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    /// The rule flags a concrete problem.
    Problem,
    /// The rule suggests a style improvement.
    Suggestion,
}

/// Whether a rule needs the whole project or can run against one document
/// in isolation (§4.6, §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The rule only inspects the document it is given.
    SingleFile,
    /// The rule needs cross-file context (the reference graph, the
    /// project index, or another document's content).
    CrossFile,
}

/// Static metadata about one rule, returned from [`Rule::meta`].
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    /// The rule's stable, kebab-case identifier (e.g. `path-no-trailing-slash`).
    pub id: &'static str,
    /// One-line description, shown in rule listings.
    pub description: &'static str,
    /// Whether this is a problem or a suggestion.
    pub rule_type: RuleType,
    /// The severity used when no config override applies.
    pub default_severity: Severity,
    /// Whether the rule needs project-wide context.
    pub scope: Scope,
}

/// A lint rule: static metadata plus a fresh visitor for each project run.
///
/// A new visitor is requested once per run via [`Rule::make_visitor`], so a
/// rule's own fields double as its private mutable state across the
/// callbacks of one run (§4.7's "rule-private mutable state" is this boxed
/// instance's lifetime, not a separately threaded handle).
pub trait Rule: Send + Sync {
    /// The rule's static metadata.
    fn meta(&self) -> RuleMeta;

    /// Builds a fresh visitor for one project run.
    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>>;
}
