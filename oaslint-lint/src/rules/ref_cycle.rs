//! Flags a `$ref` that participates in a reference cycle.

use oaslint_analysis::GraphNode;
use oaslint_ast::ReferenceRef;
use oaslint_syntax::Severity;

use crate::rule::Rule;
use crate::rule::RuleMeta;
use crate::rule::RuleType;
use crate::rule::Scope;
use crate::runtime::RuleCtx;

/// The rule's stable identifier.
pub const ID: &str = "ref-cycle";

/// Flags a `$ref` that eventually leads back to itself through one or more
/// hops (§3, §4.4).
#[derive(Debug, Clone, Copy, Default)]
pub struct RefCycleRule;

impl Rule for RefCycleRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: ID,
            description: "`$ref` chains should not cycle back to their own origin.",
            rule_type: RuleType::Problem,
            default_severity: Severity::Warning,
            scope: Scope::CrossFile,
        }
    }

    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>> {
        Box::new(RefCycleVisitor)
    }
}

struct RefCycleVisitor;

impl oaslint_ast::Visitor for RefCycleVisitor {
    type State = RuleCtx;

    fn reference(&mut self, ctx: &mut RuleCtx, reference: &ReferenceRef<'_>) {
        let node = GraphNode {
            uri: reference.base.uri.to_string(),
            pointer: reference.base.pointer.to_string(),
        };
        if ctx.project().graph.has_cycle(&node) {
            ctx.report_at(
                reference.base.uri,
                reference.base.node,
                "$ref",
                format!("`{}` is part of a reference cycle", reference.ref_str),
            );
        }
    }
}
