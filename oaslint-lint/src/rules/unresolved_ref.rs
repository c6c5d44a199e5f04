//! Flags a `$ref` that cannot be dereferenced anywhere in the project.

use oaslint_ast::ReferenceRef;
use oaslint_syntax::Severity;

use crate::rule::Rule;
use crate::rule::RuleMeta;
use crate::rule::RuleType;
use crate::rule::Scope;
use crate::runtime::RuleCtx;

/// The rule's stable identifier.
pub const ID: &str = "unresolved-ref";

/// Flags a `$ref` that does not resolve to a document and pointer present
/// in the project (§4.4, §7).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnresolvedRefRule;

impl Rule for UnresolvedRefRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: ID,
            description: "`$ref` must resolve to a document and pointer known to the project.",
            rule_type: RuleType::Problem,
            default_severity: Severity::Error,
            scope: Scope::CrossFile,
        }
    }

    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>> {
        Box::new(UnresolvedRefVisitor)
    }
}

struct UnresolvedRefVisitor;

impl oaslint_ast::Visitor for UnresolvedRefVisitor {
    type State = RuleCtx;

    fn reference(&mut self, ctx: &mut RuleCtx, reference: &ReferenceRef<'_>) {
        let resolver = oaslint_analysis::Resolver::new(&ctx.project().docs);
        if let Err(err) = resolver.deref(reference.base.uri, reference.ref_str) {
            if matches!(err, oaslint_analysis::ResolveError::Unresolved(_)) {
                ctx.report_at(
                    reference.base.uri,
                    reference.base.node,
                    "$ref",
                    format!("`{}` does not resolve to a known document or pointer", reference.ref_str),
                );
            }
        }
    }
}
