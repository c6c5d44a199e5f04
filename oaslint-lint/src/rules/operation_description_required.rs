//! Flags an operation that has no `description`.

use oaslint_ast::OperationRef;
use oaslint_ast::VisitReason;
use oaslint_syntax::Severity;

use crate::rule::Rule;
use crate::rule::RuleMeta;
use crate::rule::RuleType;
use crate::rule::Scope;
use crate::runtime::RuleCtx;
use crate::validators;

/// The rule's stable identifier.
pub const ID: &str = "operation-description-required";

/// Flags an operation that has no `description` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationDescriptionRequiredRule;

impl Rule for OperationDescriptionRequiredRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: ID,
            description: "Every operation should document what it does.",
            rule_type: RuleType::Problem,
            default_severity: Severity::Warning,
            scope: Scope::SingleFile,
        }
    }

    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>> {
        Box::new(OperationDescriptionRequiredVisitor)
    }
}

struct OperationDescriptionRequiredVisitor;

impl oaslint_ast::Visitor for OperationDescriptionRequiredVisitor {
    type State = RuleCtx;

    fn operation(&mut self, ctx: &mut RuleCtx, reason: VisitReason, op: &OperationRef<'_>) {
        if reason != VisitReason::Enter {
            return;
        }
        validators::required(
            ctx,
            op.base.uri,
            op.base.node,
            "description",
            &format!("`{}` operation has no description", op.method.to_uppercase()),
        );
    }
}
