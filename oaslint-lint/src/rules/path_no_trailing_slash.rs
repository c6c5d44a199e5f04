//! Flags a `paths` entry whose template ends in `/`.

use oaslint_ast::PathItemRef;
use oaslint_ast::VisitReason;
use oaslint_syntax::Severity;

use crate::rule::Rule;
use crate::rule::RuleMeta;
use crate::rule::RuleType;
use crate::rule::Scope;
use crate::runtime::RuleCtx;

/// The rule's stable identifier.
pub const ID: &str = "path-no-trailing-slash";

/// Flags a `paths` entry whose template ends in `/`, other than the root
/// path `/` itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathNoTrailingSlashRule;

impl Rule for PathNoTrailingSlashRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: ID,
            description: "Path templates should not end with a trailing slash.",
            rule_type: RuleType::Suggestion,
            default_severity: Severity::Warning,
            scope: Scope::SingleFile,
        }
    }

    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>> {
        Box::new(PathNoTrailingSlashVisitor)
    }
}

struct PathNoTrailingSlashVisitor;

impl oaslint_ast::Visitor for PathNoTrailingSlashVisitor {
    type State = RuleCtx;

    fn path_item(&mut self, ctx: &mut RuleCtx, reason: VisitReason, item: &PathItemRef<'_>) {
        if reason != VisitReason::Enter {
            return;
        }
        if item.template != "/" && item.template.ends_with('/') {
            ctx.report_here(
                item.base.uri,
                item.base.node,
                format!("path `{}` ends with a trailing slash", item.template),
            );
        }
    }
}
