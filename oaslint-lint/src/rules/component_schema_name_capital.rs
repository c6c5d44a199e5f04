//! Flags a `components/schemas` entry whose name does not start with an
//! uppercase letter.

use oaslint_ast::ComponentRef;
use oaslint_syntax::Severity;

use crate::rule::Rule;
use crate::rule::RuleMeta;
use crate::rule::RuleType;
use crate::rule::Scope;
use crate::runtime::RuleCtx;

/// The rule's stable identifier.
pub const ID: &str = "component-schema-name-capital";

/// Flags a `components/schemas` entry whose name does not start with an
/// uppercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentSchemaNameCapitalRule;

impl Rule for ComponentSchemaNameCapitalRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: ID,
            description: "Schema component names should start with an uppercase letter.",
            rule_type: RuleType::Suggestion,
            default_severity: Severity::Warning,
            scope: Scope::SingleFile,
        }
    }

    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>> {
        Box::new(ComponentSchemaNameCapitalVisitor)
    }
}

struct ComponentSchemaNameCapitalVisitor;

impl oaslint_ast::Visitor for ComponentSchemaNameCapitalVisitor {
    type State = RuleCtx;

    fn component(&mut self, ctx: &mut RuleCtx, component: &ComponentRef<'_>) {
        if component.section != "schemas" {
            return;
        }
        let starts_upper = component
            .name
            .chars()
            .next()
            .map(|c| c.is_uppercase())
            .unwrap_or(false);
        if !starts_upper {
            ctx.report_here(
                component.base.uri,
                component.base.node,
                format!("schema name `{}` should start with an uppercase letter", component.name),
            );
        }
    }
}
