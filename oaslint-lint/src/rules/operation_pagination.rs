//! Flags a list-returning `GET` operation missing `limit`/`offset`
//! parameters.

use oaslint_ast::Accessor;
use oaslint_ast::OperationRef;
use oaslint_ast::VisitReason;
use oaslint_syntax::Arena;
use oaslint_syntax::NodeId;
use oaslint_syntax::Severity;

use crate::rule::Rule;
use crate::rule::RuleMeta;
use crate::rule::RuleType;
use crate::rule::Scope;
use crate::runtime::RuleCtx;

/// The rule's stable identifier.
pub const ID: &str = "operation-pagination";

/// Flags a `GET` operation whose success response is an array but which
/// declares neither a `limit` nor an `offset` parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationPaginationRule;

impl Rule for OperationPaginationRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: ID,
            description: "List operations should support `limit`/`offset` pagination.",
            rule_type: RuleType::Problem,
            default_severity: Severity::Error,
            scope: Scope::SingleFile,
        }
    }

    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>> {
        Box::new(OperationPaginationVisitor)
    }
}

struct OperationPaginationVisitor;

/// Response status codes checked for a list-shaped body.
const SUCCESS_CODES: &[&str] = &["200", "default"];

/// The schema of one response, whether declared Swagger2-style
/// (`responses.<code>.schema`) or OpenAPI3-style
/// (`responses.<code>.content.<media-type>.schema`, using the first media
/// type in source order).
fn response_schema<'a>(op: &Accessor<'a>, code: &str) -> Option<Accessor<'a>> {
    let response = op.get_object("responses")?.get_object(code)?;
    if let Some(schema) = response.get_object("schema") {
        return Some(schema);
    }
    let (_, media) = response.entries("content")?.into_iter().next()?;
    media.get_object("schema")
}

fn is_array_response(op: &Accessor<'_>) -> bool {
    SUCCESS_CODES
        .iter()
        .any(|code| response_schema(op, code).and_then(|s| s.get_string("type")) == Some("array"))
}

fn has_param(arena: &Arena, params: &[NodeId], name: &str) -> bool {
    params.iter().any(|&id| Accessor::new(arena, id).get_string("name") == Some(name))
}

impl oaslint_ast::Visitor for OperationPaginationVisitor {
    type State = RuleCtx;

    fn operation(&mut self, ctx: &mut RuleCtx, reason: VisitReason, op: &OperationRef<'_>) {
        if reason != VisitReason::Enter || op.method != "get" {
            return;
        }
        let Some(arena) = ctx.arena(op.base.uri) else {
            return;
        };
        let acc = Accessor::new(arena, op.base.node);
        if !is_array_response(&acc) {
            return;
        }

        let params = acc.get_array("parameters").unwrap_or(&[]);
        let missing_limit = !has_param(arena, params, "limit");
        let missing_offset = !has_param(arena, params, "offset");
        if missing_limit {
            ctx.report_here(op.base.uri, op.base.node, "list operation is missing a `limit` parameter");
        }
        if missing_offset {
            ctx.report_here(op.base.uri, op.base.node, "list operation is missing an `offset` parameter");
        }
    }
}
