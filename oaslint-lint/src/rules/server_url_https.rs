//! Flags a non-`localhost` server URL that is not served over HTTPS.

use oaslint_ast::Accessor;
use oaslint_ast::RootRef;
use oaslint_ast::VisitReason;
use oaslint_syntax::Severity;

use crate::rule::Rule;
use crate::rule::RuleMeta;
use crate::rule::RuleType;
use crate::rule::Scope;
use crate::runtime::RuleCtx;

/// The rule's stable identifier.
pub const ID: &str = "server-url-https";

/// Flags a root-level `servers` entry whose `url` starts with `http://`
/// and does not point at `localhost`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerUrlHttpsRule;

impl Rule for ServerUrlHttpsRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: ID,
            description: "Server URLs should use HTTPS, except for local development.",
            rule_type: RuleType::Problem,
            default_severity: Severity::Warning,
            scope: Scope::SingleFile,
        }
    }

    fn make_visitor(&self) -> Box<dyn oaslint_ast::Visitor<State = RuleCtx>> {
        Box::new(ServerUrlHttpsVisitor)
    }
}

struct ServerUrlHttpsVisitor;

impl oaslint_ast::Visitor for ServerUrlHttpsVisitor {
    type State = RuleCtx;

    fn root(&mut self, ctx: &mut RuleCtx, reason: VisitReason, root: &RootRef<'_>) {
        if reason != VisitReason::Enter {
            return;
        }
        let Some(arena) = ctx.arena(root.base.uri) else {
            return;
        };
        let acc = Accessor::new(arena, root.base.node);
        let Some(servers) = acc.get_array("servers") else {
            return;
        };
        let mut offenders = Vec::new();
        for &server_id in servers {
            let server = Accessor::new(arena, server_id);
            let Some(url) = server.get_string("url") else {
                continue;
            };
            if url.starts_with("http://") && !url.contains("localhost") {
                offenders.push((server_id, url.to_string()));
            }
        }
        for (server_id, url) in offenders {
            ctx.report_at(root.base.uri, server_id, "url", format!("server URL `{url}` is not served over HTTPS"));
        }
    }
}
