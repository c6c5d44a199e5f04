//! The `oaslint` command line tool: a reference front-end over the engine,
//! wiring the std filesystem, the context resolver and the rule runtime
//! together the way an editor or CI job would.

mod fs;
mod output;

use std::io::stderr;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use clap_verbosity_flag::WarnLevel;
use colored::Colorize;
use oaslint_analysis::LintingContext;
use oaslint_analysis::Preference;
use oaslint_analysis::ProjectCache;
use oaslint_analysis::SharedDocTypeCache;
use oaslint_lint::CancellationToken;
use oaslint_lint::Linter;
use oaslint_lint::RuleOverrides;
use oaslint_syntax::Severity;

use crate::fs::path_to_uri;
use crate::fs::StdFilesystem;

/// Parses a single `rule-id=severity` override, as accepted by `--set`.
fn parse_override(raw: &str) -> Result<(String, Severity)> {
    let (id, severity) = raw
        .split_once('=')
        .with_context(|| format!("`{raw}` is not of the form rule-id=severity"))?;
    let severity = match severity {
        "off" => Severity::Off,
        "hint" => Severity::Hint,
        "info" => Severity::Info,
        "warning" | "warn" => Severity::Warning,
        "error" => Severity::Error,
        other => bail!("unknown severity `{other}`; expected off, hint, info, warning or error"),
    };
    Ok((id.to_string(), severity))
}

/// Lints a single OpenAPI document, following its project's `$ref` graph
/// (§4.6).
#[derive(Args)]
pub struct LintCommand {
    /// The path to the root or fragment document to lint.
    #[clap(value_name = "PATH")]
    pub path: PathBuf,

    /// Additional workspace roots to search when `PATH` is a fragment with
    /// no root of its own, as glob base directories (§4.6).
    #[clap(long = "workspace", value_name = "DIR")]
    pub workspace_folders: Vec<PathBuf>,

    /// Disables a rule or forces it to a specific severity, e.g.
    /// `--set path-no-trailing-slash=off`. May be given multiple times.
    #[clap(long = "set", value_name = "RULE=SEVERITY")]
    pub overrides: Vec<String>,

    /// When a fragment has more than one owning root, lint it against
    /// every owning root instead of only the closest one.
    #[clap(long)]
    pub all_roots: bool,
}

impl LintCommand {
    fn exec(self) -> Result<()> {
        let uri = path_to_uri(&self.path).context("failed to resolve input path")?;
        let workspace_folders = self
            .workspace_folders
            .iter()
            .map(|p| path_to_uri(p).map(|u| u.trim_end_matches('/').to_string()))
            .collect::<Result<Vec<_>, _>>()
            .context("failed to resolve a --workspace path")?;

        let mut overrides = RuleOverrides::new();
        for raw in &self.overrides {
            let (id, severity) = parse_override(raw)?;
            overrides.set(id, severity);
        }

        let preference = if self.all_roots {
            Preference::All
        } else {
            Preference::Closest
        };

        let fs = StdFilesystem;
        // A single run only ever resolves one input URI, so these caches
        // mostly pay for themselves when a fragment has several candidate
        // owning roots that share referenced documents; they still go
        // through the same entry point a long-lived editor session would
        // use, with its caches kept warm across many calls.
        let doc_type_cache = SharedDocTypeCache::new(256);
        let project_cache = ProjectCache::new();
        let context = oaslint_analysis::resolve_linting_context(
            &uri,
            &fs,
            &workspace_folders,
            &doc_type_cache,
            Some(&project_cache),
            preference,
        )
        .context("failed to resolve the document's project context")?;

        let linter = Linter::new();
        let mut total_errors = 0;
        // A one-shot invocation has nothing that would ever call `.cancel()`
        // on this; it exists so `Linter::run` always goes through the same
        // cancellable entry point a long-lived embedder (an editor session)
        // drives with a token wired to a real cancel source.
        let cancellation = CancellationToken::new();

        match context {
            LintingContext::ProjectAware(project) => {
                let output = linter.run(&project, &overrides, true, &cancellation);
                total_errors += output::emit_diagnostics(&project, &output.diagnostics)?;
            }
            LintingContext::MultiRoot(projects) => {
                for project in projects {
                    let output = linter.run(&project, &overrides, true, &cancellation);
                    total_errors += output::emit_diagnostics(&project, &output.diagnostics)?;
                }
            }
            LintingContext::Fragment { uri, doc } => {
                let mut docs = indexmap::IndexMap::new();
                docs.insert(uri.clone(), doc);
                let project = std::sync::Arc::new(oaslint_analysis::ProjectContext {
                    docs,
                    graph: oaslint_analysis::ReferenceGraph::new(),
                    index: oaslint_analysis::ProjectIndex::default(),
                    root_uris: vec![uri],
                    version: String::new(),
                });
                let output = linter.run(&project, &overrides, false, &cancellation);
                total_errors += output::emit_diagnostics(&project, &output.diagnostics)?;
            }
        }

        if total_errors > 0 {
            bail!(
                "found {total_errors} error{s}",
                s = if total_errors == 1 { "" } else { "s" }
            );
        }

        Ok(())
    }
}

/// Lists the bundled rules and their default severity.
#[derive(Args)]
pub struct RulesCommand;

impl RulesCommand {
    fn exec(self) -> Result<()> {
        let mut rules = oaslint_lint::rules::rules();
        rules.sort_by_key(|r| r.meta().id.to_string());
        for rule in rules {
            let meta = rule.meta();
            println!(
                "{id:<32} {severity:<8} {scope:?}",
                id = meta.id,
                severity = format!("{:?}", meta.default_severity).to_lowercase(),
                scope = meta.scope,
            );
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Lints a document.
    Lint(LintCommand),

    /// Lists the bundled rules.
    Rules(RulesCommand),
}

/// A cross-file linter and language-service backend for OpenAPI documents.
#[derive(Parser)]
#[clap(
    bin_name = "oaslint",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct App {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// The verbosity flags.
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

/// Converts a `log`-crate level filter (what `clap-verbosity-flag` hands
/// back) into the `tracing` equivalent, without pulling in `tracing-log`
/// just for this one conversion.
fn trace_level(level: log::LevelFilter) -> tracing::level_filters::LevelFilter {
    match level {
        log::LevelFilter::Off => tracing::level_filters::LevelFilter::OFF,
        log::LevelFilter::Error => tracing::level_filters::LevelFilter::ERROR,
        log::LevelFilter::Warn => tracing::level_filters::LevelFilter::WARN,
        log::LevelFilter::Info => tracing::level_filters::LevelFilter::INFO,
        log::LevelFilter::Debug => tracing::level_filters::LevelFilter::DEBUG,
        log::LevelFilter::Trace => tracing::level_filters::LevelFilter::TRACE,
    }
}

fn main() -> Result<()> {
    let app = App::parse();

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(trace_level(app.verbose.log_level_filter()))
        .with_writer(std::io::stderr)
        .with_ansi(stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = match app.command {
        Command::Lint(cmd) => cmd.exec(),
        Command::Rules(cmd) => cmd.exec(),
    } {
        eprintln!(
            "{error}: {e:?}",
            error = if std::io::stderr().is_terminal() {
                "error".red().bold()
            } else {
                "error".normal()
            }
        );
        std::process::exit(1);
    }

    Ok(())
}
