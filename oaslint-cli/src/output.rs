//! Renders engine diagnostics to a terminal using `codespan-reporting`.

use std::collections::HashMap;
use std::io::IsTerminal;

use anyhow::Context;
use anyhow::Result;
use codespan_reporting::diagnostic::Diagnostic as CodespanDiagnostic;
use codespan_reporting::diagnostic::Label;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::emit;
use codespan_reporting::term::termcolor::ColorChoice;
use codespan_reporting::term::termcolor::StandardStream;
use codespan_reporting::term::Config;
use oaslint_analysis::ProjectContext;
use oaslint_syntax::Diagnostic;
use oaslint_syntax::Severity;

fn severity(sev: Severity) -> codespan_reporting::diagnostic::Severity {
    match sev {
        Severity::Error => codespan_reporting::diagnostic::Severity::Error,
        Severity::Warning => codespan_reporting::diagnostic::Severity::Warning,
        Severity::Info => codespan_reporting::diagnostic::Severity::Note,
        Severity::Hint => codespan_reporting::diagnostic::Severity::Help,
        Severity::Off => codespan_reporting::diagnostic::Severity::Note,
    }
}

/// Prints `diagnostics` to stdout and returns the number of errors among
/// them, which the caller uses as its exit-code signal.
pub fn emit_diagnostics(project: &ProjectContext, diagnostics: &[Diagnostic]) -> Result<usize> {
    let mut files = SimpleFiles::new();
    let mut file_ids = HashMap::new();
    for (uri, doc) in &project.docs {
        let id = files.add(uri.clone(), doc.text.clone());
        file_ids.insert(uri.clone(), id);
    }

    let mut stream = StandardStream::stdout(if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    });
    let config = Config::default();

    let mut errors = 0;
    for diagnostic in diagnostics {
        if diagnostic.severity == Severity::Error {
            errors += 1;
        }
        let Some(&file_id) = file_ids.get(&diagnostic.uri) else {
            continue;
        };
        let doc = &project.docs[&diagnostic.uri];
        let start = doc.lines.offset(diagnostic.range.start) as usize;
        let end = doc.lines.offset(diagnostic.range.end) as usize;

        let mut message = diagnostic.message.clone();
        if let Some(code) = &diagnostic.code {
            message = format!("{message} ({code})");
        }

        let codespan = CodespanDiagnostic::new(severity(diagnostic.severity))
            .with_message(message)
            .with_code(diagnostic.rule_id.as_str())
            .with_labels(vec![Label::primary(file_id, start..end)]);

        emit(&mut stream, &config, &files, &codespan).context("failed to emit diagnostic")?;
    }

    Ok(errors)
}
