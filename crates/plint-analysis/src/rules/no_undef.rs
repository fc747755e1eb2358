use plint_source::Location;
use rustc_hash::FxHashSet;

use crate::diagnostics::emit;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::usage;
use crate::AnalyzerOptions;
use crate::HostScope;
use crate::TemplateLiteral;

/// Free template identifiers not defined in the host scope, the default
/// globals, or the configured extra globals.
#[must_use]
pub fn check(
    literal: &TemplateLiteral,
    host: &HostScope,
    options: &AnalyzerOptions,
) -> Vec<Diagnostic> {
    let mut defined: FxHashSet<String> = host.defined.clone();
    defined.extend(usage::DEFAULT_GLOBALS.iter().map(|s| (*s).to_string()));
    defined.extend(options.globals.iter().cloned());

    let mapper = literal.mapper();
    usage::used_variables(&literal.text, &defined, options.scope_budget)
        .into_iter()
        .map(|var| {
            emit(
                DiagnosticKind::UndefinedVariable,
                Location::at(
                    mapper.host_line(var.loc.start.line),
                    var.loc.start.column,
                    mapper.host_line(var.loc.end.line),
                    var.loc.end.column,
                ),
                format!("'{}' is not defined.", var.name),
            )
        })
        .collect()
}
