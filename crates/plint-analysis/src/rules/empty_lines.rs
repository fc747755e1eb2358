use plint_source::Location;

use crate::diagnostics::emit;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::walker::Finding;
use crate::TemplateLiteral;

/// Blank-line policy diagnostics from the walker's findings. Only literals
/// spanning more than one host line are checked.
#[must_use]
pub fn check(literal: &TemplateLiteral, findings: &[Finding]) -> Vec<Diagnostic> {
    if !literal.is_multiline() {
        return Vec::new();
    }
    let lines: Vec<&str> = literal.text.split('\n').collect();
    let mapper = literal.mapper();

    findings
        .iter()
        .filter_map(|finding| match finding {
            Finding::LeadingLineNotBlank => {
                let first = lines.first().copied().unwrap_or("");
                let quasi = literal.content_column.saturating_sub(1);
                Some(emit(
                    DiagnosticKind::MissingLeadingBlank,
                    Location::at(
                        literal.start.line,
                        quasi,
                        literal.start.line,
                        quasi + u32::try_from(first.len()).unwrap_or(u32::MAX) + 1,
                    ),
                    "Expected new line in the beginning",
                ))
            }
            Finding::TrailingLineNotBlank => {
                let last = lines.last().copied().unwrap_or("");
                let content = last.len() - last.trim_start().len();
                Some(emit(
                    DiagnosticKind::MissingTrailingBlank,
                    Location::at(
                        literal.end.line,
                        u32::try_from(content).unwrap_or(u32::MAX),
                        literal.end.line,
                        literal.end.column,
                    ),
                    "Expected new line in the end",
                ))
            }
            Finding::DoubleBlank { line } => {
                let host = mapper.host_line(*line);
                Some(emit(
                    DiagnosticKind::ExtraBlankLines,
                    Location::at(host, 0, host + 1, 0),
                    "Use 1 empty line",
                ))
            }
            Finding::MissingBlankBeforeOutdent { loc } => {
                let host = mapper.host_line(loc.start.line);
                Some(emit(
                    DiagnosticKind::MissingBlankBeforeOutdent,
                    Location::at(host, 0, host, loc.end.column.saturating_sub(1)),
                    "Need empty line when you are off from the scope",
                ))
            }
            Finding::MissingBlankBetweenSiblings { loc } => {
                let host = mapper.host_line(loc.start.line);
                Some(emit(
                    DiagnosticKind::MissingBlankBetweenSiblings,
                    Location::at(host, 0, host, loc.end.column.saturating_sub(1)),
                    "Need empty line for more than two siblings",
                ))
            }
            Finding::WrongIndent { .. } => None,
        })
        .collect()
}
