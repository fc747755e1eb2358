use plint_source::Location;

use crate::diagnostics::emit;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::walker::Finding;
use crate::TemplateLiteral;

fn build_message(expected: u32, actual: u32) -> String {
    format!("Expected indentation of {expected} spaces but found {actual}")
}

/// Indentation-width diagnostics from the walker's findings. Only literals
/// spanning more than one host line are checked.
#[must_use]
pub fn check(literal: &TemplateLiteral, findings: &[Finding]) -> Vec<Diagnostic> {
    if !literal.is_multiline() {
        return Vec::new();
    }
    let mapper = literal.mapper();

    findings
        .iter()
        .filter_map(|finding| match finding {
            Finding::WrongIndent {
                line,
                expected,
                actual,
            } => {
                let host = mapper.host_line(*line);
                Some(emit(
                    DiagnosticKind::BadIndentation,
                    Location::at(host, 0, host, *actual),
                    build_message(*expected, *actual),
                ))
            }
            _ => None,
        })
        .collect()
}
