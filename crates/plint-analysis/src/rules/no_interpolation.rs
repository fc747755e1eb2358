use crate::diagnostics::emit;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::TemplateLiteral;

/// One diagnostic per host-language interpolation site. The host glue
/// supplies the locations already host-relative; the raw text arrives with
/// the sites substituted so the lexer still runs.
#[must_use]
pub fn check(literal: &TemplateLiteral) -> Vec<Diagnostic> {
    literal
        .interpolations
        .iter()
        .map(|loc| {
            emit(
                DiagnosticKind::Interpolation,
                *loc,
                "Don't use JavaScript interpolation",
            )
        })
        .collect()
}
