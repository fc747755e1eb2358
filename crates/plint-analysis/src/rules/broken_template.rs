use plint_pug::LexError;
use plint_source::Location;

use crate::diagnostics::emit;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::TemplateLiteral;

/// One diagnostic for an unlexable template: the reported line, spanning
/// from its indentation to its end.
#[must_use]
pub fn check(literal: &TemplateLiteral, error: &LexError) -> Diagnostic {
    let host_line = literal.start.line + error.line.saturating_sub(1);
    let source = literal
        .text
        .split('\n')
        .nth(error.line.saturating_sub(1) as usize)
        .unwrap_or("");
    let indent = source
        .bytes()
        .take_while(|b| matches!(b, b' ' | b'\t'))
        .count();

    emit(
        DiagnosticKind::BrokenTemplate,
        Location::at(
            host_line,
            u32::try_from(indent).unwrap_or(u32::MAX),
            host_line,
            u32::try_from(source.len()).unwrap_or(u32::MAX),
        ),
        "Pug can't parse this template",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use plint_pug::Lexer;
    use plint_source::LineCol;

    #[test]
    fn spans_the_broken_line_from_indent_to_end() {
        let text = "\ndiv\n  each x in ]\n";
        let literal = TemplateLiteral {
            text: text.to_string(),
            start: LineCol::new(10, 0),
            end: LineCol::new(13, 1),
            content_column: 4,
            base_indent: 0,
            interpolations: Vec::new(),
        };
        let error = Lexer::check(text).unwrap();
        let diag = check(&literal, &error);

        assert_eq!(diag.code, "P001");
        assert_eq!(diag.message, "Pug can't parse this template");
        assert_eq!(diag.location, Location::at(12, 2, 12, 13));
    }
}
