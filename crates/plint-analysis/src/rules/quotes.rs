use plint_expr::Expr;
use plint_expr::ExprKind;
use plint_expr::MemberKey;
use plint_expr::PropertyKey;
use plint_expr::Span;
use plint_pug::Token;
use plint_pug::TokenKind;
use plint_pug::TokenStream;
use plint_source::Location;

use crate::correlate;
use crate::diagnostics::emit;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::TemplateLiteral;

const MESSAGE_DOUBLE: &str = "Strings must use double quotes";
const MESSAGE_SINGLE: &str = "Code must use single quotes";

fn carries_strings(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Attribute { .. }
            | TokenKind::Code { .. }
            | TokenKind::InterpolatedCode { .. }
            | TokenKind::Each { .. }
    )
}

fn is_object_like(code: &str) -> bool {
    let code = code.trim();
    (code.starts_with('{') && code.ends_with('}'))
        || (code.starts_with('[') && code.ends_with(']'))
}

/// Plain attribute strings are markup and use double quotes; strings inside
/// code (buffered/interpolated) or object/array-valued attributes are host
/// code and use single quotes.
fn wants_single(token: &Token, search: &str) -> bool {
    is_object_like(search)
        || matches!(
            token.kind,
            TokenKind::Code { .. } | TokenKind::InterpolatedCode { .. }
        )
}

fn quote_is_valid(raw: &str, single: bool) -> bool {
    let quote = if single { '\'' } else { '"' };
    raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote)
}

fn string_spans(expr: &Expr, out: &mut Vec<Span>) {
    match &expr.kind {
        ExprKind::StringLit(_) => out.push(expr.span),
        ExprKind::Member { object, property } => {
            string_spans(object, out);
            if let MemberKey::Computed(key) = property {
                string_spans(key, out);
            }
        }
        ExprKind::Call { callee, args } => {
            string_spans(callee, out);
            for arg in args {
                string_spans(arg, out);
            }
        }
        ExprKind::Spread(inner) | ExprKind::Paren(inner) => string_spans(inner, out),
        ExprKind::ObjectLit(properties) => {
            for property in properties {
                match &property.key {
                    PropertyKey::Computed(key) | PropertyKey::Spread(key) => {
                        string_spans(key, out);
                    }
                    PropertyKey::StringLit { span, .. } => out.push(*span),
                    PropertyKey::Named { .. } => {}
                }
                if let Some(value) = &property.value {
                    string_spans(value, out);
                }
            }
        }
        ExprKind::ArrayLit(elements) | ExprKind::TemplateLit { parts: elements } => {
            for element in elements {
                string_spans(element, out);
            }
        }
        ExprKind::Unary { operand, .. } => string_spans(operand, out),
        ExprKind::Binary { left, right, .. } => {
            string_spans(left, out);
            string_spans(right, out);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            string_spans(test, out);
            string_spans(consequent, out);
            string_spans(alternate, out);
        }
        ExprKind::Arrow { body, .. } => string_spans(body, out),
        ExprKind::Identifier(_)
        | ExprKind::NumberLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::NullLit => {}
    }
}

/// Quote-style diagnostics over every string literal in the template's
/// embedded code fragments.
#[must_use]
pub fn check(literal: &TemplateLiteral, stream: &TokenStream) -> Vec<Diagnostic> {
    let lines: Vec<&str> = literal.text.split('\n').collect();
    let mapper = literal.mapper();
    let mut diagnostics = Vec::new();

    for token in stream {
        if !carries_strings(token) {
            continue;
        }
        let Some(fragment) = correlate::code_from_token(token) else {
            continue;
        };
        let Ok(expr) = plint_expr::parse(&fragment.code) else {
            continue;
        };
        let mut spans = Vec::new();
        string_spans(&expr, &mut spans);
        if spans.is_empty() {
            continue;
        }

        let single = wants_single(token, &fragment.search);
        let line_index = token.loc.start.line.saturating_sub(1) as usize;
        let source_line = lines.get(line_index).copied().unwrap_or("");

        for span in spans {
            let raw = fragment.code.get(span.start..span.end).unwrap_or("");
            if quote_is_valid(raw, single) {
                continue;
            }
            let loc = correlate::span_to_location(&fragment, span, token, source_line);
            diagnostics.push(emit(
                DiagnosticKind::WrongQuotes,
                Location::at(
                    mapper.host_line(loc.start.line),
                    loc.start.column,
                    mapper.host_line(loc.end.line),
                    loc.end.column,
                ),
                if single { MESSAGE_SINGLE } else { MESSAGE_DOUBLE },
            ));
        }
    }
    diagnostics
}
