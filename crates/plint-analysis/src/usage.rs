use plint_expr::Expr;
use plint_expr::ExprKind;
use plint_expr::MemberKey;
use plint_expr::PropertyKey;
use plint_expr::Span;
use plint_pug::Token;
use plint_pug::TokenKind;
use plint_pug::TokenStream;
use plint_source::Location;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::correlate;
use crate::scope;

/// Identifiers that are always considered defined, on top of whatever the
/// host scope and configuration provide.
pub const DEFAULT_GLOBALS: &[&str] = &[
    "require",
    "undefined",
    "JSON",
    "Math",
    "Object",
    "Array",
    "String",
    "Number",
    "Boolean",
    "Date",
    "RegExp",
    "console",
];

/// Default cap on loop-body recursion depth.
pub const DEFAULT_SCOPE_BUDGET: u32 = 32;

/// A free identifier observed in the template's embedded code, positioned
/// template-locally (1-indexed line, 0-indexed columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedVariable {
    pub name: String,
    pub loc: Location,
}

/// Free identifiers across every code-carrying token.
///
/// `defined` identifiers never appear in the result; neither do locals the
/// template introduces itself (`each` bindings inside their own scope,
/// arrow-function parameters). `budget` bounds loop-body recursion; at zero
/// the body is skipped.
#[must_use]
pub fn used_variables(
    text: &str,
    defined: &FxHashSet<String>,
    budget: u32,
) -> Vec<UsedVariable> {
    let mut out = Vec::new();
    collect(text, defined, budget, &mut out);
    out
}

fn collect(text: &str, defined: &FxHashSet<String>, budget: u32, out: &mut Vec<UsedVariable>) {
    let stream = TokenStream::from_source(text);
    let lines: Vec<&str> = text.split('\n').collect();

    let mut index = 0usize;
    while index < stream.len() {
        let token = stream.at(isize::try_from(index).unwrap_or(isize::MAX));

        if let TokenKind::Each { value, key, .. } = &token.kind {
            analyze_token(token, &lines, defined, out);

            let end = scope::matching_outdent(&stream, index);
            if budget > 0 {
                let end_line = end.map_or_else(
                    || u32::try_from(lines.len() + 1).unwrap_or(u32::MAX),
                    |e| stream.at(isize::try_from(e).unwrap_or(isize::MAX)).loc.start.line,
                );
                let body = scope::slice_body(text, token.loc.start.line, end_line);
                let mut inner = defined.clone();
                inner.insert(value.clone());
                if let Some(key) = key {
                    inner.insert(key.clone());
                }

                let offset = token.loc.start.line - 1;
                let before = out.len();
                trace!(line = token.loc.start.line, budget, "descending into loop body");
                collect(&body, &inner, budget - 1, out);
                for var in &mut out[before..] {
                    var.loc.start.line += offset;
                    var.loc.end.line += offset;
                }
            }

            // The body was handled recursively; resume past its scope.
            index = end.map_or(stream.len(), |e| e + 1);
            continue;
        }

        analyze_token(token, &lines, defined, out);
        index += 1;
    }
}

fn analyze_token(
    token: &Token,
    lines: &[&str],
    defined: &FxHashSet<String>,
    out: &mut Vec<UsedVariable>,
) {
    let Some(fragment) = fragment_for(token) else {
        return;
    };
    let Ok(expr) = plint_expr::parse(&fragment.code) else {
        return;
    };
    let line_index = token.loc.start.line.saturating_sub(1) as usize;
    let source_line = lines.get(line_index).copied().unwrap_or("");

    let mut free = Vec::new();
    free_identifiers(&expr, defined, &mut free);
    for (name, span) in free {
        let loc = correlate::span_to_location(&fragment, span, token, source_line);
        out.push(UsedVariable { name, loc });
    }
}

fn fragment_for(token: &Token) -> Option<correlate::CodeFragment> {
    match &token.kind {
        // The iterable is analyzed here; the loop body goes through the
        // scope recursion with the bindings in scope.
        TokenKind::Each { .. }
        | TokenKind::Attribute { .. }
        | TokenKind::Code { .. }
        | TokenKind::InterpolatedCode { .. }
        | TokenKind::If { .. }
        | TokenKind::ElseIf { .. } => correlate::code_from_token(token),
        _ => None,
    }
}

/// Collect free identifiers: every identifier read that is not bound by
/// `defined` or by an enclosing arrow parameter. Only the root of a member
/// chain is a variable reference.
fn free_identifiers(expr: &Expr, defined: &FxHashSet<String>, out: &mut Vec<(String, Span)>) {
    match &expr.kind {
        ExprKind::Identifier(name) => {
            if !defined.contains(name) {
                out.push((name.clone(), expr.span));
            }
        }
        ExprKind::Member { object, property } => {
            free_identifiers(object, defined, out);
            if let MemberKey::Computed(key) = property {
                free_identifiers(key, defined, out);
            }
        }
        ExprKind::Call { callee, args } => {
            free_identifiers(callee, defined, out);
            for arg in args {
                free_identifiers(arg, defined, out);
            }
        }
        ExprKind::Spread(inner) | ExprKind::Paren(inner) => {
            free_identifiers(inner, defined, out);
        }
        ExprKind::ObjectLit(properties) => {
            for property in properties {
                match &property.key {
                    PropertyKey::Computed(key) | PropertyKey::Spread(key) => {
                        free_identifiers(key, defined, out);
                    }
                    PropertyKey::Named { name, span } => {
                        if property.value.is_none() && !defined.contains(name) {
                            out.push((name.clone(), *span));
                        }
                    }
                    PropertyKey::StringLit { .. } => {}
                }
                if let Some(value) = &property.value {
                    free_identifiers(value, defined, out);
                }
            }
        }
        ExprKind::ArrayLit(elements) | ExprKind::TemplateLit { parts: elements } => {
            for element in elements {
                free_identifiers(element, defined, out);
            }
        }
        ExprKind::Unary { operand, .. } => free_identifiers(operand, defined, out),
        ExprKind::Binary { left, right, .. } => {
            free_identifiers(left, defined, out);
            free_identifiers(right, defined, out);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            free_identifiers(test, defined, out);
            free_identifiers(consequent, defined, out);
            free_identifiers(alternate, defined, out);
        }
        ExprKind::Arrow { params, body } => {
            let mut inner = defined.clone();
            for param in params {
                inner.insert(param.name.clone());
            }
            free_identifiers(body, &inner, out);
        }
        ExprKind::StringLit(_)
        | ExprKind::NumberLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::NullLit => {}
    }
}
