use plint_expr::Expr;
use plint_expr::ExprKind;
use plint_expr::MemberKey;
use plint_expr::Span;
use plint_pug::Token;
use plint_pug::TokenKind;
use plint_source::Location;

/// A lintable code fragment extracted from a token.
///
/// `code` is what the expression parser sees; `search` is the raw substring
/// to locate in the physical source line; `offset` is the length of any
/// synthetic wrapping prefix, subtracted from node spans before mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFragment {
    pub code: String,
    pub search: String,
    pub offset: usize,
}

/// One segment of a member path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Named(String),
    /// A computed access with a non-literal key: any key may be reached.
    AnyKey,
}

/// An identifier or member access observed in a fragment, with its
/// best-effort template-local position (1-indexed line, 0-indexed columns).
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub path: Vec<PathSegment>,
    pub loc: Location,
}

fn looks_like_object(code: &str) -> bool {
    code.trim_start().starts_with('{')
}

fn is_spread_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("...") else {
        return false;
    };
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

fn plain(code: &str) -> CodeFragment {
    // A bare object literal is not a standalone expression; parenthesize it
    // and remember the one-character shift.
    if looks_like_object(code) {
        return CodeFragment {
            code: format!("({code})"),
            search: code.to_string(),
            offset: 1,
        };
    }
    CodeFragment {
        code: code.to_string(),
        search: code.to_string(),
        offset: 0,
    }
}

/// The lintable fragment a token carries, or `None` for tokens without
/// embedded code.
#[must_use]
pub fn code_from_token(token: &Token) -> Option<CodeFragment> {
    match &token.kind {
        TokenKind::Attribute { name, value } => {
            if is_spread_name(name) {
                // `...rest` alone is not an expression; an object literal
                // around it makes it one.
                return Some(CodeFragment {
                    code: format!("({{{name}}})"),
                    search: name.clone(),
                    offset: 2,
                });
            }
            value.as_deref().map(plain)
        }
        TokenKind::Each { code, .. } => Some(plain(code)),
        TokenKind::Code { value, .. }
        | TokenKind::InterpolatedCode { value, .. }
        | TokenKind::If { value }
        | TokenKind::ElseIf { value } => Some(plain(value)),
        _ => None,
    }
}

/// Find the 0-indexed column where `search` occurs in the token's physical
/// line, preferring a match at or after the token's own column.
///
/// Exact only when the fragment occurs once in the window; with duplicated
/// substrings the first occurrence wins.
#[must_use]
pub fn anchor_column(source_line: &str, token_column: u32, search: &str) -> usize {
    let from = (token_column as usize).saturating_sub(1).min(source_line.len());
    source_line[from..]
        .find(search)
        .map(|i| i + from)
        .or_else(|| source_line.find(search))
        .unwrap_or(from)
}

/// Map a node span inside a fragment back to a template-local location.
#[must_use]
pub fn span_to_location(
    fragment: &CodeFragment,
    span: Span,
    token: &Token,
    source_line: &str,
) -> Location {
    let line = token.loc.start.line;
    let newlines = fragment.code[..span.start.min(fragment.code.len())]
        .matches('\n')
        .count();
    let width = u32::try_from(span.end.saturating_sub(span.start)).unwrap_or(0);

    if newlines == 0 {
        let anchor = anchor_column(source_line, token.loc.start.column, &fragment.search);
        let column =
            u32::try_from(anchor + span.start.saturating_sub(fragment.offset)).unwrap_or(u32::MAX);
        return Location::at(line, column, line, column + width);
    }

    // Continuation line of a multi-line fragment: columns are relative to
    // that fragment line. Approximate, as documented.
    let line_start = fragment.code[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let column = u32::try_from(span.start - line_start).unwrap_or(u32::MAX);
    let line = line + u32::try_from(newlines).unwrap_or(0);
    Location::at(line, column, line, column + width)
}

/// Usage records for every identifier and member access in the token's
/// fragment. A fragment that fails to parse contributes nothing.
#[must_use]
pub fn correlate(token: &Token, source_line: &str) -> Vec<UsageRecord> {
    let Some(fragment) = code_from_token(token) else {
        return Vec::new();
    };
    let Ok(expr) = plint_expr::parse(&fragment.code) else {
        return Vec::new();
    };
    let mut records = Vec::new();
    collect(&expr, &fragment, token, source_line, &mut records);
    records
}

fn record(
    path: Vec<PathSegment>,
    span: Span,
    fragment: &CodeFragment,
    token: &Token,
    source_line: &str,
    records: &mut Vec<UsageRecord>,
) {
    let loc = span_to_location(fragment, span, token, source_line);
    records.push(UsageRecord { path, loc });
}

/// Walk a member chain down to its root identifier; the returned span is
/// the outermost property segment's.
fn member_path(expr: &Expr) -> Option<(Vec<PathSegment>, Span)> {
    match &expr.kind {
        ExprKind::Identifier(name) => Some((vec![PathSegment::Named(name.clone())], expr.span)),
        ExprKind::Paren(inner) => member_path(inner),
        ExprKind::Member { object, property } => {
            let (mut path, _) = member_path(object)?;
            match property {
                MemberKey::Named { name, span } => {
                    path.push(PathSegment::Named(name.clone()));
                    Some((path, *span))
                }
                MemberKey::Computed(key) => {
                    if let ExprKind::StringLit(value) = &key.kind {
                        path.push(PathSegment::Named(value.clone()));
                        Some((path, key.span))
                    } else {
                        path.push(PathSegment::AnyKey);
                        Some((path, expr.span))
                    }
                }
            }
        }
        _ => None,
    }
}

fn collect(
    expr: &Expr,
    fragment: &CodeFragment,
    token: &Token,
    source_line: &str,
    records: &mut Vec<UsageRecord>,
) {
    match &expr.kind {
        ExprKind::Identifier(name) => record(
            vec![PathSegment::Named(name.clone())],
            expr.span,
            fragment,
            token,
            source_line,
            records,
        ),
        ExprKind::Member { object, property } => {
            if let Some((path, span)) = member_path(expr) {
                record(path, span, fragment, token, source_line, records);
            } else {
                collect(object, fragment, token, source_line, records);
            }
            // Identifiers inside non-literal computed keys are usages of
            // their own.
            if let MemberKey::Computed(key) = property {
                if !matches!(key.kind, ExprKind::StringLit(_)) {
                    collect(key, fragment, token, source_line, records);
                }
            }
        }
        ExprKind::Call { callee, args } => {
            collect(callee, fragment, token, source_line, records);
            for arg in args {
                collect(arg, fragment, token, source_line, records);
            }
        }
        ExprKind::Spread(inner) | ExprKind::Paren(inner) => {
            collect(inner, fragment, token, source_line, records);
        }
        ExprKind::ObjectLit(properties) => {
            for property in properties {
                match &property.key {
                    plint_expr::PropertyKey::Computed(key)
                    | plint_expr::PropertyKey::Spread(key) => {
                        collect(key, fragment, token, source_line, records);
                    }
                    plint_expr::PropertyKey::Named { name, span } => {
                        if property.value.is_none() {
                            // shorthand: the key is also the value
                            record(
                                vec![PathSegment::Named(name.clone())],
                                *span,
                                fragment,
                                token,
                                source_line,
                                records,
                            );
                        }
                    }
                    plint_expr::PropertyKey::StringLit { .. } => {}
                }
                if let Some(value) = &property.value {
                    collect(value, fragment, token, source_line, records);
                }
            }
        }
        ExprKind::ArrayLit(elements) | ExprKind::TemplateLit { parts: elements } => {
            for element in elements {
                collect(element, fragment, token, source_line, records);
            }
        }
        ExprKind::Unary { operand, .. } => {
            collect(operand, fragment, token, source_line, records);
        }
        ExprKind::Binary { left, right, .. } => {
            collect(left, fragment, token, source_line, records);
            collect(right, fragment, token, source_line, records);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            collect(test, fragment, token, source_line, records);
            collect(consequent, fragment, token, source_line, records);
            collect(alternate, fragment, token, source_line, records);
        }
        ExprKind::Arrow { body, .. } => {
            collect(body, fragment, token, source_line, records);
        }
        ExprKind::StringLit(_)
        | ExprKind::NumberLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::NullLit => {}
    }
}
