use crate::ast::BinaryOp;
use crate::ast::Expr;
use crate::ast::ExprKind;
use crate::ast::MemberKey;
use crate::ast::Param;
use crate::ast::Property;
use crate::ast::PropertyKey;
use crate::ast::Span;
use crate::ast::UnaryOp;
use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::scanner::Tok;
use crate::scanner::TokKind;

/// Parse one expression fragment.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    parse_at(source, 0)
}

/// Parse a fragment cut out of a larger source; `base` is added to every
/// span so positions stay absolute.
pub fn parse_at(source: &str, base: usize) -> Result<Expr, ParseError> {
    let toks = Scanner::new(source, base).scan_all()?;
    let mut parser = Parser { toks, pos: 0 };
    let expr = parser.expression(0)?;
    parser.expect_eof()?;
    Ok(expr)
}

const TERNARY_BP: u8 = 1;

fn binary_op(tok: &TokKind) -> Option<(BinaryOp, u8, u8)> {
    let (op, lbp) = match tok {
        TokKind::Punct("||") => (BinaryOp::Or, 3),
        TokKind::Punct("??") => (BinaryOp::NullishCoalesce, 3),
        TokKind::Punct("&&") => (BinaryOp::And, 5),
        TokKind::Punct("==") => (BinaryOp::Eq, 7),
        TokKind::Punct("!=") => (BinaryOp::NotEq, 7),
        TokKind::Punct("===") => (BinaryOp::StrictEq, 7),
        TokKind::Punct("!==") => (BinaryOp::StrictNotEq, 7),
        TokKind::Punct("<") => (BinaryOp::Lt, 9),
        TokKind::Punct("<=") => (BinaryOp::LtEq, 9),
        TokKind::Punct(">") => (BinaryOp::Gt, 9),
        TokKind::Punct(">=") => (BinaryOp::GtEq, 9),
        TokKind::Ident(name) if name == "in" => (BinaryOp::In, 9),
        TokKind::Ident(name) if name == "instanceof" => (BinaryOp::InstanceOf, 9),
        TokKind::Punct("+") => (BinaryOp::Add, 11),
        TokKind::Punct("-") => (BinaryOp::Sub, 11),
        TokKind::Punct("*") => (BinaryOp::Mul, 13),
        TokKind::Punct("/") => (BinaryOp::Div, 13),
        TokKind::Punct("%") => (BinaryOp::Rem, 13),
        _ => return None,
    };
    Some((op, lbp, lbp + 1))
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.toks[self.pos.min(self.toks.len() - 1)]
    }

    fn peek_at(&self, n: usize) -> &Tok {
        &self.toks[(self.pos + n).min(self.toks.len() - 1)]
    }

    fn advance(&mut self) -> Tok {
        let tok = self.peek().clone();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_punct(&self, punct: &str) -> bool {
        matches!(&self.peek().kind, TokKind::Punct(p) if *p == punct)
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.at_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, punct: &str) -> Result<Tok, ParseError> {
        if self.at_punct(punct) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(ParseError::new(
                tok.span.start,
                format!("expected {punct:?}"),
            ))
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        let tok = self.peek();
        if tok.kind == TokKind::Eof {
            Ok(())
        } else {
            Err(ParseError::new(tok.span.start, "unexpected trailing input"))
        }
    }

    fn expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;

        loop {
            if let Some((op, lbp, rbp)) = binary_op(&self.peek().kind) {
                if lbp < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.expression(rbp)?;
                let span = Span::new(lhs.span.start, rhs.span.end);
                lhs = Expr::new(
                    ExprKind::Binary {
                        op,
                        left: Box::new(lhs),
                        right: Box::new(rhs),
                    },
                    span,
                );
                continue;
            }
            if self.at_punct("?") && min_bp <= TERNARY_BP {
                self.advance();
                let consequent = self.expression(0)?;
                self.expect_punct(":")?;
                let alternate = self.expression(TERNARY_BP)?;
                let span = Span::new(lhs.span.start, alternate.span.end);
                lhs = Expr::new(
                    ExprKind::Conditional {
                        test: Box::new(lhs),
                        consequent: Box::new(consequent),
                        alternate: Box::new(alternate),
                    },
                    span,
                );
                continue;
            }
            break;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.peek().kind {
            TokKind::Punct("!") => Some(UnaryOp::Not),
            TokKind::Punct("-") => Some(UnaryOp::Neg),
            TokKind::Punct("+") => Some(UnaryOp::Pos),
            TokKind::Ident(name) if name == "typeof" => Some(UnaryOp::TypeOf),
            TokKind::Ident(name) if name == "void" => Some(UnaryOp::Void),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span.start;
            let operand = self.unary()?;
            let span = Span::new(start, operand.span.end);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat_punct(".") {
                let tok = self.advance();
                let TokKind::Ident(name) = tok.kind else {
                    return Err(ParseError::new(tok.span.start, "expected property name"));
                };
                let span = Span::new(expr.span.start, tok.span.end);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: MemberKey::Named {
                            name,
                            span: tok.span,
                        },
                    },
                    span,
                );
                continue;
            }
            if self.at_punct("[") {
                self.advance();
                let key = self.expression(0)?;
                let close = self.expect_punct("]")?;
                let span = Span::new(expr.span.start, close.span.end);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: MemberKey::Computed(Box::new(key)),
                    },
                    span,
                );
                continue;
            }
            if self.at_punct("(") {
                self.advance();
                let mut args = Vec::new();
                while !self.at_punct(")") {
                    args.push(self.argument()?);
                    if !self.eat_punct(",") {
                        break;
                    }
                }
                let close = self.expect_punct(")")?;
                let span = Span::new(expr.span.start, close.span.end);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
                continue;
            }
            break;
        }
        Ok(expr)
    }

    fn argument(&mut self) -> Result<Expr, ParseError> {
        if self.at_punct("...") {
            let start = self.advance().span.start;
            let inner = self.expression(0)?;
            let span = Span::new(start, inner.span.end);
            return Ok(Expr::new(ExprKind::Spread(Box::new(inner)), span));
        }
        self.expression(0)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokKind::Number(value) => {
                self.advance();
                Ok(Expr::new(ExprKind::NumberLit(value), tok.span))
            }
            TokKind::Str(value) => {
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(value), tok.span))
            }
            TokKind::Template(parts) => {
                self.advance();
                let parts = parts
                    .iter()
                    .map(|part| parse_at(&part.source, part.offset))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::new(ExprKind::TemplateLit { parts }, tok.span))
            }
            TokKind::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "true" => Ok(Expr::new(ExprKind::BoolLit(true), tok.span)),
                    "false" => Ok(Expr::new(ExprKind::BoolLit(false), tok.span)),
                    "null" => Ok(Expr::new(ExprKind::NullLit, tok.span)),
                    _ => {
                        if self.at_punct("=>") {
                            self.advance();
                            let body = self.expression(0)?;
                            let span = Span::new(tok.span.start, body.span.end);
                            return Ok(Expr::new(
                                ExprKind::Arrow {
                                    params: vec![Param {
                                        name,
                                        span: tok.span,
                                    }],
                                    body: Box::new(body),
                                },
                                span,
                            ));
                        }
                        Ok(Expr::new(ExprKind::Identifier(name), tok.span))
                    }
                }
            }
            TokKind::Punct("(") => {
                if self.paren_starts_arrow() {
                    return self.arrow();
                }
                let start = self.advance().span.start;
                let inner = self.expression(0)?;
                let close = self.expect_punct(")")?;
                Ok(Expr::new(
                    ExprKind::Paren(Box::new(inner)),
                    Span::new(start, close.span.end),
                ))
            }
            TokKind::Punct("[") => {
                let start = self.advance().span.start;
                let mut elements = Vec::new();
                while !self.at_punct("]") {
                    elements.push(self.argument()?);
                    if !self.eat_punct(",") {
                        break;
                    }
                }
                let close = self.expect_punct("]")?;
                Ok(Expr::new(
                    ExprKind::ArrayLit(elements),
                    Span::new(start, close.span.end),
                ))
            }
            TokKind::Punct("{") => self.object(),
            _ => Err(ParseError::new(tok.span.start, "expected an expression")),
        }
    }

    /// Decide `(a, b) => …` against `(expr)` by finding the matching close
    /// parenthesis and looking one token past it.
    fn paren_starts_arrow(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0usize;
        loop {
            let tok = self.peek_at(n);
            match tok.kind {
                TokKind::Punct("(") => depth += 1,
                TokKind::Punct(")") => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(self.peek_at(n + 1).kind, TokKind::Punct("=>"));
                    }
                }
                TokKind::Eof => return false,
                _ => {}
            }
            n += 1;
        }
    }

    fn arrow(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_punct("(")?.span.start;
        let mut params = Vec::new();
        while !self.at_punct(")") {
            let tok = self.advance();
            let TokKind::Ident(name) = tok.kind else {
                return Err(ParseError::new(
                    tok.span.start,
                    "expected a simple parameter name",
                ));
            };
            params.push(Param {
                name,
                span: tok.span,
            });
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        self.expect_punct("=>")?;
        let body = self.expression(0)?;
        let span = Span::new(start, body.span.end);
        Ok(Expr::new(
            ExprKind::Arrow {
                params,
                body: Box::new(body),
            },
            span,
        ))
    }

    fn object(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_punct("{")?.span.start;
        let mut properties = Vec::new();
        while !self.at_punct("}") {
            properties.push(self.property()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        let close = self.expect_punct("}")?;
        Ok(Expr::new(
            ExprKind::ObjectLit(properties),
            Span::new(start, close.span.end),
        ))
    }

    fn property(&mut self) -> Result<Property, ParseError> {
        if self.at_punct("...") {
            let start = self.advance().span.start;
            let inner = self.expression(0)?;
            let span = Span::new(start, inner.span.end);
            return Ok(Property {
                key: PropertyKey::Spread(Box::new(inner)),
                value: None,
                span,
            });
        }
        let tok = self.advance();
        let (key, key_end) = match tok.kind {
            TokKind::Ident(name) => (
                PropertyKey::Named {
                    name,
                    span: tok.span,
                },
                tok.span.end,
            ),
            TokKind::Str(value) => (
                PropertyKey::StringLit {
                    value,
                    span: tok.span,
                },
                tok.span.end,
            ),
            TokKind::Punct("[") => {
                let key = self.expression(0)?;
                let close = self.expect_punct("]")?;
                (PropertyKey::Computed(Box::new(key)), close.span.end)
            }
            _ => {
                return Err(ParseError::new(tok.span.start, "expected a property key"));
            }
        };

        if self.eat_punct(":") {
            let value = self.expression(0)?;
            let span = Span::new(tok.span.start, value.span.end);
            return Ok(Property {
                key,
                value: Some(value),
                span,
            });
        }
        // shorthand; only valid for named keys
        if matches!(key, PropertyKey::Named { .. }) {
            return Ok(Property {
                key,
                value: None,
                span: Span::new(tok.span.start, key_end),
            });
        }
        Err(ParseError::new(key_end, "expected \":\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_member_chain_with_spans() {
        let expr = parse("user.name").unwrap();
        assert_eq!(expr.span, Span::new(0, 9));
        let ExprKind::Member { object, property } = &expr.kind else {
            panic!("expected member");
        };
        assert_eq!(object.kind, ExprKind::Identifier("user".to_string()));
        let MemberKey::Named { name, span } = property else {
            panic!("expected named key");
        };
        assert_eq!(name, "name");
        assert_eq!(*span, Span::new(5, 9));
    }

    #[test]
    fn computed_member_with_string_key() {
        let expr = parse("row['id']").unwrap();
        let ExprKind::Member { property, .. } = &expr.kind else {
            panic!("expected member");
        };
        let MemberKey::Computed(key) = property else {
            panic!("expected computed key");
        };
        assert_eq!(key.kind, ExprKind::StringLit("id".to_string()));
    }

    #[test]
    fn parses_conditional() {
        let expr = parse("ok ? a : b").unwrap();
        assert!(matches!(expr.kind, ExprKind::Conditional { .. }));
    }

    #[test]
    fn binary_precedence() {
        let expr = parse("a + b * c").unwrap();
        let ExprKind::Binary { op, right, .. } = &expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(
            right.kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn arrow_with_parenthesized_params() {
        let expr = parse("(item, i) => item.label").unwrap();
        let ExprKind::Arrow { params, body } = &expr.kind else {
            panic!("expected arrow");
        };
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "item");
        assert!(matches!(body.kind, ExprKind::Member { .. }));
    }

    #[test]
    fn bare_param_arrow() {
        let expr = parse("x => x").unwrap();
        assert!(matches!(expr.kind, ExprKind::Arrow { .. }));
    }

    #[test]
    fn object_with_shorthand_and_spread() {
        let expr = parse("{ a, b: 1, ...rest }").unwrap();
        let ExprKind::ObjectLit(props) = &expr.kind else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 3);
        assert!(props[0].value.is_none());
        assert!(matches!(props[2].key, PropertyKey::Spread(_)));
    }

    #[test]
    fn wrapped_object_is_paren() {
        let expr = parse("({first: 'one'})").unwrap();
        let ExprKind::Paren(inner) = &expr.kind else {
            panic!("expected paren");
        };
        assert!(matches!(inner.kind, ExprKind::ObjectLit(_)));
        assert_eq!(inner.span.start, 1);
    }

    #[test]
    fn call_with_spread_argument() {
        let expr = parse("fn(a, ...rest)").unwrap();
        let ExprKind::Call { args, .. } = &expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(args[1].kind, ExprKind::Spread(_)));
    }

    #[test]
    fn template_substitutions_parse_with_absolute_spans() {
        let expr = parse("`id-${item.id}`").unwrap();
        let ExprKind::TemplateLit { parts } = &expr.kind else {
            panic!("expected template");
        };
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].span, Span::new(6, 13));
    }

    #[test]
    fn trailing_input_is_an_error() {
        let err = parse("a b").unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn broken_input_is_an_error_not_a_panic() {
        assert!(parse("").is_err());
        assert!(parse("a.").is_err());
        assert!(parse("(a").is_err());
        assert!(parse("{a: }").is_err());
    }
}
