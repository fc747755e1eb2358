use crate::ast::Span;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    Ident(String),
    Number(f64),
    Str(String),
    /// A backtick template; substitutions are kept as raw source slices with
    /// their absolute offsets and parsed later.
    Template(Vec<TemplatePart>),
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePart {
    pub source: String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tok {
    pub kind: TokKind,
    pub span: Span,
}

/// Byte-oriented scanner over one expression fragment.
///
/// `base` is added to every span so fragments cut out of a larger source
/// (template substitutions, wrapped attribute values) report positions in
/// the caller's coordinate space.
pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

const PUNCTS: &[&str] = &[
    "...", "===", "!==", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "(", ")", "[", "]", "{",
    "}", ",", ".", ":", "?", "!", "<", ">", "+", "-", "*", "/", "%",
];

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(source: &'a str, base: usize) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            base,
        }
    }

    pub fn scan_all(mut self) -> Result<Vec<Tok>, ParseError> {
        let mut toks = Vec::new();
        loop {
            let tok = self.next_tok()?;
            let done = tok.kind == TokKind::Eof;
            toks.push(tok);
            if done {
                return Ok(toks);
            }
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::new(self.base + offset, message)
    }

    fn next_tok(&mut self) -> Result<Tok, ParseError> {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let start = self.pos;
        if self.pos >= self.bytes.len() {
            return Ok(Tok {
                kind: TokKind::Eof,
                span: Span::new(self.base + start, self.base + start),
            });
        }

        let b = self.bytes[self.pos];

        if b.is_ascii_alphabetic() || b == b'_' || b == b'$' {
            while self.pos < self.bytes.len() && is_ident_byte(self.bytes[self.pos]) {
                self.pos += 1;
            }
            return Ok(self.tok(TokKind::Ident(self.source[start..self.pos].to_string()), start));
        }

        if b.is_ascii_digit() || (b == b'.' && self.peek_digit()) {
            return self.scan_number(start);
        }

        if b == b'"' || b == b'\'' {
            return self.scan_string(start, b);
        }

        if b == b'`' {
            return self.scan_template(start);
        }

        for punct in PUNCTS {
            if self.source[self.pos..].starts_with(punct) {
                self.pos += punct.len();
                return Ok(self.tok(TokKind::Punct(punct), start));
            }
        }

        Err(self.error(
            start,
            format!("unexpected character {:?}", self.source[start..].chars().next().unwrap_or(' ')),
        ))
    }

    fn tok(&self, kind: TokKind, start: usize) -> Tok {
        Tok {
            kind,
            span: Span::new(self.base + start, self.base + self.pos),
        }
    }

    fn peek_digit(&self) -> bool {
        self.bytes
            .get(self.pos + 1)
            .is_some_and(u8::is_ascii_digit)
    }

    fn scan_number(&mut self, start: usize) -> Result<Tok, ParseError> {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_digit() || self.bytes[self.pos] == b'.')
        {
            self.pos += 1;
        }
        // exponent part
        if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            let mut ahead = self.pos + 1;
            if matches!(self.bytes.get(ahead), Some(b'+' | b'-')) {
                ahead += 1;
            }
            if self.bytes.get(ahead).is_some_and(u8::is_ascii_digit) {
                self.pos = ahead;
                while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
            }
        }
        let text = &self.source[start..self.pos];
        let value = text
            .parse::<f64>()
            .map_err(|_| self.error(start, format!("invalid number literal {text:?}")))?;
        Ok(self.tok(TokKind::Number(value), start))
    }

    fn scan_string(&mut self, start: usize, quote: u8) -> Result<Tok, ParseError> {
        self.pos += 1;
        let mut value = String::new();
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'\\' && self.pos + 1 < self.bytes.len() {
                value.push(unescape(self.bytes[self.pos + 1]));
                self.pos += 2;
                continue;
            }
            if b == quote {
                self.pos += 1;
                return Ok(self.tok(TokKind::Str(value), start));
            }
            let ch_len = utf8_len(b);
            value.push_str(&self.source[self.pos..self.pos + ch_len]);
            self.pos += ch_len;
        }
        Err(self.error(start, "unterminated string literal"))
    }

    fn scan_template(&mut self, start: usize) -> Result<Tok, ParseError> {
        self.pos += 1;
        let mut parts = Vec::new();
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'\\' && self.pos + 1 < self.bytes.len() {
                self.pos += 2;
                continue;
            }
            if b == b'`' {
                self.pos += 1;
                return Ok(self.tok(TokKind::Template(parts), start));
            }
            if b == b'$' && self.bytes.get(self.pos + 1) == Some(&b'{') {
                let sub_start = self.pos + 2;
                let mut depth = 1usize;
                let mut j = sub_start;
                while j < self.bytes.len() && depth > 0 {
                    match self.bytes[j] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    if depth == 0 {
                        break;
                    }
                    j += 1;
                }
                if depth > 0 {
                    return Err(self.error(self.pos, "unterminated template substitution"));
                }
                parts.push(TemplatePart {
                    source: self.source[sub_start..j].to_string(),
                    offset: self.base + sub_start,
                });
                self.pos = j + 1;
                continue;
            }
            self.pos += utf8_len(b);
        }
        Err(self.error(start, "unterminated template literal"))
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn utf8_len(b: u8) -> usize {
    match b {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    }
}

fn unescape(b: u8) -> char {
    match b {
        b'n' => '\n',
        b't' => '\t',
        b'r' => '\r',
        other => other as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokKind> {
        Scanner::new(source, 0)
            .scan_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_identifiers_and_puncts() {
        assert_eq!(
            kinds("a.b"),
            [
                TokKind::Ident("a".to_string()),
                TokKind::Punct("."),
                TokKind::Ident("b".to_string()),
                TokKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_punct_wins() {
        assert_eq!(
            kinds("a === b"),
            [
                TokKind::Ident("a".to_string()),
                TokKind::Punct("==="),
                TokKind::Ident("b".to_string()),
                TokKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_honor_base_offset() {
        let toks = Scanner::new("ab", 10).scan_all().unwrap();
        assert_eq!(toks[0].span, Span::new(10, 12));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#"'it\'s'"#),
            [TokKind::Str("it's".to_string()), TokKind::Eof]
        );
    }

    #[test]
    fn template_collects_substitutions() {
        let toks = Scanner::new("`a ${x} b ${y.z}`", 0).scan_all().unwrap();
        let TokKind::Template(parts) = &toks[0].kind else {
            panic!("expected template token");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].source, "x");
        assert_eq!(parts[0].offset, 5);
        assert_eq!(parts[1].source, "y.z");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = Scanner::new("'abc", 0).scan_all().unwrap_err();
        assert_eq!(err.offset, 0);
    }
}
