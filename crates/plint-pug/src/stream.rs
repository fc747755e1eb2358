use plint_source::LineCol;
use plint_source::Location;

use crate::lexer::Lexer;
use crate::tokens::Token;
use crate::tokens::TokenKind;

static NOTHING: Token = Token {
    kind: TokenKind::Nothing,
    loc: Location {
        start: LineCol { line: 0, column: 0 },
        end: LineCol { line: 0, column: 0 },
    },
};

/// An immutable token sequence with total, sentinel-based indexing.
///
/// Rules walk streams with relative lookups (`at(i - 2)`, `at(i + 1)`)
/// near both ends; returning the `_nothing` sentinel for any out-of-range
/// index keeps those lookups free of bounds bookkeeping. The sentinel never
/// equals a real token: its location is all zeros and real lines start at 1.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Tokenize `source`; a template the lexer rejects becomes an empty
    /// stream. Callers that need the failure itself use [`Lexer::check`].
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Total lookup: negative and past-the-end indices yield the sentinel.
    #[must_use]
    pub fn at(&self, index: isize) -> &Token {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&NOTHING)
    }

    /// First token matching `pred`, or the sentinel.
    pub fn find(&self, pred: impl Fn(&Token) -> bool) -> &Token {
        self.tokens.iter().find(|t| pred(t)).unwrap_or(&NOTHING)
    }

    /// Index of the first token at or after `from` matching `pred`.
    pub fn position_from(&self, from: usize, pred: impl Fn(&Token) -> bool) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, t)| pred(t))
            .map(|(i, _)| i)
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_lookups_yield_sentinel() {
        let stream = TokenStream::from_source("div");
        assert_eq!(stream.at(-1).kind, TokenKind::Nothing);
        assert_eq!(stream.at(99).kind, TokenKind::Nothing);
        assert_eq!(stream.at(0).kind.name(), "tag");
    }

    #[test]
    fn sentinel_location_is_out_of_band() {
        let stream = TokenStream::from_source("div");
        let nothing = stream.at(-1);
        assert_eq!(nothing.loc.start.line, 0);
        for token in &stream {
            assert_ne!(token.loc.start.line, 0);
        }
    }

    #[test]
    fn find_eos() {
        let stream = TokenStream::from_source("div\n  span");
        let eos = stream.find(|t| t.kind == TokenKind::Eos);
        assert_eq!(eos.kind, TokenKind::Eos);
    }

    #[test]
    fn find_miss_yields_sentinel() {
        let stream = TokenStream::from_source("div");
        let miss = stream.find(|t| t.kind == TokenKind::Else);
        assert_eq!(miss.kind, TokenKind::Nothing);
    }

    #[test]
    fn unlexable_source_is_empty() {
        let stream = TokenStream::from_source("each x in ]");
        assert!(stream.is_empty());
        assert_eq!(stream.at(0).kind, TokenKind::Nothing);
    }

    #[test]
    fn position_from_skips_earlier_matches() {
        let stream = TokenStream::from_source("div\nspan\np");
        let first = stream.position_from(0, Token::is_newline).unwrap();
        let second = stream.position_from(first + 1, Token::is_newline).unwrap();
        assert!(second > first);
    }
}
