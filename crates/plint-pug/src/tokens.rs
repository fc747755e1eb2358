use plint_source::Location;
use serde::Serialize;

/// The closed vocabulary of lexical units.
///
/// Names serialize to the kebab-case spelling the rest of the system talks
/// about (`else-if`, `start-pipeless-text`, …). `Nothing` is the sentinel
/// returned for out-of-range stream lookups; it exists as a real variant so
/// every match over token kinds is forced to consider it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TokenKind {
    Tag {
        name: String,
    },
    Class {
        name: String,
    },
    Id {
        name: String,
    },
    StartAttributes,
    Attribute {
        name: String,
        /// Raw value expression, still quoted/braced as written. `None` for
        /// boolean attributes (`input(disabled)`).
        value: Option<String>,
    },
    EndAttributes,
    Code {
        value: String,
        buffered: bool,
    },
    InterpolatedCode {
        value: String,
        must_escape: bool,
    },
    If {
        value: String,
    },
    ElseIf {
        value: String,
    },
    Else,
    Each {
        /// The loop binding (`item` in `each item, i in list`).
        value: String,
        /// The optional index binding.
        key: Option<String>,
        /// The iterable expression source.
        code: String,
    },
    Text {
        value: String,
    },
    StartPipelessText,
    EndPipelessText,
    Comment {
        value: String,
        /// `//` comments render into output, `//-` ones do not.
        buffered: bool,
    },
    Newline,
    Indent,
    Outdent,
    Eos,
    #[serde(rename = "_nothing")]
    Nothing,
}

impl TokenKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Tag { .. } => "tag",
            TokenKind::Class { .. } => "class",
            TokenKind::Id { .. } => "id",
            TokenKind::StartAttributes => "start-attributes",
            TokenKind::Attribute { .. } => "attribute",
            TokenKind::EndAttributes => "end-attributes",
            TokenKind::Code { .. } => "code",
            TokenKind::InterpolatedCode { .. } => "interpolated-code",
            TokenKind::If { .. } => "if",
            TokenKind::ElseIf { .. } => "else-if",
            TokenKind::Else => "else",
            TokenKind::Each { .. } => "each",
            TokenKind::Text { .. } => "text",
            TokenKind::StartPipelessText => "start-pipeless-text",
            TokenKind::EndPipelessText => "end-pipeless-text",
            TokenKind::Comment { .. } => "comment",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Outdent => "outdent",
            TokenKind::Eos => "eos",
            TokenKind::Nothing => "_nothing",
        }
    }
}

/// A lexical unit with its template-local location (1-indexed lines and
/// columns). Produced once per tokenization, immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: Location,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, loc: Location) -> Self {
        Self { kind, loc }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, TokenKind::Text { .. })
    }

    #[must_use]
    pub fn is_newline(&self) -> bool {
        matches!(self.kind, TokenKind::Newline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_use_lexer_spelling() {
        assert_eq!(
            TokenKind::ElseIf {
                value: String::new()
            }
            .name(),
            "else-if"
        );
        assert_eq!(TokenKind::EndPipelessText.name(), "end-pipeless-text");
        assert_eq!(TokenKind::Nothing.name(), "_nothing");
    }
}
