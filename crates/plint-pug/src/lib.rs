//! Tokenization of the Pug subset used inside template literals.
//!
//! The lexer is line-oriented and produces a flat token sequence with
//! explicit `indent`/`outdent`/`newline` structure tokens; [`TokenStream`]
//! wraps that sequence with total sentinel-based indexing for the analysis
//! layer.

mod lexer;
mod stream;
mod tokens;

pub use lexer::LexError;
pub use lexer::Lexer;
pub use stream::TokenStream;
pub use tokens::Token;
pub use tokens::TokenKind;
