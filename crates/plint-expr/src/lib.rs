//! A small expression parser for the code fragments templates embed:
//! attribute values, loop iterables, conditions and interpolations.
//!
//! Hand-written scanner plus Pratt parser. Every node carries a byte-offset
//! span into the fragment; [`parse_at`] shifts spans by a base offset so
//! fragments cut out of a larger source report absolute positions.

mod ast;
mod error;
mod parser;
mod scanner;

pub use ast::BinaryOp;
pub use ast::Expr;
pub use ast::ExprKind;
pub use ast::MemberKey;
pub use ast::Param;
pub use ast::Property;
pub use ast::PropertyKey;
pub use ast::Span;
pub use ast::UnaryOp;
pub use error::ParseError;
pub use parser::parse;
pub use parser::parse_at;
