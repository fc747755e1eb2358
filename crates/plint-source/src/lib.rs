//! Source coordinates for embedded-template analysis.
//!
//! Template text lives inside a host source file, so every position exists in
//! two coordinate systems at once: template-local (what the lexer reports) and
//! host-source (what diagnostics must carry). This crate owns the value types
//! for both, the one place the translation arithmetic lives
//! ([`TemplateMapper`]), and the terminal renderer for finished diagnostics.

mod index;
mod mapper;
mod position;
mod render;

pub use index::LineIndex;
pub use mapper::TemplateMapper;
pub use position::LineCol;
pub use position::Location;
pub use render::DiagnosticRenderer;
pub use render::Severity;
pub use render::SourceDiagnostic;
