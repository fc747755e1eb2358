//! The analysis engine: structural checks, variable usage, and diagnostics
//! for Pug templates embedded in host-language template literals.
//!
//! One [`Analyzer::analyze`] call processes one template literal to
//! completion. The engine is synchronous and stateless across invocations;
//! configuration is an explicit constructor parameter, never shared mutable
//! state.

mod correlate;
mod diagnostics;
mod scope;
mod usage;
mod walker;

pub mod rules;

use plint_pug::Lexer;
use plint_pug::TokenStream;
use plint_source::LineCol;
use plint_source::Location;
use plint_source::TemplateMapper;
use rustc_hash::FxHashSet;
use tracing::debug;

pub use correlate::code_from_token;
pub use correlate::correlate;
pub use correlate::CodeFragment;
pub use correlate::PathSegment;
pub use correlate::UsageRecord;
pub use diagnostics::emit;
pub use diagnostics::Diagnostic;
pub use diagnostics::DiagnosticKind;
pub use scope::matching_outdent;
pub use scope::slice_body;
pub use usage::used_variables;
pub use usage::UsedVariable;
pub use usage::DEFAULT_GLOBALS;
pub use usage::DEFAULT_SCOPE_BUDGET;
pub use walker::walk;
pub use walker::Finding;
pub use walker::WalkOptions;

/// One template literal as the host glue hands it over.
///
/// `start`/`end` are host positions of the literal expression (1-indexed
/// lines, 0-indexed columns); `content_column` is the host column of the
/// first template character after the opening delimiter; `base_indent` is
/// the column of the first token on the literal's opening line, or
/// `-(step)` for standalone files so top-level content at column 0
/// conforms. Interpolation sites arrive placeholder-substituted in `text`,
/// with their host locations listed in `interpolations`.
#[derive(Debug, Clone)]
pub struct TemplateLiteral {
    pub text: String,
    pub start: LineCol,
    pub end: LineCol,
    pub content_column: u32,
    pub base_indent: i32,
    pub interpolations: Vec<Location>,
}

impl TemplateLiteral {
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    #[must_use]
    pub fn mapper(&self) -> TemplateMapper {
        TemplateMapper::new(self.start.line, self.content_column)
    }
}

/// Identifiers the host scope defines around the literal.
#[derive(Debug, Clone, Default)]
pub struct HostScope {
    pub defined: FxHashSet<String>,
}

impl HostScope {
    #[must_use]
    pub fn new(defined: impl IntoIterator<Item = String>) -> Self {
        Self {
            defined: defined.into_iter().collect(),
        }
    }
}

/// Per-rule enable switches.
#[derive(Debug, Clone)]
pub struct RuleToggles {
    pub broken_template: bool,
    pub empty_lines: bool,
    pub indent: bool,
    pub no_undef: bool,
    pub no_interpolation: bool,
    pub quotes: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            broken_template: true,
            empty_lines: true,
            indent: true,
            no_undef: true,
            no_interpolation: true,
            quotes: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub indent_step: u32,
    pub scope_budget: u32,
    /// Extra identifiers considered defined, on top of the defaults.
    pub globals: Vec<String>,
    pub rules: RuleToggles,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            indent_step: 2,
            scope_budget: DEFAULT_SCOPE_BUDGET,
            globals: Vec::new(),
            rules: RuleToggles::default(),
        }
    }
}

/// An explicitly constructed, stateless analyzer.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    #[must_use]
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze one literal. An unlexable template yields exactly the
    /// broken-template diagnostic; every other rule is skipped for it.
    #[must_use]
    pub fn analyze(&self, literal: &TemplateLiteral, host: &HostScope) -> Vec<Diagnostic> {
        if let Some(error) = Lexer::check(&literal.text) {
            debug!(line = error.line, column = error.column, "template failed to tokenize");
            if self.options.rules.broken_template {
                return vec![rules::broken_template::check(literal, &error)];
            }
            return Vec::new();
        }

        let stream = TokenStream::from_source(&literal.text);
        let findings = walker::walk(
            &literal.text,
            &stream,
            &WalkOptions {
                base_indent: literal.base_indent,
                indent_step: self.options.indent_step,
            },
        );

        let mut diagnostics = Vec::new();
        if self.options.rules.empty_lines {
            diagnostics.extend(rules::empty_lines::check(literal, &findings));
        }
        if self.options.rules.indent {
            diagnostics.extend(rules::indent::check(literal, &findings));
        }
        if self.options.rules.no_undef {
            diagnostics.extend(rules::no_undef::check(literal, host, &self.options));
        }
        if self.options.rules.no_interpolation {
            diagnostics.extend(rules::no_interpolation::check(literal));
        }
        if self.options.rules.quotes {
            diagnostics.extend(rules::quotes::check(literal, &stream));
        }
        debug!(count = diagnostics.len(), "literal analyzed");
        diagnostics
    }
}
