use annotate_snippets::AnnotationKind;
use annotate_snippets::Level;
use annotate_snippets::Renderer;
use annotate_snippets::Snippet;

/// Severity label for rendered diagnostics.
///
/// Deliberately separate from any rule-level notion of severity — the
/// renderer only needs to know what label to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic ready for rendering.
///
/// Callers extract the byte range, code and message from their own
/// diagnostic types and build this struct; rendering goes through
/// `annotate-snippets`.
#[derive(Debug)]
pub struct SourceDiagnostic<'a> {
    pub source: &'a str,
    pub path: &'a str,
    pub code: &'a str,
    pub message: &'a str,
    pub severity: Severity,
    pub start: usize,
    pub end: usize,
}

/// Renders diagnostics as formatted text.
///
/// Plain mode has no ANSI colors — use it for tests and piped output;
/// styled mode is for terminal display.
#[derive(Debug)]
pub struct DiagnosticRenderer {
    renderer: Renderer,
}

impl DiagnosticRenderer {
    #[must_use]
    pub fn plain() -> Self {
        Self {
            renderer: Renderer::plain(),
        }
    }

    #[must_use]
    pub fn styled() -> Self {
        Self {
            renderer: Renderer::styled(),
        }
    }

    #[must_use]
    pub fn render(&self, diagnostic: &SourceDiagnostic<'_>) -> String {
        let level = match diagnostic.severity {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
        };

        let end = diagnostic.end.max(diagnostic.start);
        let snippet = Snippet::source(diagnostic.source)
            .path(diagnostic.path)
            .line_start(1)
            .annotation(
                AnnotationKind::Primary
                    .span(diagnostic.start..end)
                    .label(diagnostic.message),
            );

        let title = level
            .primary_title(diagnostic.message)
            .id(diagnostic.code)
            .element(snippet);

        let report = &[title];
        self.renderer.render(report).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_code_path_and_carets() {
        let source = "\ndiv\n  span\ndiv\n";
        let diag = SourceDiagnostic {
            source,
            path: "component.pug",
            code: "P104",
            message: "Need empty line when you are off from the scope",
            severity: Severity::Error,
            start: 12,
            end: 15,
        };
        let output = DiagnosticRenderer::plain().render(&diag);

        assert!(output.contains("error[P104]"));
        assert!(output.contains("component.pug"));
        assert!(output.contains("Need empty line"));
        assert!(output.contains("^^^"));
    }

    #[test]
    fn plain_has_no_ansi() {
        let diag = SourceDiagnostic {
            source: "div\n",
            path: "a.pug",
            code: "P100",
            message: "boom",
            severity: Severity::Warning,
            start: 0,
            end: 3,
        };
        let output = DiagnosticRenderer::plain().render(&diag);
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn empty_span_does_not_invert() {
        let diag = SourceDiagnostic {
            source: "div\n",
            path: "a.pug",
            code: "P100",
            message: "boom",
            severity: Severity::Error,
            start: 2,
            end: 1,
        };
        // Must not panic on an inverted range.
        let _ = DiagnosticRenderer::plain().render(&diag);
    }
}
