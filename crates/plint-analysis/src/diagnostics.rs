use plint_source::Location;
use serde::Serialize;

/// The closed set of findings the engine reports, each with a stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    BrokenTemplate,
    MissingLeadingBlank,
    MissingTrailingBlank,
    ExtraBlankLines,
    MissingBlankBeforeOutdent,
    MissingBlankBetweenSiblings,
    BadIndentation,
    UndefinedVariable,
    Interpolation,
    WrongQuotes,
}

impl DiagnosticKind {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::BrokenTemplate => "P001",
            DiagnosticKind::MissingLeadingBlank => "P101",
            DiagnosticKind::MissingTrailingBlank => "P102",
            DiagnosticKind::ExtraBlankLines => "P103",
            DiagnosticKind::MissingBlankBeforeOutdent => "P104",
            DiagnosticKind::MissingBlankBetweenSiblings => "P105",
            DiagnosticKind::BadIndentation => "P201",
            DiagnosticKind::UndefinedVariable => "P301",
            DiagnosticKind::Interpolation => "P401",
            DiagnosticKind::WrongQuotes => "P501",
        }
    }
}

/// A reportable finding in host-source coordinates (1-indexed lines,
/// 0-indexed columns). Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub message: String,
    pub location: Location,
}

/// Pure construction; `location` must already be host-relative.
#[must_use]
pub fn emit(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Diagnostic {
    Diagnostic {
        kind,
        code: kind.code(),
        message: message.into(),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_distinct() {
        let kinds = [
            DiagnosticKind::BrokenTemplate,
            DiagnosticKind::MissingLeadingBlank,
            DiagnosticKind::MissingTrailingBlank,
            DiagnosticKind::ExtraBlankLines,
            DiagnosticKind::MissingBlankBeforeOutdent,
            DiagnosticKind::MissingBlankBetweenSiblings,
            DiagnosticKind::BadIndentation,
            DiagnosticKind::UndefinedVariable,
            DiagnosticKind::Interpolation,
            DiagnosticKind::WrongQuotes,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn emit_is_pure_construction() {
        let diag = emit(
            DiagnosticKind::UndefinedVariable,
            Location::at(3, 4, 3, 8),
            "'user' is not defined.",
        );
        assert_eq!(diag.code, "P301");
        assert_eq!(diag.location, Location::at(3, 4, 3, 8));
    }
}
