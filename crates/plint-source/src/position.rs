use serde::Serialize;

/// A line/column position within a text document.
///
/// Which convention the fields follow depends on the coordinate space:
/// template-local positions use 1-indexed lines *and* columns (the lexer's
/// convention), host-source positions use 1-indexed lines and 0-indexed
/// columns (the reporting sink's convention). [`crate::TemplateMapper`] is
/// the only code that converts between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A start/end pair of positions, both in the same coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub start: LineCol,
    pub end: LineCol,
}

impl Location {
    #[must_use]
    pub fn new(start: LineCol, end: LineCol) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn at(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start: LineCol::new(start_line, start_column),
            end: LineCol::new(end_line, end_column),
        }
    }
}
