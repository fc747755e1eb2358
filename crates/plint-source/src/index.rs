use crate::position::LineCol;

/// Byte offsets of line starts, for turning host line/column positions into
/// byte ranges when rendering snippets.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    length: u32,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(u32::try_from(offset + 1).unwrap_or(u32::MAX));
            }
        }
        Self {
            line_starts,
            length: u32::try_from(text.len()).unwrap_or(u32::MAX),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset for a host position (1-indexed line, 0-indexed column).
    ///
    /// Positions past the last line or past end of text clamp to the text
    /// length, so a range built from two calls is always valid to slice.
    #[must_use]
    pub fn offset(&self, pos: LineCol) -> u32 {
        let line = pos.line.saturating_sub(1) as usize;
        let Some(start) = self.line_starts.get(line) else {
            return self.length;
        };
        start.saturating_add(pos.column).min(self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_by_line_and_column() {
        let index = LineIndex::new("abc\ndef\nghi");
        assert_eq!(index.offset(LineCol::new(1, 0)), 0);
        assert_eq!(index.offset(LineCol::new(2, 0)), 4);
        assert_eq!(index.offset(LineCol::new(3, 2)), 10);
    }

    #[test]
    fn clamps_out_of_range() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset(LineCol::new(9, 0)), 5);
        assert_eq!(index.offset(LineCol::new(2, 99)), 5);
    }

    #[test]
    fn counts_lines() {
        assert_eq!(LineIndex::new("").line_count(), 1);
        assert_eq!(LineIndex::new("a\nb\n").line_count(), 3);
    }
}
