use crate::position::LineCol;
use crate::position::Location;

/// Translates template-local positions into host-source positions.
///
/// Template line 1 coincides with the literal's opening line and begins
/// mid-line, right after the opening delimiter; every later template line is
/// a whole host line. Template columns are 1-indexed, host columns 0-indexed.
///
/// Pure and total: any input position yields a host position, the caller
/// guarantees inputs came from real tokens or literal bounds.
#[derive(Debug, Clone, Copy)]
pub struct TemplateMapper {
    start_line: u32,
    content_column: u32,
}

impl TemplateMapper {
    /// `start_line` is the host line of the opening delimiter;
    /// `content_column` the 0-indexed host column of the first template
    /// character after it.
    #[must_use]
    pub fn new(start_line: u32, content_column: u32) -> Self {
        Self {
            start_line,
            content_column,
        }
    }

    #[must_use]
    pub fn host_line(&self, template_line: u32) -> u32 {
        self.start_line + template_line.saturating_sub(1)
    }

    #[must_use]
    pub fn to_host(&self, pos: LineCol) -> LineCol {
        let column = if pos.line == 1 {
            self.content_column + pos.column.saturating_sub(1)
        } else {
            pos.column.saturating_sub(1)
        };
        LineCol::new(self.host_line(pos.line), column)
    }

    #[must_use]
    pub fn to_host_location(&self, loc: Location) -> Location {
        Location::new(self.to_host(loc.start), self.to_host(loc.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_offsets_by_delimiter() {
        let mapper = TemplateMapper::new(10, 20);
        let host = mapper.to_host(LineCol::new(1, 5));
        assert_eq!(host.line, 10);
        assert_eq!(host.column, 24);
    }

    #[test]
    fn later_lines_ignore_delimiter_column() {
        let mapper = TemplateMapper::new(10, 20);
        let host = mapper.to_host(LineCol::new(3, 5));
        assert_eq!(host.line, 12);
        assert_eq!(host.column, 4);
    }

    #[test]
    fn column_one_maps_to_line_start() {
        let mapper = TemplateMapper::new(4, 17);
        assert_eq!(mapper.to_host(LineCol::new(2, 1)), LineCol::new(5, 0));
    }

    #[test]
    fn total_on_degenerate_input() {
        let mapper = TemplateMapper::new(1, 0);
        // Sentinel positions (line 0, column 0) must not underflow.
        assert_eq!(mapper.to_host(LineCol::new(0, 0)), LineCol::new(1, 0));
    }

    #[test]
    fn location_maps_both_ends() {
        let mapper = TemplateMapper::new(7, 12);
        let loc = mapper.to_host_location(Location::at(2, 3, 2, 9));
        assert_eq!(loc, Location::at(8, 2, 8, 8));
    }
}
