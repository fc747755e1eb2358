use plint_pug::TokenKind;
use plint_pug::TokenStream;

/// Index of the `outdent` closing the scope opened by the token at
/// `start_index`: the first later outdent whose end column returns to at or
/// above the start token's own column. `None` means the scope runs to the
/// end of the stream, which callers treat as a valid scope, not an error.
#[must_use]
pub fn matching_outdent(stream: &TokenStream, start_index: usize) -> Option<usize> {
    let start = stream.at(isize::try_from(start_index).ok()?);
    let column = start.loc.start.column;
    stream.position_from(start_index + 1, |t| {
        t.kind == TokenKind::Outdent && t.loc.end.column <= column
    })
}

/// The physical lines strictly between `start_line` and `end_line`
/// (template-local, 1-indexed), with one empty line prepended so that a
/// recursive tokenization of the slice reports lines offset from the outer
/// template by the constant `start_line - 1`.
#[must_use]
pub fn slice_body(text: &str, start_line: u32, end_line: u32) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let from = start_line as usize;
    let to = (end_line as usize).saturating_sub(1).min(lines.len());
    let mut body = String::new();
    if from >= to {
        return body;
    }
    for line in &lines[from..to] {
        body.push('\n');
        body.push_str(line);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_dedent_closing_an_each() {
        let text = "\ndiv\n  each item in list\n    span\n  div\n";
        let stream = TokenStream::from_source(text);
        let start = stream
            .position_from(0, |t| matches!(t.kind, TokenKind::Each { .. }))
            .unwrap();
        let end = matching_outdent(&stream, start).unwrap();
        assert_eq!(stream.at(isize::try_from(end).unwrap()).loc.start.line, 5);
    }

    #[test]
    fn scope_to_end_of_stream_is_none_for_missing_deeper_dedent() {
        // The only outdents close levels above the each's own column.
        let text = "each item in list";
        let stream = TokenStream::from_source(text);
        assert_eq!(matching_outdent(&stream, 0), None);
    }

    #[test]
    fn sliced_body_keeps_outer_line_numbers_offset_by_a_constant() {
        let text = "\ndiv\n  each item in list\n    span\n    b\n  div\n";
        let body = slice_body(text, 3, 6);
        assert_eq!(body, "\n    span\n    b");
        // Re-tokenized, line 2 of the slice is line 4 of the template.
        let stream = TokenStream::from_source(&body);
        let first_tag = stream.find(|t| matches!(t.kind, TokenKind::Tag { .. }));
        assert_eq!(first_tag.loc.start.line + 3 - 1, 4);
    }

    #[test]
    fn empty_range_slices_to_nothing() {
        assert_eq!(slice_body("a\nb\nc", 2, 3), "");
    }
}
