use itertools::Itertools;
use plint_pug::TokenKind;
use plint_pug::TokenStream;
use plint_source::Location;
use tracing::trace;

/// Parameters the indentation predicate needs.
///
/// `base_indent` is the host column of the first token on the literal's
/// opening line; standalone files use `-(step)` so top-level content at
/// column 0 conforms. Expected widths clamp at 0.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    pub base_indent: i32,
    pub indent_step: u32,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            base_indent: 0,
            indent_step: 2,
        }
    }
}

/// A structural observation, still template-local. Rules decide which
/// findings become diagnostics and translate the coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// The template's first physical line has content.
    LeadingLineNotBlank,
    /// The template's last physical line has content.
    TrailingLineNotBlank,
    /// `line` and `line + 1` are both blank.
    DoubleBlank { line: u32 },
    /// A dedent with no blank line before it (final dedents at end of
    /// stream are exempt).
    MissingBlankBeforeOutdent { loc: Location },
    /// A sibling in a group of three or more with no blank line before it.
    MissingBlankBetweenSiblings { loc: Location },
    /// Indentation width off the `base + depth * step` grid.
    WrongIndent { line: u32, expected: u32, actual: u32 },
}

struct GroupEntry {
    loc: Location,
    prev_end_line: u32,
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// A stream with no structural content: tag heads and their attribute
/// blocks only. Attribute wrapping is not nesting, so such templates are
/// exempt from every structural check however many lines they span.
fn is_attribute_only(stream: &TokenStream) -> bool {
    stream.iter().all(|t| {
        matches!(
            t.kind,
            TokenKind::Tag { .. }
                | TokenKind::Class { .. }
                | TokenKind::Id { .. }
                | TokenKind::StartAttributes
                | TokenKind::Attribute { .. }
                | TokenKind::EndAttributes
                | TokenKind::Eos
        )
    })
}

/// One left-to-right pass evaluating every structural predicate.
///
/// Stateless between calls: walking the same stream twice yields identical
/// findings.
#[must_use]
pub fn walk(text: &str, stream: &TokenStream, options: &WalkOptions) -> Vec<Finding> {
    let mut findings = Vec::new();
    if stream.is_empty() || is_attribute_only(stream) {
        return findings;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    if lines.first().is_some_and(|l| !is_blank(l)) {
        findings.push(Finding::LeadingLineNotBlank);
    }
    if lines.last().is_some_and(|l| !is_blank(l)) {
        findings.push(Finding::TrailingLineNotBlank);
    }
    for (index, (a, b)) in lines.iter().tuple_windows().enumerate() {
        if is_blank(a) && is_blank(b) {
            findings.push(Finding::DoubleBlank {
                line: u32::try_from(index + 1).unwrap_or(u32::MAX),
            });
        }
    }

    let eos_loc = stream.find(|t| t.kind == TokenKind::Eos).loc;
    let mut depth: i32 = 0;
    let mut group: Vec<GroupEntry> = Vec::new();

    for (index, token) in stream.iter().enumerate() {
        let i = isize::try_from(index).unwrap_or(isize::MAX);
        let prev = stream.at(i - 1);
        let before_prev = stream.at(i - 2);
        let next = stream.at(i + 1);

        // The top-level token counts as the first indent for width checks.
        if token.kind == TokenKind::Indent || index == 0 {
            depth += 1;
            let actual = token.loc.end.column.saturating_sub(1);
            let expected = (options.base_indent
                + depth * i32::try_from(options.indent_step).unwrap_or(i32::MAX))
            .max(0);
            if i64::from(actual) != i64::from(expected) {
                findings.push(Finding::WrongIndent {
                    line: token.loc.start.line,
                    expected: u32::try_from(expected).unwrap_or(u32::MAX),
                    actual,
                });
            }
        } else if token.kind == TokenKind::Outdent {
            depth -= 1;
        }

        if token.kind == TokenKind::Outdent
            && token.loc != eos_loc
            && token.loc.start.line.saturating_sub(prev.loc.end.line) == 1
        {
            findings.push(Finding::MissingBlankBeforeOutdent { loc: token.loc });
        }

        // Newlines between a text line and its continuation, and the one
        // closing a pipeless block, are not new siblings.
        if token.is_newline()
            && !next.is_text()
            && !(prev.is_text() && before_prev.is_newline())
            && prev.kind != TokenKind::EndPipelessText
        {
            group.push(GroupEntry {
                loc: token.loc,
                prev_end_line: prev.loc.end.line,
            });
        }

        let flush = matches!(token.kind, TokenKind::Indent | TokenKind::Outdent)
            || (token.is_newline() && prev.kind == TokenKind::EndPipelessText);
        if flush {
            if group.len() >= 2 {
                for entry in &group {
                    if entry.loc.start.line.saturating_sub(entry.prev_end_line) == 1 {
                        findings.push(Finding::MissingBlankBetweenSiblings { loc: entry.loc });
                    }
                }
            }
            group.clear();
        }
    }

    trace!(count = findings.len(), "structural walk complete");
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_default(text: &str) -> Vec<Finding> {
        let stream = TokenStream::from_source(text);
        walk(text, &stream, &WalkOptions::default())
    }

    fn options(base_indent: i32, indent_step: u32) -> WalkOptions {
        WalkOptions {
            base_indent,
            indent_step,
        }
    }

    #[test]
    fn walking_twice_is_idempotent() {
        let text = "\ndiv\n  span\ndiv\n";
        let stream = TokenStream::from_source(text);
        let opts = WalkOptions::default();
        assert_eq!(walk(text, &stream, &opts), walk(text, &stream, &opts));
    }

    #[test]
    fn reports_nonblank_boundaries() {
        let findings = walk_default("div\n  span\ndiv");
        assert!(findings.contains(&Finding::LeadingLineNotBlank));
        assert!(findings.contains(&Finding::TrailingLineNotBlank));
    }

    #[test]
    fn blank_boundaries_are_fine() {
        let findings = walk_default("\ndiv\n");
        assert!(!findings.contains(&Finding::LeadingLineNotBlank));
        assert!(!findings.contains(&Finding::TrailingLineNotBlank));
    }

    #[test]
    fn caps_blank_runs_at_one_line() {
        let findings = walk_default("\ndiv\n\n\ndiv\n");
        let doubles: Vec<_> = findings
            .iter()
            .filter(|f| matches!(f, Finding::DoubleBlank { .. }))
            .collect();
        assert_eq!(doubles, [&Finding::DoubleBlank { line: 3 }]);
    }

    #[test]
    fn dedent_without_blank_line_fires() {
        let findings = walk_default("\ndiv\n  span\ndiv\n");
        let outdents: Vec<_> = findings
            .iter()
            .filter(|f| matches!(f, Finding::MissingBlankBeforeOutdent { .. }))
            .collect();
        assert_eq!(outdents.len(), 1);
        let Finding::MissingBlankBeforeOutdent { loc } = outdents[0] else {
            unreachable!()
        };
        assert_eq!(loc.start.line, 4);
    }

    #[test]
    fn final_dedent_at_end_of_stream_is_exempt() {
        let findings = walk_default("\ndiv\n  span\n");
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::MissingBlankBeforeOutdent { .. })));
    }

    #[test]
    fn three_tight_siblings_report_both_boundaries() {
        let findings = walk_default("\ndiv\n  a\n  b\n  c\n");
        let siblings: Vec<_> = findings
            .iter()
            .filter_map(|f| match f {
                Finding::MissingBlankBetweenSiblings { loc } => Some(loc.start.line),
                _ => None,
            })
            .collect();
        assert_eq!(siblings, [4, 5]);
    }

    #[test]
    fn one_blank_line_removes_exactly_that_boundary() {
        let findings = walk_default("\ndiv\n  a\n  b\n\n  c\n");
        let siblings: Vec<_> = findings
            .iter()
            .filter_map(|f| match f {
                Finding::MissingBlankBetweenSiblings { loc } => Some(loc.start.line),
                _ => None,
            })
            .collect();
        assert_eq!(siblings, [4]);
    }

    #[test]
    fn two_siblings_do_not_require_blank_lines() {
        let findings = walk_default("\ndiv\n  a\n  b\n");
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::MissingBlankBetweenSiblings { .. })));
    }

    #[test]
    fn conforming_indentation_is_silent() {
        let text = "\ndiv\n  span\n    b\n";
        let stream = TokenStream::from_source(text);
        let findings = walk(text, &stream, &options(-2, 2));
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::WrongIndent { .. })));
    }

    #[test]
    fn one_space_off_cites_expected_and_actual() {
        let text = "\ndiv\n   span\n";
        let stream = TokenStream::from_source(text);
        let findings = walk(text, &stream, &options(-2, 2));
        let wrong: Vec<_> = findings
            .iter()
            .filter(|f| matches!(f, Finding::WrongIndent { .. }))
            .collect();
        assert_eq!(
            wrong,
            [&Finding::WrongIndent {
                line: 3,
                expected: 2,
                actual: 3,
            }]
        );
    }

    #[test]
    fn host_base_indent_shifts_expected_widths() {
        // Literal opening line starts at host column 8, content indented 10.
        let text = "\n          div\n";
        let stream = TokenStream::from_source(text);
        let findings = walk(text, &stream, &options(8, 2));
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::WrongIndent { .. })));
    }

    #[test]
    fn attribute_only_streams_have_no_findings() {
        assert!(walk_default("input(\n  type=\"text\"\n)").is_empty());
    }

    #[test]
    fn empty_streams_have_no_findings() {
        assert!(walk_default("each x in ]").is_empty());
    }

    #[test]
    fn pipeless_interior_lines_are_one_unit() {
        let findings = walk_default("\ndiv\n  script.\n    a();\n    b();\n    c();\n");
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::MissingBlankBetweenSiblings { .. })));
    }
}
