use plint_source::Location;
use serde::Serialize;
use thiserror::Error;

use crate::tokens::Token;
use crate::tokens::TokenKind;

/// A structured tokenization failure, positioned template-locally.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[error("{message} at {line}:{column}")]
pub struct LexError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl LexError {
    fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
            message: message.into(),
        }
    }
}

fn loc(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Location {
    Location::at(
        u32::try_from(start_line).unwrap_or(u32::MAX),
        u32::try_from(start_col).unwrap_or(u32::MAX),
        u32::try_from(end_line).unwrap_or(u32::MAX),
        u32::try_from(end_col).unwrap_or(u32::MAX),
    )
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-')
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$')
}

/// Take a `[A-Za-z_$][A-Za-z0-9_$]*` identifier at byte position `p`.
fn ident_at(line: &str, p: usize) -> Option<(&str, usize)> {
    let bytes = line.as_bytes();
    let first = *bytes.get(p)?;
    if first.is_ascii_digit() || !is_ident_byte(first) {
        return None;
    }
    let mut end = p;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    Some((&line[p..end], end))
}

/// Strip a keyword followed by whitespace (or end of input).
fn keyword<'a>(rest: &'a str, kw: &str) -> Option<&'a str> {
    let after = rest.strip_prefix(kw)?;
    if after.is_empty() || after.starts_with(' ') || after.starts_with('\t') {
        Some(after)
    } else {
        None
    }
}

/// A line-oriented lexer for the Pug subset the analysis engine understands.
///
/// Tokens carry 1-indexed line/column locations relative to the template
/// text. Structural nesting is reported through `indent`/`outdent` tokens:
/// at every transition to a non-blank line exactly one boundary token is
/// emitted at that line, and blank lines produce no tokens at all (the next
/// boundary token's line simply jumps). Any still-open levels at end of
/// input close with `outdent` tokens that share the `eos` location.
pub struct Lexer<'a> {
    lines: Vec<&'a str>,
    tokens: Vec<Token>,
    indent_stack: Vec<usize>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Lexer {
            lines: source.split('\n').collect(),
            tokens: Vec::new(),
            indent_stack: Vec::new(),
        }
    }

    /// Tokenize the whole template, or fail with the first structural error.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut line_idx = 0;
        let mut seen_content = false;

        while line_idx < self.lines.len() {
            let line = self.lines[line_idx];
            if line.trim().is_empty() {
                line_idx += 1;
                continue;
            }
            let indent = self.measure_indent(line_idx)?;
            self.open_line(line_idx, indent, seen_content)?;
            seen_content = true;
            line_idx = self.lex_content(line_idx, indent, indent)?;
        }

        let last_line = self.lines.len().max(1);
        let last_col = self.lines.last().map_or(0, |l| l.len()) + 1;
        let eos_loc = loc(last_line, last_col, last_line, last_col);

        for _ in 0..self.indent_stack.len() {
            self.tokens.push(Token::new(TokenKind::Outdent, eos_loc));
        }
        self.indent_stack.clear();
        self.tokens.push(Token::new(TokenKind::Eos, eos_loc));

        Ok(self.tokens)
    }

    /// Re-lex purely for the error payload; `None` means the template is fine.
    #[must_use]
    pub fn check(source: &str) -> Option<LexError> {
        Lexer::new(source).tokenize().err()
    }

    fn push(&mut self, kind: TokenKind, location: Location) {
        self.tokens.push(Token::new(kind, location));
    }

    fn measure_indent(&self, line_idx: usize) -> Result<usize, LexError> {
        let line = self.lines[line_idx];
        for (i, b) in line.bytes().enumerate() {
            match b {
                b' ' => {}
                b'\t' => {
                    return Err(LexError::new(
                        line_idx + 1,
                        i + 1,
                        "tabs are not allowed in indentation",
                    ));
                }
                _ => return Ok(i),
            }
        }
        Ok(line.len())
    }

    /// Emit the structural token for a new non-blank line.
    fn open_line(
        &mut self,
        line_idx: usize,
        indent: usize,
        seen_content: bool,
    ) -> Result<(), LexError> {
        let ln = line_idx + 1;
        let boundary = loc(ln, 1, ln, indent + 1);

        if !seen_content {
            if indent > 0 {
                self.indent_stack.push(indent);
                self.push(TokenKind::Indent, boundary);
            } else if line_idx > 0 {
                self.push(TokenKind::Newline, boundary);
            }
            return Ok(());
        }

        let top = self.indent_stack.last().copied().unwrap_or(0);
        if indent > top {
            self.indent_stack.push(indent);
            self.push(TokenKind::Indent, boundary);
        } else if indent < top {
            while self.indent_stack.last().copied().unwrap_or(0) > indent {
                self.indent_stack.pop();
                self.push(TokenKind::Outdent, boundary);
            }
            let landed = self.indent_stack.last().copied().unwrap_or(0);
            if landed != indent {
                return Err(LexError::new(
                    ln,
                    indent + 1,
                    format!("inconsistent indentation; expected {landed} spaces"),
                ));
            }
        } else {
            self.push(TokenKind::Newline, boundary);
        }
        Ok(())
    }

    /// Lex the content of one line starting at byte position `pos`.
    ///
    /// Returns the index of the next line to process (attribute blocks,
    /// comment blocks and pipeless text may consume several lines).
    fn lex_content(
        &mut self,
        line_idx: usize,
        indent: usize,
        pos: usize,
    ) -> Result<usize, LexError> {
        let line = self.lines[line_idx];
        let ln = line_idx + 1;
        let rest = &line[pos..];

        if rest.starts_with("//") {
            return self.lex_comment(line_idx, indent, pos);
        }

        if let Some(after) = rest.strip_prefix('|') {
            let text_start = pos + 1 + usize::from(after.starts_with(' '));
            self.lex_inline_text(line_idx, text_start)?;
            return Ok(line_idx + 1);
        }

        if rest.starts_with('-') || rest.starts_with('=') {
            let buffered = rest.starts_with('=');
            let value_start = pos + 1 + leading_spaces(&line[pos + 1..]);
            let value = &line[value_start..];
            self.check_balanced(value, ln, value_start)?;
            self.push(
                TokenKind::Code {
                    value: value.trim_end().to_string(),
                    buffered,
                },
                loc(ln, pos + 1, ln, line.len() + 1),
            );
            return Ok(line_idx + 1);
        }

        if keyword(rest, "each").is_some() || keyword(rest, "for").is_some() {
            return self.lex_each(line_idx, pos);
        }

        if let Some(cond) = keyword(rest, "if").or_else(|| keyword(rest, "unless")) {
            let cond = cond.trim();
            if cond.is_empty() {
                return Err(LexError::new(ln, line.len() + 1, "missing condition"));
            }
            self.check_balanced(cond, ln, line.len() - cond.len())?;
            self.push(
                TokenKind::If {
                    value: cond.to_string(),
                },
                loc(ln, pos + 1, ln, line.len() + 1),
            );
            return Ok(line_idx + 1);
        }

        if let Some(after) = keyword(rest, "else") {
            let trimmed = after.trim_start();
            if let Some(cond) = keyword(trimmed, "if") {
                let cond = cond.trim();
                if cond.is_empty() {
                    return Err(LexError::new(ln, line.len() + 1, "missing condition"));
                }
                self.check_balanced(cond, ln, line.len() - cond.len())?;
                self.push(
                    TokenKind::ElseIf {
                        value: cond.to_string(),
                    },
                    loc(ln, pos + 1, ln, line.len() + 1),
                );
            } else {
                self.push(TokenKind::Else, loc(ln, pos + 1, ln, pos + 5));
            }
            return Ok(line_idx + 1);
        }

        let first = rest.bytes().next().unwrap_or(b' ');
        if is_name_byte(first) || first == b'.' || first == b'#' {
            return self.lex_tag(line_idx, indent, pos);
        }

        // Anything else (`<div>` literal markup and friends) is plain text.
        self.lex_inline_text(line_idx, pos)?;
        Ok(line_idx + 1)
    }

    fn lex_each(&mut self, line_idx: usize, pos: usize) -> Result<usize, LexError> {
        let line = self.lines[line_idx];
        let ln = line_idx + 1;
        let bytes = line.as_bytes();

        // past the keyword ("each" or "for")
        let mut p = pos + if line[pos..].starts_with("each") { 4 } else { 3 };
        p += leading_spaces(&line[p..]);

        let Some((value, next)) = ident_at(line, p) else {
            return Err(LexError::new(ln, p + 1, "missing loop variable"));
        };
        let value = value.to_string();
        p = next + leading_spaces(&line[next..]);

        let mut key = None;
        if bytes.get(p) == Some(&b',') {
            p += 1;
            p += leading_spaces(&line[p..]);
            let Some((k, next)) = ident_at(line, p) else {
                return Err(LexError::new(ln, p + 1, "missing index variable"));
            };
            key = Some(k.to_string());
            p = next + leading_spaces(&line[next..]);
        }

        let Some(after_in) = keyword(&line[p..], "in") else {
            return Err(LexError::new(ln, p + 1, "expected \"in\""));
        };
        p = line.len() - after_in.len();
        p += leading_spaces(&line[p..]);

        let code = line[p..].trim_end();
        if code.is_empty() {
            return Err(LexError::new(ln, p + 1, "missing iterable expression"));
        }
        self.check_balanced(code, ln, p)?;

        self.push(
            TokenKind::Each {
                value,
                key,
                code: code.to_string(),
            },
            loc(ln, pos + 1, ln, line.len() + 1),
        );
        Ok(line_idx + 1)
    }

    fn lex_comment(
        &mut self,
        line_idx: usize,
        indent: usize,
        pos: usize,
    ) -> Result<usize, LexError> {
        let line = self.lines[line_idx];
        let ln = line_idx + 1;
        let buffered = !line[pos..].starts_with("//-");
        let marker = if buffered { 2 } else { 3 };
        let mut value = line[pos + marker..].to_string();

        // Deeper-indented lines belong to the comment block and stay inside
        // this one token, so they never produce structural tokens.
        let mut end_idx = line_idx;
        let mut j = line_idx + 1;
        while j < self.lines.len() {
            let l = self.lines[j];
            if l.trim().is_empty() {
                j += 1;
                continue;
            }
            if leading_spaces(l) > indent {
                end_idx = j;
                j += 1;
            } else {
                break;
            }
        }
        for k in line_idx + 1..=end_idx {
            value.push('\n');
            value.push_str(self.lines[k]);
        }

        let end_col = self.lines[end_idx].len() + 1;
        self.push(
            TokenKind::Comment { value, buffered },
            loc(ln, pos + 1, end_idx + 1, end_col),
        );
        Ok(end_idx + 1)
    }

    fn lex_tag(&mut self, line_idx: usize, indent: usize, pos: usize) -> Result<usize, LexError> {
        let mut li = line_idx;
        let mut p = pos;
        let line = self.lines[li];
        let ln = li + 1;
        let bytes = line.as_bytes();

        if is_name_byte(bytes[p]) && !bytes[p].is_ascii_digit() {
            let start = p;
            while p < bytes.len() && is_name_byte(bytes[p]) {
                p += 1;
            }
            self.push(
                TokenKind::Tag {
                    name: line[start..p].to_string(),
                },
                loc(ln, start + 1, ln, p + 1),
            );
        }

        loop {
            match (bytes.get(p), bytes.get(p + 1)) {
                (Some(b'.'), Some(&next)) if is_name_byte(next) => {
                    let start = p;
                    p += 1;
                    while p < bytes.len() && is_name_byte(bytes[p]) {
                        p += 1;
                    }
                    self.push(
                        TokenKind::Class {
                            name: line[start + 1..p].to_string(),
                        },
                        loc(ln, start + 1, ln, p + 1),
                    );
                }
                (Some(b'#'), Some(&next)) if is_name_byte(next) => {
                    let start = p;
                    p += 1;
                    while p < bytes.len() && is_name_byte(bytes[p]) {
                        p += 1;
                    }
                    self.push(
                        TokenKind::Id {
                            name: line[start + 1..p].to_string(),
                        },
                        loc(ln, start + 1, ln, p + 1),
                    );
                }
                _ => break,
            }
        }

        if bytes.get(p) == Some(&b'(') {
            let (new_li, new_p) = self.lex_attributes(li, p)?;
            li = new_li;
            p = new_p;
        }

        let line = self.lines[li];
        let ln = li + 1;
        let rest = &line[p.min(line.len())..];

        if rest == "." || (rest.starts_with('.') && rest[1..].trim().is_empty()) {
            return self.lex_pipeless(li, indent);
        }
        if let Some(after) = rest.strip_prefix(':') {
            let sub = p + 1 + leading_spaces(after);
            if sub < line.len() {
                return self.lex_content(li, indent, sub);
            }
            return Ok(li + 1);
        }
        if rest.starts_with('=') || rest.starts_with("!=") {
            let marker = if rest.starts_with("!=") { 2 } else { 1 };
            let value_start = p + marker + leading_spaces(&line[p + marker..]);
            let value = &line[value_start..];
            self.check_balanced(value, ln, value_start)?;
            self.push(
                TokenKind::Code {
                    value: value.trim_end().to_string(),
                    buffered: true,
                },
                loc(ln, p + 1, ln, line.len() + 1),
            );
            return Ok(li + 1);
        }
        if let Some(text) = rest.strip_prefix(' ') {
            if !text.trim().is_empty() {
                self.lex_inline_text(li, p + 1)?;
            }
            return Ok(li + 1);
        }
        if rest.is_empty() {
            return Ok(li + 1);
        }
        Err(LexError::new(
            ln,
            p + 1,
            format!("unexpected character {:?}", rest.chars().next().unwrap_or(' ')),
        ))
    }

    /// Lex a parenthesized attribute block starting at `(`.
    ///
    /// The block may span physical lines; no structural tokens are emitted
    /// for those line breaks (attribute wrapping is not nesting). Returns
    /// the position just past the closing parenthesis.
    fn lex_attributes(
        &mut self,
        start_li: usize,
        open_pos: usize,
    ) -> Result<(usize, usize), LexError> {
        self.push(
            TokenKind::StartAttributes,
            loc(start_li + 1, open_pos + 1, start_li + 1, open_pos + 2),
        );

        let mut li = start_li;
        let mut p = open_pos + 1;
        loop {
            let line = self.lines[li];
            let bytes = line.as_bytes();

            while p < bytes.len() && matches!(bytes[p], b' ' | b'\t' | b',') {
                p += 1;
            }
            if p >= bytes.len() {
                li += 1;
                if li >= self.lines.len() {
                    let last = self.lines.len();
                    let col = self.lines.last().map_or(0, |l| l.len()) + 1;
                    return Err(LexError::new(last, col, "unterminated attribute block"));
                }
                p = 0;
                continue;
            }

            if bytes[p] == b')' {
                self.push(
                    TokenKind::EndAttributes,
                    loc(li + 1, p + 1, li + 1, p + 2),
                );
                return Ok((li, p + 1));
            }

            let name_line = li + 1;
            let name_start = p;
            if line[p..].starts_with("...") {
                p += 3;
            }
            while p < bytes.len() && (is_name_byte(bytes[p]) || matches!(bytes[p], b'$' | b'@' | b':')) {
                p += 1;
            }
            if p == name_start {
                return Err(LexError::new(
                    li + 1,
                    p + 1,
                    format!("unexpected character {:?}", line[p..].chars().next().unwrap_or(' ')),
                ));
            }
            let name = line[name_start..p].to_string();

            let mut value = None;
            if line[p..].starts_with("!=") || line[p..].starts_with('=') {
                let skip = if line[p..].starts_with("!=") { 2 } else { 1 };
                let (text, vli, vp) = self.scan_attribute_value(li, p + skip)?;
                value = Some(text);
                li = vli;
                p = vp;
            }

            self.push(
                TokenKind::Attribute { name, value },
                loc(name_line, name_start + 1, li + 1, p + 1),
            );
        }
    }

    /// Scan a balanced attribute value, possibly across lines, stopping at a
    /// top-level `,`, `)` or whitespace.
    fn scan_attribute_value(
        &self,
        start_li: usize,
        start_p: usize,
    ) -> Result<(String, usize, usize), LexError> {
        let mut value = String::new();
        let mut stack: Vec<u8> = Vec::new();
        let mut string: Option<u8> = None;
        let mut escaped = false;
        let mut li = start_li;
        let mut p = start_p;
        let mut seg = start_p;

        // Delimiters are all ASCII, so the byte scan only ever slices at
        // char boundaries; multi-byte text passes through untouched.
        loop {
            let line = self.lines[li];
            let bytes = line.as_bytes();

            while p < bytes.len() {
                let b = bytes[p];
                if let Some(quote) = string {
                    if escaped {
                        escaped = false;
                    } else if b == b'\\' {
                        escaped = true;
                    } else if b == quote {
                        string = None;
                    }
                    p += 1;
                    continue;
                }
                match b {
                    b'"' | b'\'' | b'`' => string = Some(b),
                    b'(' | b'[' | b'{' => stack.push(b),
                    b')' if stack.is_empty() => {
                        value.push_str(&line[seg..p]);
                        return Ok((value, li, p));
                    }
                    b',' | b' ' | b'\t' if stack.is_empty() => {
                        value.push_str(&line[seg..p]);
                        return Ok((value, li, p));
                    }
                    b')' | b']' | b'}' => {
                        let expected = match b {
                            b')' => b'(',
                            b']' => b'[',
                            _ => b'{',
                        };
                        if stack.pop() != Some(expected) {
                            return Err(LexError::new(
                                li + 1,
                                p + 1,
                                format!("unexpected character {:?}", b as char),
                            ));
                        }
                    }
                    _ => {}
                }
                p += 1;
            }
            value.push_str(&line[seg..]);

            // End of line: single/double-quoted strings must not span lines,
            // open brackets and template strings continue on the next one.
            if matches!(string, Some(b'"' | b'\'')) {
                return Err(LexError::new(li + 1, line.len() + 1, "unterminated string"));
            }
            if stack.is_empty() && string.is_none() {
                return Ok((value, li, p));
            }
            li += 1;
            if li >= self.lines.len() {
                let last = self.lines.len();
                let col = self.lines.last().map_or(0, |l| l.len()) + 1;
                return Err(LexError::new(last, col, "unterminated attribute block"));
            }
            value.push('\n');
            p = 0;
            seg = 0;
        }
    }

    /// Lex a pipeless text block owned by a trailing-dot tag.
    ///
    /// Interior lines become `text`/`newline` pairs bracketed by
    /// `start-pipeless-text`/`end-pipeless-text`; no `indent`/`outdent`
    /// tokens are emitted inside the block.
    fn lex_pipeless(&mut self, owner_idx: usize, owner_indent: usize) -> Result<usize, LexError> {
        let mut last_content = None;
        let mut j = owner_idx + 1;
        while j < self.lines.len() {
            let l = self.lines[j];
            if l.trim().is_empty() {
                j += 1;
                continue;
            }
            if leading_spaces(l) > owner_indent {
                last_content = Some(j);
                j += 1;
            } else {
                break;
            }
        }
        let Some(end_idx) = last_content else {
            return Ok(owner_idx + 1);
        };

        let first_idx = (owner_idx + 1..=end_idx)
            .find(|i| !self.lines[*i].trim().is_empty())
            .unwrap_or(end_idx);
        let base = leading_spaces(self.lines[first_idx]);

        self.push(
            TokenKind::StartPipelessText,
            loc(first_idx + 1, 1, first_idx + 1, base + 1),
        );
        for (n, idx) in (owner_idx + 1..=end_idx).enumerate() {
            let line = self.lines[idx];
            let ln = idx + 1;
            if n > 0 {
                self.push(TokenKind::Newline, loc(ln, 1, ln, base + 1));
            }
            // A shallower interior line may put `base` mid-character.
            let mut cut = base.min(line.len());
            while !line.is_char_boundary(cut) {
                cut -= 1;
            }
            self.push(
                TokenKind::Text {
                    value: line[cut..].to_string(),
                },
                loc(ln, cut + 1, ln, line.len() + 1),
            );
        }
        let end_col = self.lines[end_idx].len() + 1;
        self.push(
            TokenKind::EndPipelessText,
            loc(end_idx + 1, end_col, end_idx + 1, end_col),
        );
        Ok(end_idx + 1)
    }

    /// Lex trailing/piped text, splitting `#{expr}` and `!{expr}`
    /// interpolations out of the plain segments.
    fn lex_inline_text(&mut self, line_idx: usize, start: usize) -> Result<(), LexError> {
        let line = self.lines[line_idx];
        let ln = line_idx + 1;
        let mut seg_start = start;
        let mut i = start;
        let mut pushed = false;

        while i < line.len() {
            let rest = &line[i..];
            if rest.starts_with("#{") || rest.starts_with("!{") {
                if i > seg_start {
                    self.push(
                        TokenKind::Text {
                            value: line[seg_start..i].to_string(),
                        },
                        loc(ln, seg_start + 1, ln, i + 1),
                    );
                    pushed = true;
                }
                let close = self.find_interpolation_end(line, i + 2).ok_or_else(|| {
                    LexError::new(ln, i + 1, "unterminated interpolation")
                })?;
                self.push(
                    TokenKind::InterpolatedCode {
                        value: line[i + 2..close].to_string(),
                        must_escape: rest.starts_with('#'),
                    },
                    loc(ln, i + 1, ln, close + 2),
                );
                pushed = true;
                i = close + 1;
                seg_start = i;
            } else {
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }

        if seg_start < line.len() || !pushed {
            self.push(
                TokenKind::Text {
                    value: line[seg_start..].to_string(),
                },
                loc(ln, seg_start + 1, ln, line.len() + 1),
            );
        }
        Ok(())
    }

    /// Find the `}` closing an interpolation opened just before `from`.
    fn find_interpolation_end(&self, line: &str, from: usize) -> Option<usize> {
        let bytes = line.as_bytes();
        let mut depth = 1usize;
        let mut string: Option<u8> = None;
        let mut escaped = false;
        let mut i = from;
        while i < bytes.len() {
            let b = bytes[i];
            if let Some(quote) = string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == quote {
                    string = None;
                }
            } else {
                match b {
                    b'"' | b'\'' | b'`' => string = Some(b),
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i);
                        }
                    }
                    _ => {}
                }
            }
            i += 1;
        }
        None
    }

    /// Reject embedded code fragments with unbalanced brackets or
    /// unterminated strings; `base` is the fragment's byte offset in its
    /// line so error columns land on the offending character.
    fn check_balanced(&self, text: &str, line: usize, base: usize) -> Result<(), LexError> {
        let mut stack: Vec<u8> = Vec::new();
        let mut string: Option<u8> = None;
        let mut escaped = false;

        for (i, b) in text.bytes().enumerate() {
            if let Some(quote) = string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == quote {
                    string = None;
                }
                continue;
            }
            match b {
                b'"' | b'\'' | b'`' => string = Some(b),
                b'(' | b'[' | b'{' => stack.push(b),
                b')' | b']' | b'}' => {
                    let expected = match b {
                        b')' => b'(',
                        b']' => b'[',
                        _ => b'{',
                    };
                    if stack.pop() != Some(expected) {
                        return Err(LexError::new(
                            line,
                            base + i + 1,
                            format!("unexpected character {:?}", b as char),
                        ));
                    }
                }
                _ => {}
            }
        }
        if string.is_some() {
            return Err(LexError::new(line, base + text.len() + 1, "unterminated string"));
        }
        if let Some(open) = stack.pop() {
            return Err(LexError::new(
                line,
                base + text.len() + 1,
                format!("missing closing bracket for {:?}", open as char),
            ));
        }
        Ok(())
    }
}
