//! Template Parsing
//!
//! A template is free text with `{token}` placeholders. A token is the
//! shortest non-empty run after a `{` up to the next `}` on the same line;
//! braces do not nest. Token text is taken verbatim, without trimming.

use std::ops::Range;

/// Characters a token body may not span.
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// One `{token}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch<'a> {
    /// Byte range of the whole placeholder, braces included
    pub range: Range<usize>,
    /// Text between the braces
    pub body: &'a str,
}

/// Left-to-right, non-overlapping placeholder matches.
///
/// A clone resumes from the position it was taken at.
#[derive(Debug, Clone)]
pub struct TokenMatches<'a> {
    template: &'a str,
    pos: usize,
}

impl<'a> Iterator for TokenMatches<'a> {
    type Item = TokenMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.template.len() {
            let open = self.pos + self.template[self.pos..].find('{')?;
            let body_start = open + 1;

            if let Some(end) = token_end(&self.template[body_start..]) {
                let close = body_start + end;
                self.pos = close + 1;
                return Some(TokenMatch {
                    range: open..close + 1,
                    body: &self.template[body_start..close],
                });
            }

            // No token can start at this brace; try the next one
            self.pos = body_start;
        }
        None
    }
}

/// Byte offset of the closing `}` for a body starting at `rest[0]`.
fn token_end(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;
    if is_line_terminator(first) {
        return None;
    }
    for (idx, c) in chars {
        if c == '}' {
            return Some(idx);
        }
        if is_line_terminator(c) {
            return None;
        }
    }
    None
}

/// All placeholder occurrences in `template`.
pub fn token_matches(template: &str) -> TokenMatches<'_> {
    TokenMatches { template, pos: 0 }
}

/// Token bodies in template order, duplicates included.
///
/// The iterator is lazy and `Clone`, so a caller can restart from any point
/// by cloning before consuming.
pub fn parse_tokens(template: &str) -> impl Iterator<Item = &str> + Clone {
    token_matches(template).map(|m| m.body)
}

/// Replace every placeholder with `replacement(body)`, keeping all literal
/// text untouched.
pub fn render<'a, F, R>(template: &'a str, mut replacement: F) -> String
where
    F: FnMut(&'a str) -> R,
    R: AsRef<str>,
{
    let mut output = String::with_capacity(template.len());
    let mut last = 0;
    for token in token_matches(template) {
        output.push_str(&template[last..token.range.start]);
        output.push_str(replacement(token.body).as_ref());
        last = token.range.end;
    }
    output.push_str(&template[last..]);
    output
}

/// What a token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRef<'a> {
    /// A field of the current record
    Simple(&'a str),
    /// `local_field.model_alias.remote_field`: follow a link field to a
    /// related record and read one of its fields
    Linked {
        local_field: &'a str,
        model_alias: &'a str,
        remote_field: &'a str,
    },
    /// One or more than two dots
    Malformed,
}

impl<'a> TokenRef<'a> {
    pub fn parse(token: &'a str) -> Self {
        let mut segments = token.split('.');
        match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(field), None, None, None) => TokenRef::Simple(field),
            (Some(local_field), Some(model_alias), Some(remote_field), None) => TokenRef::Linked {
                local_field,
                model_alias,
                remote_field,
            },
            _ => TokenRef::Malformed,
        }
    }
}
