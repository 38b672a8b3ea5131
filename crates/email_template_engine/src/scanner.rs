//! Brace-aware directive scanning.
//!
//! The render path needs to find the exact extent of every `{{ ... }}`
//! directive, even when the directive body contains quoted literals or nested
//! braces such as `{{price, '{"min": 1}'}}`. The helpers in this module do that
//! scanning; the validator intentionally uses a coarser regex instead.

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;

/// Returns the byte offset of the `}}` that closes the directive opened at
/// `start`, i.e. the position of the `}` that is immediately followed by the
/// final `}`.
///
/// `start` must point at the first `{` of an opening `{{`. Braces inside
/// quoted strings are ignored and nested `{`/`}` pairs are balanced before a
/// closing `}}` is accepted. Returns `None` when the directive never closes.
pub fn find_directive_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    let mut i = start + 2;
    while i + 1 < bytes.len() {
        let current = bytes[i];
        let escaped = i > 0 && bytes[i - 1] == b'\\';

        match quote {
            Some(q) => {
                if current == q && !escaped {
                    quote = None;
                }
            }
            None => match current {
                b'"' | b'\'' if !escaped => quote = Some(current),
                b'{' => depth += 1,
                b'}' if depth > 0 => depth -= 1,
                b'}' if bytes[i + 1] == b'}' => return Some(i),
                _ => {}
            },
        }

        i += 1;
    }

    None
}

/// Returns the byte offset of the first comma in `body` that is not nested in
/// brackets, braces, parentheses or a quoted string.
pub fn find_top_level_comma(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, &current) in bytes.iter().enumerate() {
        let escaped = i > 0 && bytes[i - 1] == b'\\';
        match quote {
            Some(q) => {
                if current == q && !escaped {
                    quote = None;
                }
            }
            None => match current {
                b'"' | b'\'' if !escaped => quote = Some(current),
                b'{' | b'[' | b'(' => depth += 1,
                b'}' | b']' | b')' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => return Some(i),
                _ => {}
            },
        }
    }

    None
}

/// Strips one pair of matching single or double quotes from `value`.
///
/// Returns `None` when `value` is not wrapped in matching quotes.
pub fn strip_quotes(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if (first == b'"' || first == b'\'') && first == last {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

/// A piece of template text produced by [`segments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text between directives, or an unterminated directive tail.
    Text(&'a str),

    /// A complete `{{ ... }}` directive.
    Directive {
        /// The directive including its braces.
        raw: &'a str,
        /// The text between the braces, untrimmed.
        body: &'a str,
    },
}

/// Splits `text` into literal text and directives.
///
/// An opening `{{` that never closes is returned, together with everything
/// after it, as a single [`Segment::Text`].
pub fn segments(text: &str) -> Segments<'_> {
    Segments { text, pos: 0 }
}

/// Iterator returned by [`segments`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.pos..];
        let Some(offset) = rest.find("{{") else {
            self.pos = self.text.len();
            return Some(Segment::Text(rest));
        };

        if offset > 0 {
            self.pos += offset;
            return Some(Segment::Text(&rest[..offset]));
        }

        let start = self.pos;
        match find_directive_end(self.text, start) {
            Some(end) => {
                self.pos = end + 2;
                Some(Segment::Directive {
                    raw: &self.text[start..end + 2],
                    body: &self.text[start + 2..end],
                })
            }
            None => {
                self.pos = self.text.len();
                Some(Segment::Text(rest))
            }
        }
    }
}
