//! Print directive resolution.
//!
//! Replaces `{{key}}`, `{{key, 'literal'}}`, `{{key, data_key}}` and the
//! deprecated `{{key|method}}` with text from the [`VariableResolver`].
//! Everything else in the document, including structural directives that were
//! left unexpanded, is copied through unchanged.

use tracing::warn;

use crate::errors::Error;
use crate::scanner::{find_top_level_comma, segments, strip_quotes, Segment};
use crate::variables::VariableResolver;

#[cfg(test)]
#[path = "print_tests.rs"]
mod tests;

const STRUCTURAL_KEYWORDS: &[&str] = &["loop", "layout", "include", "component"];
const STRUCTURAL_TOKENS: &[&str] = &["content", "_index", "_index1"];

/// Whether a directive body belongs to the structural grammar rather than
/// printing a value.
pub(crate) fn is_structural(body: &str) -> bool {
    let body = body.trim();
    if STRUCTURAL_TOKENS.contains(&body) || body.starts_with("/loop") || body.starts_with("/layout")
    {
        return true;
    }

    match body.split_once(char::is_whitespace) {
        Some((keyword, rest)) => STRUCTURAL_KEYWORDS.contains(&keyword) && !rest.trim().is_empty(),
        None => false,
    }
}

/// Resolves print directives against a [`VariableResolver`].
#[derive(Debug, Clone, Copy)]
pub struct PrintResolver<'a> {
    variables: &'a VariableResolver,
}

impl<'a> PrintResolver<'a> {
    pub fn new(variables: &'a VariableResolver) -> Self {
        Self { variables }
    }

    /// Returns `text` with every print directive replaced by its value.
    ///
    /// This never fails. A generator error is logged and the directive is
    /// kept verbatim.
    pub fn resolve(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());

        for segment in segments(text) {
            match segment {
                Segment::Text(literal) => output.push_str(literal),
                Segment::Directive { raw, body } => {
                    if is_structural(body) {
                        output.push_str(raw);
                        continue;
                    }

                    match self.resolve_body(body.trim()) {
                        Ok(value) => output.push_str(&value),
                        Err(e) => {
                            warn!("Error processing directive {}: {}", raw, e);
                            output.push_str(raw);
                        }
                    }
                }
            }
        }

        output
    }

    fn resolve_body(&self, body: &str) -> Result<String, Error> {
        if let Some(comma) = find_top_level_comma(body) {
            // The text before the comma only labels the value.
            let clause = body[comma + 1..].trim();
            if let Some(literal) = strip_quotes(clause) {
                return Ok(literal.to_string());
            }
            return self.variables.resolve(clause);
        }

        // Deprecated `key|method`: the method is never invoked.
        if let Some((key, _method)) = body.split_once('|') {
            return self.variables.resolve(key.trim());
        }

        self.variables.resolve(body)
    }
}
