//! Structural directives: loops, includes, components and layouts.
//!
//! Loop expansion is purely textual and lives here. Include and layout
//! expansion need the component loader and recurse back into the pipeline, so
//! this module only locates those directives; [`crate::pipeline`] splices them.

use std::ops::Range;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::warn;

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;

fn loop_open_regex() -> &'static Regex {
    static LOOP_OPEN: OnceLock<Regex> = OnceLock::new();
    LOOP_OPEN.get_or_init(|| {
        Regex::new(r"\{\{\s*loop\s+([^}]*?)\s*\}\}").expect("loop opener pattern is valid")
    })
}

fn loop_token_regex() -> &'static Regex {
    static LOOP_TOKEN: OnceLock<Regex> = OnceLock::new();
    LOOP_TOKEN.get_or_init(|| {
        Regex::new(r"\{\{\s*(?:(loop)\s+[^}]*?|/loop)\s*\}\}").expect("loop token pattern is valid")
    })
}

fn index_regex() -> &'static Regex {
    static INDEX: OnceLock<Regex> = OnceLock::new();
    INDEX.get_or_init(|| Regex::new(r"\{\{\s*_index(1)?\s*\}\}").expect("index pattern is valid"))
}

fn indexed_key_regex() -> &'static Regex {
    static INDEXED_KEY: OnceLock<Regex> = OnceLock::new();
    INDEXED_KEY.get_or_init(|| {
        Regex::new(r"\{\{\s*([^,{}+]+?)\+\s*,").expect("indexed key pattern is valid")
    })
}

fn include_regex() -> &'static Regex {
    static INCLUDE: OnceLock<Regex> = OnceLock::new();
    INCLUDE.get_or_init(|| {
        Regex::new(r#"\{\{\s*(?:include|component)\s+(?:"([^"]*)"|'([^']*)')\s*\}\}"#)
            .expect("include pattern is valid")
    })
}

fn layout_regex() -> &'static Regex {
    static LAYOUT: OnceLock<Regex> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Regex::new(
            r#"(?s)\{\{\s*layout\s+(?:"([^"]*)"|'([^']*)')\s*\}\}(.*?)\{\{\s*/layout\s*\}\}"#,
        )
        .expect("layout pattern is valid")
    })
}

fn content_regex() -> &'static Regex {
    static CONTENT: OnceLock<Regex> = OnceLock::new();
    CONTENT.get_or_init(|| Regex::new(r"\{\{\s*content\s*\}\}").expect("content pattern is valid"))
}

fn quoted_name(captures: &Captures<'_>) -> String {
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// An `{{include 'name'}}` or `{{component "name"}}` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IncludeDirective {
    pub span: Range<usize>,
    pub name: String,
}

/// A `{{layout 'name'}}…{{/layout}}` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LayoutBlock {
    pub span: Range<usize>,
    pub name: String,
    pub body: Range<usize>,
}

/// Include and component directives in document order.
pub(crate) fn find_includes(text: &str) -> Vec<IncludeDirective> {
    include_regex()
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            Some(IncludeDirective {
                span: whole.range(),
                name: quoted_name(&captures),
            })
        })
        .collect()
}

/// Layout blocks in document order. Each block ends at the first `{{/layout}}`
/// after its opener.
pub(crate) fn find_layouts(text: &str) -> Vec<LayoutBlock> {
    layout_regex()
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let body = captures.get(3)?;
            Some(LayoutBlock {
                span: whole.range(),
                name: quoted_name(&captures),
                body: body.range(),
            })
        })
        .collect()
}

/// Places `body` wherever the layout says `{{content}}`.
pub(crate) fn substitute_content(layout: &str, body: &str) -> String {
    content_regex()
        .replace_all(layout, regex::NoExpand(body))
        .into_owned()
}

/// Marker left in place of a directive nested past the include depth limit.
pub(crate) fn depth_limit_marker(limit: usize, name: &str) -> String {
    format!("<!-- include depth limit ({limit}) exceeded at '{name}' -->")
}

/// Marker left in place of a component that already encloses itself.
pub(crate) fn include_cycle_marker(name: &str) -> String {
    format!("<!-- include cycle detected at '{name}' -->")
}

/// Marker left in place of a directive once a run has used up its expansions.
pub(crate) fn expansion_budget_marker(budget: usize, name: &str) -> String {
    format!("<!-- include expansion budget ({budget}) exhausted at '{name}' -->")
}

/// Expands every well-formed loop block in `text`.
///
/// Loop bodies are expanded before their enclosing loop is unrolled, so
/// nested loops multiply and each `{{_index}}` belongs to its innermost loop.
/// Blocks with a count that is not a positive integer no larger than
/// `max_iterations`, and openers without a matching `{{/loop}}`, are left as
/// written.
pub(crate) fn expand_loops(text: &str, max_iterations: usize) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(opener) = loop_open_regex().captures(rest) {
        let (Some(whole), Some(argument)) = (opener.get(0), opener.get(1)) else {
            break;
        };
        output.push_str(&rest[..whole.start()]);

        let after_opener = &rest[whole.end()..];
        let Some(closer) = find_matching_close(after_opener) else {
            warn!("Loop directive '{}' has no matching {{{{/loop}}}}", whole.as_str());
            output.push_str(whole.as_str());
            rest = after_opener;
            continue;
        };

        let count = match parse_count(argument.as_str(), max_iterations) {
            Some(count) => count,
            None => {
                warn!(
                    "Invalid loop count '{}' (must be 1..={}), leaving loop unexpanded",
                    argument.as_str(),
                    max_iterations
                );
                output.push_str(whole.as_str());
                rest = after_opener;
                continue;
            }
        };

        let body = expand_loops(&after_opener[..closer.start], max_iterations);
        for index in 0..count {
            output.push_str(&unroll(&body, index));
        }
        rest = &after_opener[closer.end..];
    }

    output.push_str(rest);
    output
}

fn parse_count(argument: &str, max_iterations: usize) -> Option<usize> {
    let count: usize = argument.trim().parse().ok()?;
    (1..=max_iterations).contains(&count).then_some(count)
}

/// Span of the `{{/loop}}` closing a loop whose opener ends just before `text`.
fn find_matching_close(text: &str) -> Option<Range<usize>> {
    let mut depth = 1usize;
    for token in loop_token_regex().captures_iter(text) {
        let whole = token.get(0)?;
        if token.get(1).is_some() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(whole.range());
            }
        }
    }
    None
}

/// One iteration of a loop body.
fn unroll(body: &str, index: usize) -> String {
    let position = index + 1;
    let indexed = index_regex().replace_all(body, |captures: &Captures<'_>| {
        if captures.get(1).is_some() {
            position.to_string()
        } else {
            index.to_string()
        }
    });
    indexed_key_regex()
        .replace_all(&indexed, |captures: &Captures<'_>| {
            format!("{{{{{}_{},", captures[1].trim(), position)
        })
        .into_owned()
}
