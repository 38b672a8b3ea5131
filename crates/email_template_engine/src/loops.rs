//! Line ranges covered by `{{loop N}}` blocks.
//!
//! Both the validator and the engine converter work line by line over the raw
//! template and need to know whether a line sits inside a loop, and how many
//! times that loop repeats.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[cfg(test)]
#[path = "loops_tests.rs"]
mod tests;

/// A `{{loop N}}`…`{{/loop}}` block located by line.
///
/// Lines are 1-based and inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopRange {
    pub start_line: usize,
    pub end_line: usize,
    pub iteration_count: usize,
}

impl LoopRange {
    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

fn loop_token_regex() -> &'static Regex {
    static LOOP_TOKEN: OnceLock<Regex> = OnceLock::new();
    LOOP_TOKEN.get_or_init(|| {
        Regex::new(r"\{\{\s*(?:loop\s+(\d+)|(/loop))\s*\}\}").expect("loop token pattern is valid")
    })
}

/// Finds every closed numeric loop in `content`.
///
/// Openers and closers are paired with a stack in document order, so nested
/// loops and loops that open and close on the same line both produce a range.
/// Ranges are returned in opening order; an opener without a closer produces
/// nothing.
pub fn find_loop_ranges(content: &str) -> Vec<LoopRange> {
    // (opening order, start line, count)
    let mut open: Vec<(usize, usize, usize)> = Vec::new();
    let mut closed: Vec<(usize, LoopRange)> = Vec::new();
    let mut opened = 0;

    for (index, line) in content.split('\n').enumerate() {
        let line_number = index + 1;

        for captures in loop_token_regex().captures_iter(line) {
            if let Some(count) = captures.get(1) {
                // Digits that overflow usize still open a block.
                let count = count.as_str().parse().unwrap_or(usize::MAX);
                open.push((opened, line_number, count));
                opened += 1;
            } else if captures.get(2).is_some() {
                if let Some((order, start_line, iteration_count)) = open.pop() {
                    closed.push((
                        order,
                        LoopRange {
                            start_line,
                            end_line: line_number,
                            iteration_count,
                        },
                    ));
                }
            }
        }
    }

    closed.sort_by_key(|(order, _)| *order);
    closed.into_iter().map(|(_, range)| range).collect()
}

/// Returns the range deciding the iteration count for `line`.
///
/// When several ranges cover the line, the first one in opening order wins,
/// which is the outermost loop.
pub fn range_for_line(ranges: &[LoopRange], line: usize) -> Option<&LoopRange> {
    ranges.iter().find(|range| range.contains(line))
}
