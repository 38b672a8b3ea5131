//! CSS inlining collaborators.
//!
//! Email clients ignore most `<style>` blocks, so a finished render has its
//! stylesheet rules moved onto the elements themselves. The pipeline runs the
//! configured [`CssInliner`] once on the top-level result.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

#[cfg(test)]
#[path = "css_tests.rs"]
mod tests;

/// Rewrites rendered HTML so that styling survives email clients.
pub trait CssInliner: Send + Sync {
    fn inline(&self, html: &str) -> String;
}

/// Leaves markup untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityInliner;

impl CssInliner for IdentityInliner {
    fn inline(&self, html: &str) -> String {
        html.to_string()
    }
}

/// Moves simple `<style>` rules into `style=""` attributes.
///
/// Supported selectors are a bare tag (`p`), a class (`.button`) and an id
/// (`#header`), alone or in comma lists. Declarations are applied in order of
/// specificity (tag, class, id) and any existing inline style is kept last so
/// it still wins. Rules with other selectors, at-rules and every `<script>`
/// block are dropped, and the `<style>` blocks are removed once hoisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleHoistingInliner;

impl CssInliner for StyleHoistingInliner {
    fn inline(&self, html: &str) -> String {
        let without_scripts = script_regex().replace_all(html, "");

        let rules: Vec<Rule> = style_block_regex()
            .captures_iter(&without_scripts)
            .flat_map(|captures| parse_rules(&captures[1]))
            .collect();
        let without_styles = style_block_regex().replace_all(&without_scripts, "");

        if rules.is_empty() {
            return without_styles.into_owned();
        }

        debug!("Inlining {} CSS rule(s)", rules.len());
        open_tag_regex()
            .replace_all(&without_styles, |captures: &Captures<'_>| {
                apply_rules(&rules, captures)
            })
            .into_owned()
    }
}

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("static CSS pattern is valid"))
        }
    };
}

static_regex!(script_regex, r"(?is)<script\b[^>]*>.*?</script\s*>");
static_regex!(style_block_regex, r"(?is)<style\b[^>]*>(.*?)</style\s*>");
static_regex!(comment_regex, r"(?s)/\*.*?\*/");
static_regex!(
    at_rule_regex,
    r"(?s)@[^{};]+(?:;|\{(?:[^{}]*\{[^{}]*\})*[^{}]*\})"
);
static_regex!(rule_regex, r"([^{}]+)\{([^{}]*)\}");
static_regex!(open_tag_regex, r"<([a-zA-Z][a-zA-Z0-9]*)\b([^<>]*)>");
static_regex!(
    class_attr_regex,
    r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#
);
static_regex!(id_attr_regex, r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#);
static_regex!(
    style_attr_regex,
    r#"(?i)(?:^|\s)style\s*=\s*(?:"([^"]*)"|'([^']*)')"#
);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Tag(String),
    Class(String),
    Id(String),
}

impl Selector {
    fn parse(selector: &str) -> Option<Self> {
        let is_identifier = |name: &str| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        if let Some(class) = selector.strip_prefix('.') {
            return is_identifier(class).then(|| Self::Class(class.to_string()));
        }
        if let Some(id) = selector.strip_prefix('#') {
            return is_identifier(id).then(|| Self::Id(id.to_string()));
        }
        let starts_alphabetic = selector.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        (starts_alphabetic && selector.chars().all(|c| c.is_ascii_alphanumeric()))
            .then(|| Self::Tag(selector.to_ascii_lowercase()))
    }

    fn specificity(&self) -> u8 {
        match self {
            Self::Tag(_) => 0,
            Self::Class(_) => 1,
            Self::Id(_) => 2,
        }
    }

    fn matches(&self, tag: &str, classes: &[&str], id: Option<&str>) -> bool {
        match self {
            Self::Tag(name) => name.eq_ignore_ascii_case(tag),
            Self::Class(name) => classes.contains(&name.as_str()),
            Self::Id(name) => id == Some(name.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    selector: Selector,
    declarations: String,
}

fn parse_rules(stylesheet: &str) -> Vec<Rule> {
    let stylesheet = comment_regex().replace_all(stylesheet, "");
    let stylesheet = at_rule_regex().replace_all(&stylesheet, "");

    let mut rules = Vec::new();
    for captures in rule_regex().captures_iter(&stylesheet) {
        let declarations = normalize_declarations(&captures[2]);
        if declarations.is_empty() {
            continue;
        }

        for selector in captures[1].split(',') {
            match Selector::parse(selector.trim()) {
                Some(selector) => rules.push(Rule {
                    selector,
                    declarations: declarations.clone(),
                }),
                None => debug!("Dropping unsupported CSS selector '{}'", selector.trim()),
            }
        }
    }
    rules
}

fn normalize_declarations(block: &str) -> String {
    block
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .map(|declaration| declaration.replace('"', "'"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn attribute_value<'a>(regex: &Regex, attributes: &'a str) -> Option<&'a str> {
    let captures = regex.captures(attributes)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
}

fn apply_rules(rules: &[Rule], captures: &Captures<'_>) -> String {
    let tag = &captures[1];
    let attributes = &captures[2];

    let classes: Vec<&str> = attribute_value(class_attr_regex(), attributes)
        .map(|value| value.split_whitespace().collect())
        .unwrap_or_default();
    let id = attribute_value(id_attr_regex(), attributes);

    let mut matching: Vec<&Rule> = rules
        .iter()
        .filter(|rule| rule.selector.matches(tag, &classes, id))
        .collect();
    if matching.is_empty() {
        return captures[0].to_string();
    }
    matching.sort_by_key(|rule| rule.selector.specificity());

    let mut declarations: Vec<String> = matching
        .iter()
        .map(|rule| rule.declarations.clone())
        .collect();
    if let Some(existing) = attribute_value(style_attr_regex(), attributes) {
        let existing = normalize_declarations(existing);
        if !existing.is_empty() {
            declarations.push(existing);
        }
    }

    let remaining = style_attr_regex().replace_all(attributes, "");
    let remaining = remaining.trim_end();
    let (remaining, closing) = match remaining.strip_suffix('/') {
        Some(stripped) => (stripped.trim_end(), " />"),
        None => (remaining, ">"),
    };

    format!(
        "<{tag}{remaining} style=\"{}\"{closing}",
        declarations.join("; ")
    )
}
