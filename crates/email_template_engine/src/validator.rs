//! Static template validation.
//!
//! The validator reads raw template source line by line and reports problems
//! without rendering anything: unknown variables, components that do not
//! exist, `{{_index}}` outside a loop and unbalanced braces. It deliberately
//! uses simple per-line patterns rather than the brace-aware scanner used for
//! rendering, so it can point at broken markup the renderer would silently
//! pass through.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::loops::{find_loop_ranges, range_for_line, LoopRange};
use crate::scanner::{find_top_level_comma, strip_quotes};
use crate::variables::VariableResolver;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

const KNOWN_DIRECTIVES: &[&str] = &[
    "component",
    "layout",
    "loop",
    "include",
    "content",
    "_index",
    "_index1",
];

/// How serious a [`ValidationIssue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Overall outcome of validating a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Success,
    Warning,
    Error,
}

/// A single problem found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
    /// 1-based line number.
    pub line: usize,
    /// 0-based character offset within the line.
    pub column: usize,
    /// The offending source text.
    pub code: String,
}

/// Every issue found in a template, with the derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Builds a result, deriving the status from the issues.
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let status = if issues.iter().any(|i| i.severity == Severity::Error) {
            ValidationStatus::Error
        } else if issues.is_empty() {
            ValidationStatus::Success
        } else {
            ValidationStatus::Warning
        };
        Self { status, issues }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.status == ValidationStatus::Error
    }
}

fn print_regex() -> &'static Regex {
    static PRINT: OnceLock<Regex> = OnceLock::new();
    PRINT.get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").expect("print pattern is valid"))
}

fn component_regex() -> &'static Regex {
    static COMPONENT: OnceLock<Regex> = OnceLock::new();
    COMPONENT.get_or_init(|| {
        Regex::new(
            r#"\{\{\s*component\s+(?:"([^"'\s}]+)"|'([^"'\s}]+)'|([^"'\s}]+))\s*\}\}"#,
        )
        .expect("component pattern is valid")
    })
}

fn component_argument_regex() -> &'static Regex {
    static COMPONENT_ARGUMENT: OnceLock<Regex> = OnceLock::new();
    COMPONENT_ARGUMENT.get_or_init(|| {
        Regex::new(r"\{\{\s*component\s+([^}]*)\}\}").expect("component argument pattern is valid")
    })
}

fn well_formed_name_regex() -> &'static Regex {
    static WELL_FORMED: OnceLock<Regex> = OnceLock::new();
    WELL_FORMED.get_or_init(|| {
        Regex::new(r#"^(?:["'][^"']+["']|[a-zA-Z0-9_-]+)$"#).expect("name pattern is valid")
    })
}

fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| {
        Regex::new(
            r#"\{\{\s*(include|layout)\s+(?:"([^"'\s}]+)"|'([^"'\s}]+)'|([^"'\s}]+))\s*\}\}"#,
        )
        .expect("reference pattern is valid")
    })
}

fn leading_identifier_regex() -> &'static Regex {
    static LEADING_IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    LEADING_IDENTIFIER.get_or_init(|| {
        Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)").expect("identifier pattern is valid")
    })
}

fn numeric_regex() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("numeric pattern is valid"))
}

fn incomplete_regex() -> &'static Regex {
    static INCOMPLETE: OnceLock<Regex> = OnceLock::new();
    INCOMPLETE.get_or_init(|| Regex::new(r"\{\{[^}]*$").expect("incomplete pattern is valid"))
}

/// Character column of a byte offset within `line`.
fn column_of(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count()
}

fn is_structural(body: &str) -> bool {
    ["component ", "layout ", "loop ", "include ", "/layout", "/loop"]
        .iter()
        .any(|prefix| body.starts_with(prefix))
        || body == "content"
}

/// Validates templates against a set of known variables and components.
#[derive(Debug, Clone, Default)]
pub struct TemplateValidator {
    variables: BTreeSet<String>,
    components: BTreeSet<String>,
}

impl TemplateValidator {
    pub fn new(variables: BTreeSet<String>, components: BTreeSet<String>) -> Self {
        Self {
            variables,
            components,
        }
    }

    /// Uses every key the resolver knows, defaults and overrides alike.
    pub fn from_resolver(resolver: &VariableResolver, components: BTreeSet<String>) -> Self {
        Self::new(resolver.keys().into_iter().collect(), components)
    }

    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    pub fn components(&self) -> &BTreeSet<String> {
        &self.components
    }

    /// Checks `content` and reports every issue found.
    ///
    /// Validation never fails; problems are collected into the result.
    #[instrument(skip_all, fields(len = content.len()))]
    pub fn validate(&self, content: &str) -> ValidationResult {
        let loop_ranges = find_loop_ranges(content);
        let mut issues = Vec::new();

        for (index, line) in content.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let line_number = index + 1;

            self.check_variables(line, line_number, &loop_ranges, &mut issues);
            self.check_components(line, line_number, &mut issues);
            self.check_directives(line, line_number, &mut issues);
        }

        let result = ValidationResult::from_issues(issues);
        debug!(
            "Validation finished with status {:?} and {} issue(s)",
            result.status,
            result.issues.len()
        );
        result
    }

    fn check_variables(
        &self,
        line: &str,
        line_number: usize,
        loop_ranges: &[LoopRange],
        issues: &mut Vec<ValidationIssue>,
    ) {
        for captures in print_regex().captures_iter(line) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let body = captures[1].trim();
            let column = column_of(line, whole.start());
            let code = format!("{{{{{body}}}}}");

            if is_structural(body) {
                continue;
            }

            if body == "_index" || body == "_index1" {
                if range_for_line(loop_ranges, line_number).is_none() {
                    issues.push(ValidationIssue {
                        severity: Severity::Error,
                        message: format!("'{body}' can only be used inside {{{{loop}}}} blocks"),
                        line: line_number,
                        column,
                        code,
                    });
                }
                continue;
            }

            if let Some(comma) = find_top_level_comma(body) {
                let value = body[comma + 1..].trim();
                let acceptable = value.is_empty()
                    || strip_quotes(value).is_some()
                    || numeric_regex().is_match(value)
                    || self.variables.contains(value);
                if !acceptable {
                    issues.push(ValidationIssue {
                        severity: Severity::Warning,
                        message: format!("Value '{value}' is not defined in custom data"),
                        line: line_number,
                        column,
                        code,
                    });
                }
                continue;
            }

            let key = match body.split_once('|') {
                Some((key, method)) => {
                    issues.push(ValidationIssue {
                        severity: Severity::Warning,
                        message: format!(
                            "Deprecated pipe syntax: method '{}' is ignored",
                            method.trim()
                        ),
                        line: line_number,
                        column,
                        code: code.clone(),
                    });
                    key.trim()
                }
                None => body,
            };

            if !self.variables.contains(key) {
                issues.push(ValidationIssue {
                    severity: Severity::Warning,
                    message: format!("Variable '{key}' is not defined in custom data"),
                    line: line_number,
                    column,
                    code,
                });
            }
        }
    }

    fn check_components(&self, line: &str, line_number: usize, issues: &mut Vec<ValidationIssue>) {
        for captures in component_regex().captures_iter(line) {
            let (Some(whole), Some(name)) = (
                captures.get(0),
                captures
                    .get(1)
                    .or_else(|| captures.get(2))
                    .or_else(|| captures.get(3)),
            ) else {
                continue;
            };

            if !self.components.contains(name.as_str()) {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    message: format!("Component '{}' does not exist", name.as_str()),
                    line: line_number,
                    column: column_of(line, whole.start()),
                    code: whole.as_str().to_string(),
                });
            }
        }

        for captures in component_argument_regex().captures_iter(line) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if !well_formed_name_regex().is_match(captures[1].trim()) {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    message: "Malformed component directive: component name must be quoted or a valid identifier".to_string(),
                    line: line_number,
                    column: column_of(line, whole.start()),
                    code: whole.as_str().to_string(),
                });
            }
        }

        for captures in reference_regex().captures_iter(line) {
            let (Some(whole), Some(name)) = (
                captures.get(0),
                captures
                    .get(2)
                    .or_else(|| captures.get(3))
                    .or_else(|| captures.get(4)),
            ) else {
                continue;
            };

            if !self.components.contains(name.as_str()) {
                let kind = if &captures[1] == "layout" {
                    "Layout"
                } else {
                    "Include"
                };
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    message: format!("{kind} '{}' does not exist", name.as_str()),
                    line: line_number,
                    column: column_of(line, whole.start()),
                    code: whole.as_str().to_string(),
                });
            }
        }
    }

    fn check_directives(&self, line: &str, line_number: usize, issues: &mut Vec<ValidationIssue>) {
        for captures in leading_identifier_regex().captures_iter(line) {
            let (Some(whole), Some(identifier)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let identifier = identifier.as_str();

            let start = whole.start();
            let directive = match line[start..].find("}}") {
                Some(end) => &line[start..start + end + 2],
                None => &line[start..],
            };

            if directive.contains(',')
                || KNOWN_DIRECTIVES.contains(&identifier)
                || self.variables.contains(identifier)
            {
                continue;
            }

            issues.push(ValidationIssue {
                severity: Severity::Warning,
                message: format!("Unknown directive or variable '{identifier}'"),
                line: line_number,
                column: column_of(line, start),
                code: directive.to_string(),
            });
        }

        let opening = line.matches("{{").count();
        let closing = line.matches("}}").count();
        if opening == closing {
            return;
        }

        match (incomplete_regex().is_match(line), line.rfind("{{")) {
            (true, Some(last_open)) => issues.push(ValidationIssue {
                severity: Severity::Error,
                message: "Incomplete directive: missing closing braces".to_string(),
                line: line_number,
                column: column_of(line, last_open),
                code: line[last_open..].to_string(),
            }),
            _ => issues.push(ValidationIssue {
                severity: Severity::Error,
                message: format!("Mismatched braces: {opening} opening, {closing} closing"),
                line: line_number,
                column: 0,
                code: line.trim().to_string(),
            }),
        }
    }
}
