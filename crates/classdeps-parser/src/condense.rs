//! Compact a source file before it is handed to the documentation prompt.

use crate::patterns::strip_comments;
use regex::Regex;
use std::sync::OnceLock;

/// Drop `using` directives, preprocessor lines and comments, then collapse
/// all whitespace into single spaces.
pub fn condense(source: &str) -> String {
    static USING_RE: OnceLock<Regex> = OnceLock::new();
    static DIRECTIVE_RE: OnceLock<Regex> = OnceLock::new();
    static SPACE_RE: OnceLock<Regex> = OnceLock::new();

    let using_re = USING_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?[\w.]+\s*;\s*$").unwrap()
    });
    let directive_re = DIRECTIVE_RE.get_or_init(|| Regex::new(r"(?m)^\s*#.*$").unwrap());
    let space_re = SPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let without_usings = using_re.replace_all(source, "");
    let without_directives = directive_re.replace_all(&without_usings, "");
    let stripped = strip_comments(&without_directives);
    space_re.replace_all(&stripped, " ").trim().to_string()
}
