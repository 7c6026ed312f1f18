use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::env_vars::VariableResolver;

lazy_static! {
    /// `$NAME`, `${NAME}` or the `$$` escape.
    static ref VARIABLE: Regex = Regex::new(r"\$([A-Za-z0-9_]+|\{[A-Za-z0-9_.]+\}|\$)").unwrap();
    static ref LINE_BREAKS: Regex = Regex::new(r"[\t\r\n]+").unwrap();
}

/// Replaces macro references in `s` with values from `resolver`.
///
/// References the resolver does not know are left in place verbatim, and
/// `$$` collapses to a single literal `$`.
pub fn replace_macro(s: &str, resolver: &dyn VariableResolver) -> String {
    VARIABLE
        .replace_all(s, |caps: &Captures| {
            let key = &caps[1];
            if key == "$" {
                return "$".to_string();
            }
            let name = key
                .strip_prefix('{')
                .and_then(|k| k.strip_suffix('}'))
                .unwrap_or(key);
            resolver
                .resolve(name)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Collapses every run of tab / CR / LF into one space so multi-line form
/// input stays on a single command line.
pub fn normalize_whitespace(s: &str) -> String {
    LINE_BREAKS.replace_all(s, " ").into_owned()
}

/// `None` or whitespace-only.
pub fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |v| v.trim().is_empty())
}
