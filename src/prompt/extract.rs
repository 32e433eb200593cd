//! Variable extraction - find `{{name}}` placeholders in a template
//!
//! A placeholder is `{{` followed by any run of characters other than `}` and
//! closed by the first `}}`. The name is trimmed, so `{{ foo }}` and `{{foo}}`
//! both refer to `foo`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Template, VariableSet};

pub(crate) static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Invalid placeholder regex"));

/// Distinct variable names referenced by a template, in first-occurrence order
///
/// Chat templates are scanned message by message, so a name used in several
/// messages is reported once, at its earliest position.
pub fn extract_variables(template: &Template) -> VariableSet {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for text in template.texts() {
        collect(text, &mut seen, &mut names);
    }
    names
}

/// Distinct variable names in a single string
pub fn extract_from_text(text: &str) -> VariableSet {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    collect(text, &mut seen, &mut names);
    names
}

fn collect(text: &str, seen: &mut HashSet<String>, names: &mut Vec<String>) {
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = caps[1].trim();
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }
}
