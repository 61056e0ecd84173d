//! Static import extraction
//!
//! Pulls module specifiers out of JavaScript sources: `import`/`export
//! ... from` statements, side-effect imports, `require(...)` and dynamic
//! `import(...)` calls. Line-based scanning, which is exact for the flat
//! single-line import headers of distributed bundles; exotic multi-line
//! declarations may be missed, and declared manifest dependencies keep
//! ordering correct in that case.

use std::collections::BTreeSet;

/// All module specifiers referenced by `source`, deduplicated and sorted
pub fn extract_import_specifiers(source: &str) -> Vec<String> {
    let mut specifiers: BTreeSet<String> = BTreeSet::new();

    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with('*') {
            continue;
        }

        if trimmed.starts_with("import") || trimmed.starts_with("export") {
            if let Some(spec) = quoted_after_from(trimmed).or_else(|| side_effect_import(trimmed))
            {
                specifiers.insert(spec);
            }
        }

        for call in ["require(", "import("] {
            let mut rest = trimmed;
            while let Some(idx) = rest.find(call) {
                rest = &rest[idx + call.len()..];
                if let Some(spec) = read_quoted(rest.trim_start()) {
                    specifiers.insert(spec);
                }
            }
        }
    }

    specifiers.into_iter().collect()
}

/// Whether a specifier is resolved relative to the importing file
/// (anything else is a bare package specifier)
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// The quoted specifier after a ` from ` clause
fn quoted_after_from(line: &str) -> Option<String> {
    let idx = line.find(" from ")?;
    read_quoted(line[idx + " from ".len()..].trim_start())
}

/// The quoted specifier of `import 'x';`
fn side_effect_import(line: &str) -> Option<String> {
    let rest = line.strip_prefix("import")?.trim_start();
    read_quoted(rest)
}

/// Read a single- or double-quoted string at the start of `s`
fn read_quoted(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let quote = match chars.next() {
        Some(c @ ('\'' | '"')) => c,
        _ => return None,
    };
    let rest = &s[1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}
