//! Test fixtures - reusable manifest and source content for tests.

/// Entry file content with no imports; transforms cleanly
pub const ENTRY_SOURCE: &str = "export const answer = 42;\n";

/// Entry file content whose relative import resolves nowhere, so the
/// transform of any format backed by it fails
pub const BROKEN_SOURCE: &str = "import { x } from './missing';\n";

/// Manifest key the processed marker is stored under
pub const MARKER_KEY: &str = "__processed_by_refit__";

/// A manifest declaring `esm5` and `fesm2015` plus the given dependencies
pub fn manifest_json(name: &str, deps: &[&str]) -> String {
    let deps_body: Vec<String> = deps
        .iter()
        .map(|dep| format!("        \"{dep}\": \"^1.0.0\""))
        .collect();
    format!(
        r#"{{
    "name": "{name}",
    "version": "1.0.0",
    "esm5": "esm5/index.js",
    "fesm2015": "fesm2015/index.js",
    "dependencies": {{
{}
    }}
}}
"#,
        deps_body.join(",\n")
    )
}
