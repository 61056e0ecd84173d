//! Property tests for module resolution.

use std::path::Path;

use proptest::prelude::*;

use refit::domain::ports::FileSystem;
use refit::domain::services::ModuleResolver;
use refit::infrastructure::fs::MemoryFileSystem;

fn fixture() -> MemoryFileSystem {
    let fs = MemoryFileSystem::new();
    fs.add_file("/app/node_modules/lib/index.js", "export {};");
    fs.add_file("/app/node_modules/lib/esm5/index.js", "export {};");
    fs.add_file("/app/node_modules/lib/esm5/util.js", "export {};");
    fs.add_file("/app/node_modules/lib/typings.d.ts", "export {};");
    fs.add_file("/app/node_modules/@scope/pkg/main.js", "module.exports = {};");
    fs.add_file(
        "/app/node_modules/@scope/pkg/node_modules/inner/index.js",
        "export {};",
    );
    fs
}

/// Mix of path-shaped specifiers and arbitrary junk
fn specifier() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[a-z@./_-]{0,32}").unwrap(),
        ".{0,64}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: resolution never panics, whatever the specifier.
    #[test]
    fn property_resolve_never_panics(spec in specifier()) {
        let fs = fixture();
        let resolver = ModuleResolver::new(&fs);
        let _ = resolver.resolve(&spec, Path::new("/app/node_modules/lib"));
        let _ = resolver.resolve(&spec, Path::new("/app/node_modules/@scope/pkg"));
    }

    /// PROPERTY: resolving the same specifier twice from the same
    /// directory yields the same answer.
    #[test]
    fn property_resolve_is_deterministic(spec in specifier()) {
        let fs = fixture();
        let resolver = ModuleResolver::new(&fs);

        let first = resolver.resolve(&spec, Path::new("/app/node_modules/lib"));
        let second = resolver.resolve(&spec, Path::new("/app/node_modules/lib"));
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: whatever resolution returns is an existing file in the
    /// snapshot it searched.
    #[test]
    fn property_resolved_paths_are_existing_files(spec in specifier()) {
        let fs = fixture();
        let resolver = ModuleResolver::new(&fs);

        if let Some(found) = resolver.resolve(&spec, Path::new("/app/node_modules/lib")) {
            prop_assert!(fs.is_file(&found), "{} is not a file", found.display());
        }
    }
}
