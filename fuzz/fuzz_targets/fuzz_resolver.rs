#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(specifier) = std::str::from_utf8(data) {
        // Fuzz module resolution - arbitrary specifiers never panic
        let fs = refit::MemoryFileSystem::new();
        fs.add_file("/nm/lib/index.js", "export {};");
        fs.add_file("/nm/lib/esm5/index.js", "export {};");
        fs.add_file("/nm/@scope/pkg/node_modules/inner/index.js", "export {};");
        let resolver = refit::ModuleResolver::new(&fs);
        let _ = resolver.resolve(specifier, Path::new("/nm/lib"));
        let _ = resolver.resolve(specifier, Path::new("/nm/@scope/pkg"));
    }
});
