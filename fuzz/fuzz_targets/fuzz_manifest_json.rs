#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz manifest parsing - malformed manifests are excluded, never panics
        let fs = refit::MemoryFileSystem::new();
        fs.add_file("/nm/pkg/package.json", content);
        let repo = refit::ManifestRepository::new(&fs);
        let _ = repo.load(Path::new("/nm/pkg"));
    }
});
