#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz static import extraction over arbitrary source text
        let _ = refit::infrastructure::imports::extract_import_specifiers(content);
    }
});
