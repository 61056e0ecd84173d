//! Banner transformer
//!
//! The built-in `Transformer`: validates that every relative import of
//! the source file resolves, then stamps a one-line banner recording
//! the compiler version and module format. Deliberately minimal; real
//! deployments swap in their own rewriter behind the same port.

use std::path::Path;

use crate::domain::ports::file_system::FileSystem;
use crate::domain::ports::transformer::{TransformError, TransformResult, Transformer};
use crate::domain::services::ModuleResolver;
use crate::domain::value_objects::ModuleFormat;
use crate::infrastructure::imports::{extract_import_specifiers, is_relative};

const BANNER_PREFIX: &str = "/* processed by refit ";

pub struct BannerTransformer {
    version: String,
}

impl BannerTransformer {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl Transformer for BannerTransformer {
    fn transform<F: FileSystem>(
        &self,
        source: &Path,
        format: ModuleFormat,
        fs: &F,
    ) -> TransformResult {
        let content = fs.read(source)?;

        let resolver = ModuleResolver::new(fs);
        let from_dir = source.parent().unwrap_or_else(|| Path::new("."));
        for specifier in extract_import_specifiers(&content) {
            // Unresolvable bare specifiers are externals outside the tree
            if is_relative(&specifier) && resolver.resolve(&specifier, from_dir).is_none() {
                return Err(TransformError::UnresolvedImport {
                    specifier,
                    source: source.to_path_buf(),
                });
            }
        }

        Ok(format!(
            "{BANNER_PREFIX}v{} ({}) */\n{}",
            self.version,
            format,
            strip_banner(&content)
        ))
    }
}

/// Drop a previous banner line so repeated transforms stay stable
fn strip_banner(content: &str) -> &str {
    if !content.starts_with(BANNER_PREFIX) {
        return content;
    }
    match content.find('\n') {
        Some(idx) => &content[idx + 1..],
        None => "",
    }
}
