//! Module resolver - locates the file behind a module specifier
//!
//! Mirrors the resolution order of the module loaders that will consume
//! the compiled output: exact file, directory index, extension fallback,
//! then an upward walk through `node_modules` directories for bare
//! specifiers. Purely a function of the file system snapshot.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::domain::ports::FileSystem;

/// Extensions tried when a specifier names no file directly, in order
const EXTENSION_FALLBACK: [&str; 2] = [".js", ".d.ts"];

const NODE_MODULES: &str = "node_modules";

pub struct ModuleResolver<'fs, F: FileSystem> {
    fs: &'fs F,
}

impl<'fs, F: FileSystem> ModuleResolver<'fs, F> {
    pub fn new(fs: &'fs F) -> Self {
        Self { fs }
    }

    /// Resolve `specifier` as seen from `from_dir`.
    ///
    /// Relative specifiers resolve against `from_dir` only. Bare
    /// specifiers additionally retry under each ancestor `node_modules`
    /// directory, nearest first. Returns the backing file, or `None`
    /// when every candidate misses.
    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        if let Some(found) = self.resolve_file(&from_dir.join(specifier)) {
            return Some(found);
        }

        if !Self::contains_node_modules(specifier) {
            for base in self.node_modules_bases(from_dir) {
                if let Some(found) = self.resolve_file(&base.join(specifier)) {
                    return Some(found);
                }
            }
        }

        None
    }

    /// Resolve one concrete candidate path: exact file, then directory
    /// index, then extension fallback. No `node_modules` rebasing.
    pub fn resolve_file(&self, candidate: &Path) -> Option<PathBuf> {
        if self.fs.is_file(candidate) {
            return Some(candidate.to_path_buf());
        }

        if self.fs.is_dir(candidate) {
            return self.resolve_file(&candidate.join("index"));
        }

        for suffix in EXTENSION_FALLBACK {
            let with_ext = append_suffix(candidate, suffix);
            if self.fs.is_file(&with_ext) {
                return Some(with_ext);
            }
        }

        None
    }

    /// `node_modules` directories visible from `from_dir`, nearest first
    fn node_modules_bases(&self, from_dir: &Path) -> Vec<PathBuf> {
        let mut bases: Vec<PathBuf> = Vec::new();
        for ancestor in from_dir.ancestors() {
            let base = if ancestor.file_name() == Some(OsStr::new(NODE_MODULES)) {
                ancestor.to_path_buf()
            } else {
                let nested = ancestor.join(NODE_MODULES);
                if !self.fs.is_dir(&nested) {
                    continue;
                }
                nested
            };
            if bases.last() != Some(&base) {
                bases.push(base);
            }
        }
        bases
    }

    fn contains_node_modules(specifier: &str) -> bool {
        Path::new(specifier)
            .components()
            .any(|c| c.as_os_str() == NODE_MODULES)
    }
}

/// Append an extension without touching existing dots in the name
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}
