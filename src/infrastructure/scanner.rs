//! Entry point scanner
//!
//! Walks a package root looking for directories whose manifest declares
//! at least one recognized format property. Plain packages without
//! format properties are not entry points but their subtrees are still
//! walked, so nested and scoped entry points are found wherever they
//! sit. Hidden directories are skipped, as are directories matching the
//! configured ignore globs.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::domain::entities::{EntryPoint, MANIFEST_NAME};
use crate::domain::ports::{EntryPointRepository, Exclusion, FileSystem, ScanOutcome};
use crate::domain::services::ModuleResolver;
use crate::domain::value_objects::FormatProperty;
use crate::error::{RefitError, RefitResult};
use crate::infrastructure::imports::{extract_import_specifiers, is_relative};
use crate::infrastructure::repositories::ManifestRepository;

/// Probe order for the file used in static import analysis: the most
/// modern flat ESM variant available reads cleanest.
const IMPORT_PROBE_ORDER: [FormatProperty; 7] = [
    FormatProperty::Esm2015,
    FormatProperty::Fesm2015,
    FormatProperty::Es2015,
    FormatProperty::Esm5,
    FormatProperty::Fesm5,
    FormatProperty::Module,
    FormatProperty::Main,
];

pub struct EntryPointScanner<'fs, F: FileSystem> {
    fs: &'fs F,
    ignore_globs: Vec<String>,
}

impl<'fs, F: FileSystem> EntryPointScanner<'fs, F> {
    pub fn new(fs: &'fs F) -> Self {
        Self {
            fs,
            ignore_globs: Vec::new(),
        }
    }

    pub fn with_ignore_globs(fs: &'fs F, globs: Vec<String>) -> Self {
        Self {
            fs,
            ignore_globs: globs,
        }
    }

    /// Walk `root` and collect every qualified entry point.
    ///
    /// Manifest and format problems exclude the candidate and are
    /// reported in the outcome; they never abort the scan.
    pub fn scan(&self, root: &Path) -> RefitResult<ScanOutcome> {
        let matcher = self.build_matcher(root)?;
        let repository = ManifestRepository::new(self.fs);
        let resolver = ModuleResolver::new(self.fs);

        let mut outcome = ScanOutcome::default();
        self.walk(root, matcher.as_ref(), &repository, &resolver, &mut outcome)?;
        Ok(outcome)
    }

    fn build_matcher(&self, root: &Path) -> RefitResult<Option<Gitignore>> {
        if self.ignore_globs.is_empty() {
            return Ok(None);
        }
        let mut builder = GitignoreBuilder::new(root);
        for glob in &self.ignore_globs {
            builder
                .add_line(None, glob)
                .map_err(|e| RefitError::Config {
                    path: root.to_path_buf(),
                    message: format!("invalid ignore pattern '{glob}': {e}"),
                })?;
        }
        let matcher = builder.build().map_err(|e| RefitError::Config {
            path: root.to_path_buf(),
            message: format!("invalid ignore patterns: {e}"),
        })?;
        Ok(Some(matcher))
    }

    fn walk(
        &self,
        dir: &Path,
        matcher: Option<&Gitignore>,
        repository: &ManifestRepository<'fs, F>,
        resolver: &ModuleResolver<'fs, F>,
        outcome: &mut ScanOutcome,
    ) -> RefitResult<()> {
        if self.fs.is_file(&dir.join(MANIFEST_NAME)) {
            match repository.load(dir) {
                Err(error) => outcome.exclusions.push(Exclusion {
                    path: dir.to_path_buf(),
                    error,
                }),
                // A manifest without format properties is a plain package
                Ok(ep) if ep.formats().is_empty() => {}
                Ok(mut ep) => match self.validate_formats(&mut ep, resolver) {
                    Err(error) => outcome.exclusions.push(Exclusion {
                        path: dir.to_path_buf(),
                        error,
                    }),
                    Ok(()) => {
                        self.augment_with_imports(&mut ep);
                        outcome.entry_points.push(ep);
                    }
                },
            }
        }

        for child in self.fs.read_dir(dir)? {
            if !self.fs.is_dir(&child) {
                continue;
            }
            let hidden = child
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            if hidden {
                continue;
            }
            if let Some(matcher) = matcher {
                if matcher.matched_path_or_any_parents(&child, true).is_ignore() {
                    continue;
                }
            }
            self.walk(&child, matcher, repository, resolver, outcome)?;
        }

        Ok(())
    }

    /// Check every declared format resolves to a file, normalizing
    /// directory and extension-less values to the concrete file.
    fn validate_formats(
        &self,
        ep: &mut EntryPoint,
        resolver: &ModuleResolver<'fs, F>,
    ) -> RefitResult<()> {
        let mut normalized: Vec<(FormatProperty, String)> = Vec::new();
        for (&property, rel) in ep.formats() {
            match resolver.resolve_file(&ep.path().join(rel)) {
                Some(file) => {
                    let rel_norm = file
                        .strip_prefix(ep.path())
                        .unwrap_or(&file)
                        .to_string_lossy()
                        .into_owned();
                    if rel_norm != *rel {
                        normalized.push((property, rel_norm));
                    }
                }
                None => {
                    return Err(RefitError::InvalidEntryPoint {
                        path: ep.manifest_path(),
                        property: property.as_str().to_string(),
                        value: rel.clone(),
                    })
                }
            }
        }
        for (property, rel) in normalized {
            ep.set_format(property, rel);
        }
        Ok(())
    }

    /// Union statically imported bare specifiers into the dependency
    /// set. Best-effort: an unreadable source just leaves the declared
    /// dependencies in place.
    fn augment_with_imports(&self, ep: &mut EntryPoint) {
        let own_name = ep.name().to_string();
        for property in IMPORT_PROBE_ORDER {
            let Some(file) = ep.resolved_format_path(property) else {
                continue;
            };
            let Ok(source) = self.fs.read(&file) else {
                return;
            };
            for spec in extract_import_specifiers(&source) {
                if !is_relative(&spec) && spec != own_name {
                    ep.add_dependency(spec);
                }
            }
            return;
        }
    }
}

impl<'fs, F: FileSystem> EntryPointRepository for EntryPointScanner<'fs, F> {
    fn discover(&self, root: &Path) -> RefitResult<ScanOutcome> {
        self.scan(root)
    }
}
