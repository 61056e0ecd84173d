//! Manifest Repository
//!
//! Reads `package.json` manifests into entry points and commits
//! processed markers back. The marker write re-reads the manifest,
//! merges, and rewrites the whole file; with `LocalFileSystem` the
//! rewrite is an atomic temp-file + rename.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::domain::entities::{EntryPoint, ProcessedMarker, MANIFEST_NAME, MARKER_KEY};
use crate::domain::ports::{FileSystem, MarkerRepository};
use crate::domain::value_objects::FormatProperty;
use crate::error::{RefitError, RefitResult};

pub struct ManifestRepository<'fs, F: FileSystem> {
    fs: &'fs F,
}

impl<'fs, F: FileSystem> ManifestRepository<'fs, F> {
    pub fn new(fs: &'fs F) -> Self {
        Self { fs }
    }

    /// Parse the manifest in `dir` into an entry point.
    ///
    /// Shape validation only: whether the declared format files exist is
    /// the scanner's concern. An entry point that declares no recognized
    /// property parses fine with an empty format map.
    pub fn load(&self, dir: &Path) -> RefitResult<EntryPoint> {
        let manifest_path = dir.join(MANIFEST_NAME);
        let content = self.fs.read(&manifest_path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            RefitError::ManifestParse {
                path: manifest_path.clone(),
                message: e.to_string(),
            }
        })?;
        let root = value.as_object().ok_or_else(|| RefitError::ManifestParse {
            path: manifest_path.clone(),
            message: "manifest root is not an object".to_string(),
        })?;

        let name = match root.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => derive_name(dir),
        };
        let mut entry_point = EntryPoint::new(name, dir);

        for property in FormatProperty::ALL {
            match root.get(property.as_str()) {
                None => {}
                Some(Value::String(rel)) => entry_point.set_format(property, rel.clone()),
                Some(other) => {
                    return Err(RefitError::InvalidEntryPoint {
                        path: manifest_path.clone(),
                        property: property.as_str().to_string(),
                        value: other.to_string(),
                    })
                }
            }
        }

        for section in ["dependencies", "peerDependencies"] {
            match root.get(section) {
                None => {}
                Some(Value::Object(deps)) => {
                    for dep_name in deps.keys() {
                        entry_point.add_dependency(dep_name.clone());
                    }
                }
                Some(_) => {
                    return Err(RefitError::ManifestParse {
                        path: manifest_path.clone(),
                        message: format!("'{section}' is not an object"),
                    })
                }
            }
        }

        entry_point.set_marker(parse_marker(root, &manifest_path)?);

        Ok(entry_point)
    }

    /// Merge `{property: version}` entries into the manifest's marker.
    ///
    /// The manifest is re-read at commit time so entries written by
    /// other runs (or for properties outside this run's set) survive.
    pub fn commit_marker(
        &self,
        dir: &Path,
        properties: &[FormatProperty],
        version: &str,
    ) -> RefitResult<()> {
        self.rewrite(dir, |root, manifest_path| {
            let marker = root
                .entry(MARKER_KEY.to_string())
                .or_insert_with(|| json!({}));
            let marker_obj = marker
                .as_object_mut()
                .ok_or_else(|| RefitError::ManifestParse {
                    path: manifest_path.to_path_buf(),
                    message: format!("'{MARKER_KEY}' is not an object"),
                })?;
            for property in properties {
                marker_obj.insert(property.as_str().to_string(), json!(version));
            }
            Ok(true)
        })
    }

    /// Strip the marker from the manifest in `dir`.
    ///
    /// Returns whether a marker was present.
    pub fn clear_marker(&self, dir: &Path) -> RefitResult<bool> {
        let mut removed = false;
        self.rewrite(dir, |root, _| {
            removed = root.remove(MARKER_KEY).is_some();
            Ok(removed)
        })?;
        Ok(removed)
    }

    /// Read-modify-write cycle over the manifest object in `dir`.
    /// The mutation reports whether anything changed; untouched
    /// manifests are not rewritten.
    fn rewrite(
        &self,
        dir: &Path,
        mutate: impl FnOnce(&mut Map<String, Value>, &Path) -> RefitResult<bool>,
    ) -> RefitResult<()> {
        let manifest_path = dir.join(MANIFEST_NAME);
        let content = self.fs.read(&manifest_path)?;
        let mut value: Value = serde_json::from_str(&content).map_err(|e| {
            RefitError::ManifestParse {
                path: manifest_path.clone(),
                message: e.to_string(),
            }
        })?;
        let root = value.as_object_mut().ok_or_else(|| RefitError::ManifestParse {
            path: manifest_path.clone(),
            message: "manifest root is not an object".to_string(),
        })?;

        if !mutate(root, &manifest_path)? {
            return Ok(());
        }

        let mut rendered = serde_json::to_string_pretty(&value).map_err(|e| {
            RefitError::ManifestParse {
                path: manifest_path.clone(),
                message: e.to_string(),
            }
        })?;
        rendered.push('\n');
        self.fs.write(&manifest_path, &rendered)?;
        Ok(())
    }
}

impl<'fs, F: FileSystem> MarkerRepository for ManifestRepository<'fs, F> {
    fn commit(&self, dir: &Path, properties: &[FormatProperty], version: &str) -> RefitResult<()> {
        self.commit_marker(dir, properties, version)
    }

    fn clear(&self, dir: &Path) -> RefitResult<bool> {
        self.clear_marker(dir)
    }
}

fn parse_marker(root: &Map<String, Value>, manifest_path: &Path) -> RefitResult<ProcessedMarker> {
    let raw = match root.get(MARKER_KEY) {
        None => return Ok(ProcessedMarker::new()),
        Some(Value::Object(raw)) => raw,
        Some(_) => {
            return Err(RefitError::ManifestParse {
                path: manifest_path.to_path_buf(),
                message: format!("'{MARKER_KEY}' is not an object"),
            })
        }
    };

    let mut entries = std::collections::BTreeMap::new();
    for (key, value) in raw {
        match value {
            Value::String(version) => {
                entries.insert(key.clone(), version.clone());
            }
            _ => {
                return Err(RefitError::ManifestParse {
                    path: manifest_path.to_path_buf(),
                    message: format!("'{MARKER_KEY}.{key}' is not a string"),
                })
            }
        }
    }
    Ok(ProcessedMarker::from_entries(entries))
}

/// Fallback name for manifests without one: the directory name, with
/// its scope directory prepended when there is one.
fn derive_name(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    match dir.parent().and_then(Path::file_name) {
        Some(scope) if scope.to_string_lossy().starts_with('@') => {
            format!("{}/{}", scope.to_string_lossy(), base)
        }
        _ => base,
    }
}
