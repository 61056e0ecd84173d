//! Layered configuration
//!
//! Sources, strongest first: CLI flags, `REFIT_*` environment variables,
//! a project `refit.toml` next to the tree being processed, the user's
//! `~/.config/refit/config.toml`, then built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::FormatProperty;
use crate::error::{RefitError, RefitResult};

/// Compilation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Format properties to process; empty means every recognized property
    #[serde(default)]
    pub properties: Vec<FormatProperty>,

    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> usize {
    1
}

/// Scan settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanConfig {
    /// Glob patterns (gitignore syntax) for directories the scanner skips
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub compile: CompileConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

/// Non-fatal finding from a config file, e.g. a key nothing reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> RefitResult<Self> {
        Self::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load a TOML file, collecting unknown-key warnings instead of failing
    /// on them. Only malformed TOML or wrong value types are errors.
    pub fn load_with_warnings(path: &Path) -> RefitResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, origin: &Path) -> RefitResult<(Self, Vec<ConfigWarning>)> {
        let mut warnings = Vec::new();

        let deserializer = toml::de::Deserializer::new(content);
        let config: Self = serde_ignored::deserialize(deserializer, |ignored| {
            warnings.push(unknown_key_warning(&ignored.to_string(), origin, content));
        })
        .map_err(|e| RefitError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok((config, warnings))
    }

    /// Resolve configuration without an explicit `--config` path: the first
    /// readable candidate wins, and the environment applies on top either way.
    pub fn load_or_default(source_root: Option<&Path>) -> Self {
        let mut candidates = Vec::new();
        if let Some(root) = source_root {
            candidates.push(root.join("refit.toml"));
        }
        if let Some(base) = user_config_home() {
            candidates.push(base.join("refit").join("config.toml"));
        }

        candidates
            .into_iter()
            .filter(|candidate| candidate.exists())
            .find_map(|candidate| Self::load(&candidate).ok())
            .unwrap_or_default()
            .with_env_overrides()
    }

    /// Fold `REFIT_PROPERTIES` / `REFIT_JOBS` into this configuration.
    /// Unparseable values are ignored rather than fatal: the variables may
    /// be set globally for a different refit version.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(properties) = properties_from_env() {
            self.compile.properties = properties;
        }
        if let Some(jobs) = jobs_from_env() {
            self.compile.jobs = jobs;
        }
        self
    }
}

fn properties_from_env() -> Option<Vec<FormatProperty>> {
    let raw = env::var("REFIT_PROPERTIES").ok()?;
    let parsed: Vec<FormatProperty> = raw
        .split(',')
        .filter_map(|key| FormatProperty::from_key(key.trim()))
        .collect();
    if parsed.is_empty() {
        None
    } else {
        Some(parsed)
    }
}

fn jobs_from_env() -> Option<usize> {
    let raw = env::var("REFIT_JOBS").ok()?;
    raw.trim().parse().ok().filter(|&jobs| jobs > 0)
}

/// `$XDG_CONFIG_HOME`, or `$HOME/.config`. Read from the environment so
/// test harnesses can repoint it per invocation.
fn user_config_home() -> Option<PathBuf> {
    if let Ok(explicit) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(explicit));
    }
    let home = env::var("HOME").ok()?;
    Some(Path::new(&home).join(".config"))
}

fn unknown_key_warning(dotted_path: &str, file: &Path, content: &str) -> ConfigWarning {
    let key = dotted_path
        .rsplit('.')
        .next()
        .unwrap_or(dotted_path)
        .to_string();
    ConfigWarning {
        line: line_of(content, &key),
        suggestion: nearest_known_key(&key),
        file: file.to_path_buf(),
        key,
    }
}

fn line_of(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(key))
        .map(|index| index + 1)
}

/// Did-you-mean helper for warning output. Only close matches are worth
/// suggesting; anything further than two edits away stays unexplained.
fn nearest_known_key(unknown: &str) -> Option<String> {
    const KNOWN: [&str; 5] = ["compile", "properties", "jobs", "scan", "ignore"];

    KNOWN
        .iter()
        .map(|known| (edit_distance(unknown, known), *known))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 2)
        .map(|(_, known)| known.to_string())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.iter().enumerate() {
        let mut row = Vec::with_capacity(b.len() + 1);
        row.push(i + 1);
        for (j, &cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            let delete = prev[j + 1] + 1;
            let insert = row[j] + 1;
            row.push(substitute.min(delete).min(insert));
        }
        prev = row;
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.compile.properties.is_empty());
        assert_eq!(config.compile.jobs, 1);
        assert!(config.scan.ignore.is_empty());
    }

    #[test]
    fn test_config_parse_toml() {
        let toml = r#"
[compile]
properties = ["esm5", "fesm2015"]
jobs = 4

[scan]
ignore = ["**/testing", "**/bundles"]
"#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.compile.properties,
            vec![FormatProperty::Esm5, FormatProperty::Fesm2015]
        );
        assert_eq!(config.compile.jobs, 4);
        assert_eq!(config.scan.ignore.len(), 2);
    }

    #[test]
    fn test_config_parse_partial_toml_keeps_defaults() {
        let toml = r#"
[scan]
ignore = ["**/testing"]
"#;

        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.compile.properties.is_empty());
        assert_eq!(config.compile.jobs, 1);
        assert_eq!(config.scan.ignore, vec!["**/testing".to_string()]);
    }

    #[test]
    fn test_env_override_jobs() {
        // SAFETY: no other test touches REFIT_JOBS
        unsafe { std::env::set_var("REFIT_JOBS", "8") };
        let config = Config::default().with_env_overrides();
        assert_eq!(config.compile.jobs, 8);
        unsafe { std::env::remove_var("REFIT_JOBS") };
    }

    #[test]
    fn test_env_override_properties() {
        // SAFETY: no other test touches REFIT_PROPERTIES
        unsafe { std::env::set_var("REFIT_PROPERTIES", "main, esm2015") };
        let config = Config::default().with_env_overrides();
        assert_eq!(
            config.compile.properties,
            vec![FormatProperty::Main, FormatProperty::Esm2015]
        );
        unsafe { std::env::remove_var("REFIT_PROPERTIES") };
    }

    #[test]
    fn test_config_load_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(Config::load(&dir.path().join("refit.toml")).is_err());
    }

    #[test]
    fn test_config_load_invalid_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refit.toml");
        fs::write(&path, "[compile\njobs = 2\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, RefitError::Config { .. }));
    }

    #[test]
    fn test_unknown_key_warns_with_suggestion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refit.toml");

        fs::write(&path, "[compile]\nproprties = [\"esm5\"]\n").unwrap();

        let (_config, warnings) = Config::load_with_warnings(&path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "proprties");
        assert_eq!(warnings[0].line, Some(2));
        assert_eq!(warnings[0].suggestion, Some("properties".to_string()));
    }

    #[test]
    fn test_unrecognizable_key_gets_no_suggestion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refit.toml");

        fs::write(&path, "completely_unrelated = true\n").unwrap();

        let (_config, warnings) = Config::load_with_warnings(&path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].suggestion, None);
    }

    #[test]
    fn test_config_load_or_default_without_files() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(Some(dir.path()));
        // jobs and properties may be env-overridden by parallel tests
        assert!(config.scan.ignore.is_empty());
    }
}
