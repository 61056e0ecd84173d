//! Test environment builder for isolated refit testing.
//!
//! Provides `TestEnv` - a package tree under a temp directory, built
//! package by package, plus helpers to run the refit CLI against it.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{self, MARKER_KEY};

/// Captured outcome of one refit CLI invocation
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Both streams, for assertions that don't care which one a message hit
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON, skipping blank lines
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("invalid NDJSON line '{line}': {e}"))
            })
            .collect()
    }
}

impl From<Output> for TestResult {
    fn from(output: Output) -> Self {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Isolated package tree with a `node_modules` directory at its root.
///
/// The refit CLI runs with the tree root as its working directory, so
/// the default `--source node_modules` resolves inside the tree.
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// The package root refit scans
    pub fn source(&self) -> PathBuf {
        self.root.path().join("node_modules")
    }

    /// Directory of a package inside the tree
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.source().join(name)
    }

    /// Parse a package's manifest
    pub fn manifest(&self, name: &str) -> serde_json::Value {
        let path = self.package_dir(name).join("package.json");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("invalid manifest {}: {e}", path.display()))
    }

    /// The processed marker of a package, if present
    pub fn marker(&self, name: &str) -> Option<serde_json::Value> {
        self.manifest(name).get(MARKER_KEY).cloned()
    }

    /// Read a file below a package directory
    pub fn read_package_file(&self, name: &str, relative: &str) -> String {
        let path = self.package_dir(name).join(relative);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
    }

    /// Run refit from the tree root. HOME and XDG_CONFIG_HOME point into
    /// the temp tree so a developer's real config cannot leak in.
    pub fn run(&self, args: &[&str]) -> TestResult {
        Command::new(env!("CARGO_BIN_EXE_refit"))
            .current_dir(self.root.path())
            .env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.root.path().join(".config"))
            .env_remove("REFIT_PROPERTIES")
            .env_remove("REFIT_JOBS")
            .args(args)
            .output()
            .expect("Failed to execute refit")
            .into()
    }
}

enum Seed {
    Package {
        name: String,
        deps: Vec<String>,
        source: &'static str,
    },
    RawManifest {
        name: String,
        body: String,
    },
    RootFile {
        relative: String,
        content: String,
    },
}

/// Accumulates the tree layout, then materializes it under a temp dir
#[derive(Default)]
pub struct TestEnvBuilder {
    seeds: Vec<Seed>,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry point declaring `esm5` and `fesm2015` with clean sources
    pub fn with_package(mut self, name: &str, deps: &[&str]) -> Self {
        self.seeds.push(Seed::Package {
            name: name.to_string(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            source: fixtures::ENTRY_SOURCE,
        });
        self
    }

    /// Add an entry point whose sources import a missing relative module,
    /// so its first transform fails
    pub fn with_broken_package(mut self, name: &str, deps: &[&str]) -> Self {
        self.seeds.push(Seed::Package {
            name: name.to_string(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            source: fixtures::BROKEN_SOURCE,
        });
        self
    }

    /// Add a package directory with a verbatim manifest body and no sources
    pub fn with_raw_manifest(mut self, name: &str, body: &str) -> Self {
        self.seeds.push(Seed::RawManifest {
            name: name.to_string(),
            body: body.to_string(),
        });
        self
    }

    /// Add a file relative to the tree root (e.g. `refit.toml`)
    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.seeds.push(Seed::RootFile {
            relative: relative.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn build(self) -> TestEnv {
        let root = TempDir::new().expect("Failed to create temp dir");
        let node_modules = root.path().join("node_modules");
        std::fs::create_dir_all(&node_modules).expect("Failed to create node_modules");

        for seed in self.seeds {
            match seed {
                Seed::Package { name, deps, source } => {
                    seed_package(&node_modules, &name, &deps, source);
                }
                Seed::RawManifest { name, body } => {
                    let dir = node_modules.join(&name);
                    std::fs::create_dir_all(&dir).expect("Failed to create package directory");
                    std::fs::write(dir.join("package.json"), body)
                        .expect("Failed to write manifest");
                }
                Seed::RootFile { relative, content } => {
                    let path = root.path().join(&relative);
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent).expect("Failed to create directories");
                    }
                    std::fs::write(&path, content).expect("Failed to write file");
                }
            }
        }

        TestEnv { root }
    }
}

fn seed_package(node_modules: &Path, name: &str, deps: &[String], source: &str) {
    let dir = node_modules.join(name);
    std::fs::create_dir_all(dir.join("esm5")).expect("Failed to create esm5 directory");
    std::fs::create_dir_all(dir.join("fesm2015")).expect("Failed to create fesm2015 directory");

    let deps_refs: Vec<&str> = deps.iter().map(|d| d.as_str()).collect();
    std::fs::write(
        dir.join("package.json"),
        fixtures::manifest_json(name, &deps_refs),
    )
    .expect("Failed to write manifest");
    std::fs::write(dir.join("esm5/index.js"), source).expect("Failed to write esm5 entry");
    std::fs::write(dir.join("fesm2015/index.js"), source)
        .expect("Failed to write fesm2015 entry");
}
