//! CLI tests for `refit clean`.

mod common;

use common::TestEnv;

#[test]
fn test_clean_removes_markers() {
    let env = TestEnv::builder()
        .with_package("core", &[])
        .with_package("app", &["core"])
        .build();
    assert!(env.run(&["compile"]).is_success());
    assert!(env.marker("core").is_some());

    let result = env.run(&["clean"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    assert!(result.stdout.contains("🧹 Refit Clean"));
    assert!(result.stdout.contains("✓ Markers removed: 2"));
    assert!(result.stdout.contains("- core"));
    assert!(result.stdout.contains("- app"));

    assert!(env.marker("core").is_none());
    assert!(env.marker("app").is_none());
    // Manifests keep everything else
    assert_eq!(env.manifest("core")["esm5"], "esm5/index.js");
}

#[test]
fn test_clean_then_compile_redoes_the_work() {
    let env = TestEnv::builder().with_package("lib", &[]).build();
    assert!(env.run(&["compile"]).is_success());
    assert!(env.run(&["clean"]).is_success());

    let result = env.run(&["compile"]);

    assert!(result.is_success());
    assert!(result.stdout.contains("✓ Compiled: 1"));
    assert!(env.marker("lib").is_some());
}

#[test]
fn test_clean_without_markers_is_a_noop() {
    let env = TestEnv::builder().with_package("lib", &[]).build();

    let result = env.run(&["clean"]);

    assert!(result.is_success());
    assert!(result.stdout.contains("= Already clean: 1"));
    assert!(!result.stdout.contains("Markers removed"));
}

#[test]
fn test_clean_json_reports_counts() {
    let env = TestEnv::builder()
        .with_package("core", &[])
        .with_package("app", &["core"])
        .build();
    assert!(env.run(&["compile"]).is_success());

    let result = env.run(&["clean", "--json"]);

    assert!(result.is_success());
    let lines = result.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["event"], "complete");
    assert_eq!(lines[0]["command"], "clean");
    assert_eq!(lines[0]["cleaned"], 2);
    assert_eq!(lines[0]["unmarked"], 0);
}
