//! CLI tests for exclusion, failure isolation, and fatal errors.

mod common;

use common::TestEnv;

#[test]
fn test_failed_entry_point_skips_dependents_only() {
    let env = TestEnv::builder()
        .with_broken_package("broken", &[])
        .with_package("mid", &["broken"])
        .with_package("leaf", &["mid"])
        .with_package("solo", &[])
        .build();

    let result = env.run(&["compile"]);

    assert_eq!(result.exit_code, 1, "failures must fail the run");
    assert!(result.stdout.contains("✗ broken:"));
    assert!(result.stdout.contains("unresolved import './missing'"));
    assert!(result.stdout.contains("⚠ mid skipped (dependency broken failed)"));
    assert!(result.stdout.contains("⚠ leaf skipped (dependency mid failed)"));
    assert!(result.stdout.contains("✓ Compiled: 1"));
    assert!(result.stdout.contains("✗ Failed: 1"));
    assert!(result.stdout.contains("⚠ Skipped: 2"));

    assert!(env.marker("solo").is_some(), "independent work still lands");
    for name in ["broken", "mid", "leaf"] {
        assert!(env.marker(name).is_none(), "{name} must carry no marker");
    }
}

#[test]
fn test_failed_compile_reports_partial_status_in_json() {
    let env = TestEnv::builder()
        .with_broken_package("broken", &[])
        .with_package("solo", &[])
        .build();

    let result = env.run(&["compile", "--json"]);

    assert_eq!(result.exit_code, 1);
    let lines = result.json_lines();
    let last = &lines[lines.len() - 1];
    assert_eq!(last["event"], "complete");
    assert_eq!(last["status"], "partial");
    assert_eq!(last["failed"], 1);
    assert!(lines.iter().any(|l| l["event"] == "item_error"));
}

#[test]
fn test_malformed_manifest_is_excluded_not_fatal() {
    let env = TestEnv::builder()
        .with_package("fine", &[])
        .with_raw_manifest("mangled", "{ not json")
        .build();

    let result = env.run(&["compile"]);

    assert!(
        result.is_success(),
        "exclusions alone must not fail the run:\n{}",
        result.combined_output()
    );
    assert!(result.stdout.contains("✓ Found 1 entry points (1 excluded)"));
    assert!(result.stdout.contains("⚠ Excluded"));
    assert!(result.stdout.contains("malformed manifest"));
    assert!(env.marker("fine").is_some());
}

#[test]
fn test_dangling_format_property_is_excluded() {
    let env = TestEnv::builder()
        .with_package("fine", &[])
        .with_raw_manifest(
            "dangling",
            r#"{ "name": "dangling", "esm5": "missing/index.js" }"#,
        )
        .build();

    let result = env.run(&["compile"]);

    assert!(result.is_success());
    assert!(result.stdout.contains("does not resolve to a file"));
    assert!(env.marker("fine").is_some());
}

#[test]
fn test_dependency_cycle_aborts_the_run() {
    let env = TestEnv::builder()
        .with_package("ping", &["pong"])
        .with_package("pong", &["ping"])
        .build();

    let result = env.run(&["compile"]);

    assert_eq!(result.exit_code, 1);
    assert!(
        result.stderr.contains("cyclic dependency"),
        "stderr:\n{}",
        result.stderr
    );
    assert!(env.marker("ping").is_none());
    assert!(env.marker("pong").is_none());
}

#[test]
fn test_unknown_target_is_fatal() {
    let env = TestEnv::builder().with_package("lib", &[]).build();

    let result = env.run(&["compile", "--target", "node_modules/nope"]);

    assert_eq!(result.exit_code, 1);
    assert!(
        result.stderr.contains("target entry point not found"),
        "stderr:\n{}",
        result.stderr
    );
    assert!(env.marker("lib").is_none());
}

#[test]
fn test_missing_source_directory_fails() {
    let env = TestEnv::builder().build();

    let result = env.run(&["compile", "--source", "no_such_dir"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("Error"));
}

#[test]
fn test_concurrent_run_is_refused_while_locked() {
    let env = TestEnv::builder().with_package("lib", &[]).build();

    let _held = refit::infrastructure::lock::RunLock::acquire(&env.source())
        .expect("test process should acquire the lock first");

    let result = env.run(&["compile"]);

    assert_eq!(result.exit_code, 1);
    assert!(
        result.stderr.contains("locked by another refit process"),
        "stderr:\n{}",
        result.stderr
    );
    assert!(env.marker("lib").is_none());
}

#[test]
fn test_unknown_config_key_warns_with_suggestion() {
    let env = TestEnv::builder()
        .with_package("lib", &[])
        .with_file("custom.toml", "[compile]\nproprties = [\"esm5\"]\n")
        .build();

    let result = env.run(&["compile", "--config", "custom.toml"]);

    assert!(result.is_success(), "unknown keys warn, they do not fail");
    assert!(result.stdout.contains("⚠ Unknown config key 'proprties'"));
    assert!(result.stdout.contains("did you mean 'properties'"));
    // The typo key is ignored, so both formats compile
    assert!(env.marker("lib").unwrap().get("fesm2015").is_some());
}

#[test]
fn test_invalid_config_file_is_fatal() {
    let env = TestEnv::builder()
        .with_package("lib", &[])
        .with_file("custom.toml", "[compile\njobs = 2\n")
        .build();

    let result = env.run(&["compile", "--config", "custom.toml"]);

    assert_eq!(result.exit_code, 1);
    assert!(
        result.stderr.contains("invalid configuration"),
        "stderr:\n{}",
        result.stderr
    );
    assert!(env.marker("lib").is_none());
}
