//! Integration tests for the `ohx-script` binary

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Helper function to get the path to the ohx-script binary
fn ohx_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ohx-script"))
}

/// Helper function to create a config file
fn create_config(
    dir: &TempDir,
    content: &str,
) -> PathBuf {
    let path = dir.path().join("ohx-script.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_run_prints_console_and_report() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_config(
        &temp_dir,
        r#"
[script]
a_string = "from config"
delay_ms = 10
"#,
    );

    let output = Command::new(ohx_bin())
        .arg("--config")
        .arg(&config)
        .arg("run")
        .output()
        .expect("Failed to execute ohx-script");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "get_url:  get_url 17",
            "hello friend",
            "notifyOnThingStatesChange notifyOnThingStatesChange thing_id false",
            "Hello World from config",
            "timeout",
            "bfalse,ffalse,ifalse,strue,timeout",
        ]
    );
}

#[test]
fn test_cli_flags_override_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_config(&temp_dir, "[script]\ndelay_ms = 5000\n");

    let output = Command::new(ohx_bin())
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg("--delay-ms")
        .arg("1")
        .arg("--a-string")
        .arg("flag")
        .output()
        .expect("Failed to execute ohx-script");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Hello World flag"));
}

#[test]
fn test_verbose_after_subcommand() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_config(&temp_dir, "[script]\ndelay_ms = 1\n");

    let output = Command::new(ohx_bin())
        .arg("run")
        .arg("-v")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute ohx-script");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OHX script host version"), "stderr: {}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.ends_with("bfalse,ffalse,ifalse,strue,timeout\n"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = Command::new(ohx_bin())
        .arg("--config")
        .arg(temp_dir.path().join("nope.toml"))
        .arg("run")
        .output()
        .expect("Failed to execute ohx-script");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {}", stderr);
}

#[test]
fn test_functions_lists_globals() {
    let output = Command::new(ohx_bin())
        .arg("functions")
        .env_remove("OHX_SCRIPT_CONFIG")
        .current_dir(std::env::temp_dir())
        .output()
        .expect("Failed to execute ohx-script");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("get_url (arity 1)"));
    assert!(stdout.contains("notifyOnThingStatesChange (arity 2)"));
    assert_eq!(stdout.lines().count(), 13);
}
