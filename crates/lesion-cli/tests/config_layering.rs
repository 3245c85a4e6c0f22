//! Integration tests for configuration layering.
//!
//! Tests the priority chain: hardcoded defaults < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_config(dir: &Path, content: &str) {
    fs::write(dir.join(".lesion-classify.toml"), content).unwrap();
}

fn cmd_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lesion-classify").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_project_config_sets_policy() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(
        temp_dir.path(),
        r"
[assess]
require = 'image'
",
    );

    cmd_in(temp_dir.path())
        .args(["assess", "--symptom", "itching"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please upload an image."));
}

#[test]
fn test_cli_overrides_project_policy() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(
        temp_dir.path(),
        r"
[assess]
require = 'image'
",
    );

    cmd_in(temp_dir.path())
        .args(["assess", "--require", "either", "--symptom", "itching"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Symptoms selected: Itching or irritation"));
}

#[test]
fn test_config_found_in_parent_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(
        temp_dir.path(),
        r"
[assess]
require = 'both'
",
    );
    let nested = temp_dir.path().join("patients").join("2024");
    fs::create_dir_all(&nested).unwrap();

    cmd_in(&nested)
        .arg("assess")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please select at least one symptom."));
}

#[test]
fn test_config_models_dir_used_for_lookup() {
    let temp_dir = tempfile::tempdir().unwrap();
    let models = temp_dir.path().join("weights");
    fs::create_dir(&models).unwrap();
    write_config(
        temp_dir.path(),
        &format!(
            "[models]\ndir = '{}'\nfile = 'custom_cnn.safetensors'\n",
            models.display()
        ),
    );

    cmd_in(temp_dir.path())
        .arg("predict")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("weights"))
        .stderr(predicate::str::contains("custom_cnn.safetensors"));
}

#[test]
fn test_cli_models_dir_overrides_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let cli_models = tempfile::tempdir().unwrap();
    write_config(temp_dir.path(), "[models]\ndir = '/nonexistent/config-models'\n");

    cmd_in(temp_dir.path())
        .args(["models", "path", "--models-dir"])
        .arg(cli_models.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("config-models").not());
}

#[test]
fn test_invalid_config_value_warns_and_is_ignored() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(
        temp_dir.path(),
        r"
[output]
format = 'xml'
",
    );

    cmd_in(temp_dir.path())
        .arg("symptoms")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: output.format"));
}

#[test]
fn test_malformed_config_warns_and_is_ignored() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path(), "[assess\nrequire = 'both'\n");

    cmd_in(temp_dir.path())
        .args(["assess", "--symptom", "itching"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: ignoring config file"));
}

#[test]
fn test_config_model_file_shared_by_models_and_predict() {
    let temp_dir = tempfile::tempdir().unwrap();
    let models = temp_dir.path().join("m");
    let images = temp_dir.path().join("images");
    fs::create_dir(&models).unwrap();
    fs::create_dir(&images).unwrap();
    write_config(
        temp_dir.path(),
        &format!(
            "[models]\ndir = '{}'\nfile = 'custom.safetensors'\n",
            models.display()
        ),
    );
    // Weights under the default name do not satisfy a custom `models.file`.
    fs::write(models.join("lesion_cnn.safetensors"), b"placeholder").unwrap();

    cmd_in(temp_dir.path())
        .args(["models", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ lesion_cnn (custom.safetensors)"))
        .stdout(predicate::str::contains("0/1 models installed"));
    cmd_in(temp_dir.path())
        .arg("predict")
        .arg(&images)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("custom.safetensors"));

    fs::write(models.join("custom.safetensors"), b"placeholder").unwrap();

    cmd_in(temp_dir.path())
        .args(["models", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ lesion_cnn (custom.safetensors)"))
        .stdout(predicate::str::contains("1/1 models installed"));
    cmd_in(temp_dir.path())
        .arg("predict")
        .arg(&images)
        .assert()
        .success();
}

#[test]
fn test_models_fetch_keeps_configured_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let models = temp_dir.path().join("m");
    fs::create_dir(&models).unwrap();
    write_config(
        temp_dir.path(),
        &format!(
            "[models]\ndir = '{}'\nfile = 'custom.safetensors'\nurl = 'http://127.0.0.1:9/unreachable'\n",
            models.display()
        ),
    );
    fs::write(models.join("custom.safetensors"), b"placeholder").unwrap();

    // Already installed under the configured name, so nothing is downloaded.
    cmd_in(temp_dir.path())
        .args(["models", "fetch"])
        .assert()
        .success();
    assert!(!models.join("lesion_cnn.safetensors").exists());
}
