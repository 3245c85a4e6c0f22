//! Batch output tests.
//!
//! A full-size classifier is too large to build in a test, so these runs use
//! inputs that never reach the forward pass: empty directories, undecodable
//! files, and a weights file that fails to load.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lesion_test_support::SyntheticImageBuilder;
use predicates::prelude::*;

/// A models directory holding a placeholder weights file.
fn placeholder_models() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lesion_cnn.safetensors");
    fs::write(&path, b"placeholder").unwrap();
    (dir, path)
}

fn predict(model: &Path, images: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lesion-classify").unwrap();
    cmd.arg("predict").arg("--model").arg(model).arg(images);
    cmd
}

#[test]
fn test_empty_directory_text() {
    let (_models, model) = placeholder_models();
    let images = tempfile::tempdir().unwrap();

    predict(&model, images.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_empty_directory_json_is_empty_array() {
    let (_models, model) = placeholder_models();
    let images = tempfile::tempdir().unwrap();

    predict(&model, images.path())
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_empty_directory_jsonl() {
    let (_models, model) = placeholder_models();
    let images = tempfile::tempdir().unwrap();

    predict(&model, images.path())
        .args(["--format", "jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_non_image_files_are_ignored() {
    let (_models, model) = placeholder_models();
    let images = tempfile::tempdir().unwrap();
    fs::write(images.path().join("notes.txt"), "follow-up in 3 months").unwrap();

    predict(&model, images.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping").not());
}

#[test]
fn test_undecodable_file_is_skipped() {
    let (_models, model) = placeholder_models();
    let images = tempfile::tempdir().unwrap();
    fs::write(images.path().join("broken.jpg"), b"not a jpeg").unwrap();

    predict(&model, images.path())
        .args(["--format", "json", "--quiet"])
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("WARN: Skipping"))
        .stderr(predicate::str::contains("broken.jpg"));
}

#[test]
fn test_unloadable_model_aborts_batch() {
    let (_models, model) = placeholder_models();
    let images = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::lesion(32, 32)
        .image
        .save(images.path().join("nevus_01.png"))
        .unwrap();
    SyntheticImageBuilder::black_rgb(32, 32)
        .image
        .save(images.path().join("nevus_02.png"))
        .unwrap();

    predict(&model, images.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Testing on").not())
        .stderr(predicate::str::contains("model unavailable"));
}

#[test]
fn test_config_format_applies_to_default_command() {
    let (_models, model) = placeholder_models();
    let images = tempfile::tempdir().unwrap();
    fs::write(
        images.path().join(".lesion-classify.toml"),
        "[output]\nformat = 'json'\npretty = true\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("lesion-classify").unwrap();
    cmd.current_dir(images.path())
        .arg("--model")
        .arg(&model)
        .arg(".")
        .assert()
        .success()
        .stdout("[]\n");
}
