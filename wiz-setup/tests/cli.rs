//! CLI integration tests for wiz-setup

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to escape path for TOML on Windows
fn escape_path_for_toml(path: &str) -> String {
    path.replace('\\', "\\\\")
}

/// Returns the temp dir, config path and archive path
fn setup_test_env() -> (TempDir, String, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let data_dir = temp_dir.path().join("data");

    fs::write(
        &config_path,
        format!(
            "[storage]\npath = \"{}\"\n",
            escape_path_for_toml(&data_dir.to_string_lossy())
        ),
    )
    .unwrap();

    (
        temp_dir,
        config_path.to_string_lossy().to_string(),
        data_dir.join("blog-wizard-data.json"),
    )
}

fn wiz_setup(config_path: &str) -> Command {
    let mut cmd = Command::cargo_bin("wiz-setup").unwrap();
    cmd.env("BLOGWIZ_CONFIG", config_path);
    cmd
}

fn stored_settings(data_file: &PathBuf) -> serde_json::Value {
    let archive: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_file).unwrap()).unwrap();
    archive["settings"].clone()
}

#[test]
fn test_no_flags_shows_defaults() {
    let (_temp_dir, config_path, data_file) = setup_test_env();

    wiz_setup(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("autosave:   on (every 3000 ms)"))
        .stdout(predicate::str::contains("Ctrl+S"))
        .stdout(predicate::str::contains("tistory  incomplete (missing: accessToken, blogName)"))
        .stdout(predicate::str::contains("custom   ready"));

    assert!(!data_file.exists());
}

#[test]
fn test_credentials_are_stored() {
    let (_temp_dir, config_path, data_file) = setup_test_env();

    wiz_setup(&config_path)
        .args([
            "--naver-client-id",
            "id",
            "--naver-client-secret",
            "supersecret",
            "--naver-blog-id",
            "blog",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings updated"));

    let settings = stored_settings(&data_file);
    assert_eq!(settings["platforms"]["naver"]["clientId"], "id");
    assert_eq!(settings["platforms"]["naver"]["clientSecret"], "supersecret");
    assert_eq!(settings["platforms"]["naver"]["blogId"], "blog");
}

#[test]
fn test_show_masks_secrets() {
    let (_temp_dir, config_path, _data_file) = setup_test_env();

    wiz_setup(&config_path)
        .args(["--tistory-access-token", "abcdefgh", "--tistory-blog-name", "myblog", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd****"))
        .stdout(predicate::str::contains("abcdefgh").not())
        .stdout(predicate::str::contains("tistory  ready"));
}

#[test]
fn test_show_json() {
    let (_temp_dir, config_path, _data_file) = setup_test_env();

    let output = wiz_setup(&config_path)
        .args(["--naver-client-secret", "xyz", "--show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json_start = stdout.find('{').unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    assert_eq!(report["settings"]["platforms"]["naver"]["clientSecret"], "****");
    assert_eq!(report["defaultPlatform"], "custom");
    assert_eq!(report["status"][1]["platform"], "naver");
    assert_eq!(report["status"][1]["missing"], serde_json::json!(["clientId", "blogId"]));
}

#[test]
fn test_editor_preferences() {
    let (_temp_dir, config_path, data_file) = setup_test_env();

    wiz_setup(&config_path)
        .args([
            "--autosave",
            "off",
            "--autosave-interval",
            "10000",
            "--theme",
            "dark",
            "--font-size",
            "16",
            "--shortcut-save",
            "Cmd+S",
        ])
        .assert()
        .success();

    let settings = stored_settings(&data_file);
    assert_eq!(settings["editor"]["autoSave"], false);
    assert_eq!(settings["editor"]["autoSaveInterval"], 10000);
    assert_eq!(settings["editor"]["theme"], "dark");
    assert_eq!(settings["editor"]["fontSize"], 16);
    assert_eq!(settings["shortcuts"]["save"], "Cmd+S");
    assert_eq!(settings["shortcuts"]["publish"], "Ctrl+Enter");
}

#[test]
fn test_zero_interval_is_invalid_input() {
    let (_temp_dir, config_path, data_file) = setup_test_env();

    wiz_setup(&config_path)
        .args(["--autosave-interval", "0"])
        .assert()
        .failure()
        .code(3);

    assert!(!data_file.exists());
}

#[test]
fn test_default_platform_goes_to_config_file() {
    let (_temp_dir, config_path, _data_file) = setup_test_env();

    wiz_setup(&config_path)
        .args(["--default-platform", "naver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved configuration"));

    let raw = fs::read_to_string(&config_path).unwrap();
    assert!(raw.contains("[defaults]"));
    assert!(raw.contains("platform = \"naver\""));
}

#[test]
fn test_unknown_theme_rejected_by_parser() {
    let (_temp_dir, config_path, _data_file) = setup_test_env();

    wiz_setup(&config_path)
        .args(["--theme", "sepia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid theme"));
}
