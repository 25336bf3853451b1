//! CLI integration tests for `gridpaint inspect` and `gridpaint palettes`

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn gridpaint(dir: &Path, args: &[&str]) -> Output {
    let config_path = dir.join("gridpaint.toml");
    let config = format!("[registry]\nfile = {:?}\n", fixture("palettes.json").display().to_string());
    fs::write(&config_path, config).expect("should write config");

    Command::new(env!("CARGO_BIN_EXE_gridpaint"))
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute gridpaint")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_inspect_reports_bounds_and_grid() {
    let temp = TempDir::new().unwrap();
    let scene = fixture("valid/heart.tscn");
    let output = gridpaint(temp.path(), &["inspect", scene.to_str().unwrap()]);
    assert!(output.status.success(), "inspect failed: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["name"], "heart.tscn");
    assert_eq!(report["palette"], "canvas_colors");
    assert_eq!(report["palette_registered"], true);
    assert_eq!(report["cells"], 4);
    assert_eq!(report["bounds"]["min_x"], -1);
    assert_eq!(report["normalized_bounds"]["min_x"], 0);
    assert_eq!(report["grid"], serde_json::json!({ "width": 3, "height": 2 }));
    assert!(report.get("fills").is_none());
}

#[test]
fn test_inspect_fills_use_css_colors() {
    let temp = TempDir::new().unwrap();
    let scene = fixture("valid/heart.tscn");
    let output = gridpaint(temp.path(), &["inspect", scene.to_str().unwrap(), "--fills", "--scale", "2"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let fills = report["fills"].as_array().unwrap();
    assert_eq!(fills.len(), 4);
    assert_eq!(fills[3], serde_json::json!({ "x": 2, "y": 0, "size": 2, "color": "rgb(0 255 0 / 0.50)" }));
}

#[test]
fn test_inspect_missing_cells_fails() {
    let temp = TempDir::new().unwrap();
    let scene = fixture("invalid/no_cells.tscn");
    let output = gridpaint(temp.path(), &["inspect", scene.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_palettes_list_includes_registry_and_builtins() {
    let temp = TempDir::new().unwrap();
    let output = gridpaint(temp.path(), &["palettes", "list"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("canvas_colors (8 colors)"), "stdout: {}", text);
    assert!(text.contains("gameboy (4 colors)"), "stdout: {}", text);
}

#[test]
fn test_palettes_show_prints_hex() {
    let temp = TempDir::new().unwrap();
    let output = gridpaint(temp.path(), &["palettes", "show", "canvas_colors"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Palette: canvas_colors"));
    assert!(text.contains("  2 => #00FF0080"), "stdout: {}", text);
}

#[test]
fn test_palettes_show_unknown_suggests() {
    let temp = TempDir::new().unwrap();
    let output = gridpaint(temp.path(), &["palettes", "show", "gamebo"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Did you mean 'gameboy'?"));
}
