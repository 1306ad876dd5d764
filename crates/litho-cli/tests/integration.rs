//! Integration tests for litho CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::path::PathBuf;
use std::process::Command;

/// Path to the litho binary built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_litho"))
}

/// Get the path to a file under test_assets/.
fn asset_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // Go up from litho-cli to crates
    path.pop(); // Go up from crates to repo root
    path.push("test_assets");
    path.push(name);
    path
}

/// A scratch file path unique to this process and test.
fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("litho-{}-{}", std::process::id(), name))
}

#[test]
fn rocks_command_lists_all_rocks() {
    let output = Command::new(binary_path())
        .arg("rocks")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("peat"), "Should list peat");
    assert!(stdout.contains("торф"), "Should list survey names");
    assert!(stdout.contains("granodiorite"), "Should list granodiorite");
    assert!(stdout.contains("vertical lines"), "Should describe line fills");

    // Header plus one line per rock
    let line_count = stdout.lines().count();
    assert_eq!(line_count, 25, "Should list 24 rocks, got {}", line_count - 1);
}

#[test]
fn rocks_command_json() {
    let output = Command::new(binary_path())
        .args(["rocks", "--json"])
        .output()
        .expect("Failed to execute command");

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should be valid JSON");
    let rocks = json.as_array().expect("Should be an array");
    assert_eq!(rocks.len(), 24);
    assert_eq!(rocks[0]["name"], "peat");
    assert_eq!(rocks[0]["survey_name"], "торф");
}

#[test]
fn section_command_produces_svg() {
    let output = Command::new(binary_path())
        .args(["section", asset_path("profile.yaml").to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("<?xml"), "Should have XML declaration");
    assert!(stdout.contains("<svg"), "Should have SVG element");
    assert!(stdout.contains("width=\"260mm\""), "Should size the page in mm");
    assert!(stdout.contains("<polyline"), "Should have hatching");
    assert!(stdout.contains("Profile 7"), "Should draw the title");
    assert!(stdout.contains("</svg>"), "Should close SVG element");
}

#[test]
fn section_command_produces_json_report() {
    let output = Command::new(binary_path())
        .args(["section", asset_path("profile.yaml").to_str().unwrap(), "-f", "json"])
        .output()
        .expect("Failed to execute command");

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should be valid JSON");

    let layers = json["report"]["layers"].as_array().unwrap();
    let names: Vec<&str> = layers.iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(names, ["soil", "alluvium", "lens", "basement"]);
    for layer in layers {
        assert!(layer["drawn"].as_u64().unwrap() > 0, "{} drew nothing", layer["id"]);
    }

    let primitives = json["primitives"].as_array().unwrap();
    assert!(primitives.iter().any(|p| p["kind"] == "table"), "Should draw the legend");
}

#[test]
fn section_command_writes_file_by_extension() {
    let out = scratch_path("profile.json");
    let output = Command::new(binary_path())
        .args([
            "section",
            asset_path("profile.yaml").to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "Nothing should go to stdout");

    let content = std::fs::read_to_string(&out).expect("Output file should exist");
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["report"]["name"], "Profile 7");
    let _ = std::fs::remove_file(&out);
}

#[test]
fn section_command_renders_png() {
    let out = scratch_path("profile.png");
    let output = Command::new(binary_path())
        .args([
            "section",
            asset_path("profile.yaml").to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--png-scale",
            "2",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let bytes = std::fs::read(&out).expect("PNG should exist");
    assert_eq!(&bytes[1..4], b"PNG");
    let _ = std::fs::remove_file(&out);
}

#[test]
fn png_without_output_file_fails() {
    let output = Command::new(binary_path())
        .args(["section", asset_path("profile.yaml").to_str().unwrap(), "-f", "png"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--output"));
}

#[test]
fn unknown_rock_is_not_fatal() {
    let section = scratch_path("unknown.yaml");
    std::fs::write(
        &section,
        r#"
page: { width: 100, height: 100 }
unit: { width: 100, height: 100 }
layers:
  - name: mystery
    rock: obsidian
    polygon: [[0, 80], [100, 80], [100, 100], [0, 100]]
"#,
    )
    .unwrap();

    let output = Command::new(binary_path())
        .args(["section", section.to_str().unwrap(), "-f", "json"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("obsidian"), "Should warn about the rock");

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["layers"][0]["drawn"], 0);
    let _ = std::fs::remove_file(&section);
}

#[test]
fn missing_section_file_fails() {
    let output = Command::new(binary_path())
        .args(["section", "does/not/exist.yaml"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn fill_command_hatches_annotated_layers() {
    let output = Command::new(binary_path())
        .args(["fill", asset_path("layers.svg").to_str().unwrap(), "-f", "json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should be valid JSON");

    assert_eq!(json["width_mm"], 100.0);
    let layers = json["report"]["layers"].as_array().unwrap();
    let ids: Vec<&str> = layers.iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["peat", "sand", "granite"]);
    assert_eq!(layers[1]["rock"], "песок");
    for layer in layers {
        assert!(layer["drawn"].as_u64().unwrap() > 0);
    }

    // data-color="#ff8000" snaps to orange.
    let primitives = json["primitives"].as_array().unwrap();
    assert!(primitives.iter().any(|p| p["style"]["color"] == "orange"));
}

#[test]
fn fill_command_reads_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let svg = std::fs::read_to_string(asset_path("layers.svg")).unwrap();
    let mut child = Command::new(binary_path())
        .args(["fill", "-", "--outline"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child.stdin.take().unwrap().write_all(svg.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<svg"));
    assert!(stdout.contains("viewBox=\"0 0 100 60\""));
}

#[test]
fn fill_command_rejects_unannotated_svg() {
    let svg = scratch_path("plain.svg");
    std::fs::write(
        &svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="5" height="5"/></svg>"#,
    )
    .unwrap();

    let output = Command::new(binary_path())
        .args(["fill", svg.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no layer polygons"));
    let _ = std::fs::remove_file(&svg);
}

#[test]
fn fill_command_skips_motifs_at_vanishing_scale() {
    let output = Command::new(binary_path())
        .args(["fill", asset_path("layers.svg").to_str().unwrap(), "-f", "json", "--scale", "1e-18"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not usable"));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let layers = json["report"]["layers"].as_array().unwrap();
    assert_eq!(layers[1]["id"], "sand");
    assert_eq!(layers[1]["drawn"], 0);
}
