//! Integration tests for circuit-fill CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BOARD_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"
     width="300" height="200" viewBox="0 0 300 200">
  <rect id="board" x="10" y="10" width="280" height="180"/>
</svg>
"#;

const EMPTY_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"
     width="100" height="100" viewBox="0 0 100 100"></svg>
"#;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_circuit-fill"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command")
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn defaults_prints_yaml() {
    let output = run(&["defaults"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("density: 20"), "got: {stdout}");
    assert!(stdout.contains("style: organic"));
    assert!(stdout.contains("#00d084"));
}

#[test]
fn fill_writes_svg_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let region = write_file(dir.path(), "board.svg", BOARD_SVG);

    let output = run(&["fill", region.to_str().unwrap(), "--seed", "7"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<?xml"), "Should have XML declaration");
    assert!(stdout.contains("viewBox=\"0 0 300.00 200.00\""));
    assert!(stdout.contains("<circle"), "Should have pads");
    assert!(stdout.contains("</svg>"), "Should close SVG element");
}

#[test]
fn fill_is_reproducible_with_a_seed() {
    let dir = tempfile::tempdir().unwrap();
    let region = write_file(dir.path(), "board.svg", BOARD_SVG);
    let a = dir.path().join("a.svg");
    let b = dir.path().join("b.svg");

    for out in [&a, &b] {
        let args = ["fill", region.to_str().unwrap(), "--seed", "42", "-o", out.to_str().unwrap()];
        let output = run(&args);
        assert!(output.status.success());
    }

    assert_eq!(fs::read_to_string(&a).unwrap(), fs::read_to_string(&b).unwrap());
}

#[test]
fn fill_json_output_has_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let region = write_file(dir.path(), "board.svg", BOARD_SVG);

    let region = region.to_str().unwrap();
    let output = run(&["fill", region, "--seed", "3", "--json", "--style", "grid"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["width"], 300.0);
    assert_eq!(json["pattern"]["seed"], 3);
    assert_eq!(json["options"]["style"], "grid");
    assert!(json["pattern"]["segments"].as_array().is_some_and(|s| !s.is_empty()));
    assert!(json["generated_at"].is_string());
}

#[test]
fn config_file_and_flags_combine() {
    let dir = tempfile::tempdir().unwrap();
    let region = write_file(dir.path(), "board.svg", BOARD_SVG);
    let config = write_file(
        dir.path(),
        "circuit.yaml",
        "density: 25\nlineColor: '#ff8800'\ngradient_type: linear\n",
    );

    let output = run(&[
        "fill",
        region.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--seed",
        "11",
        "--background",
        "black",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<linearGradient"));
    assert!(stdout.contains("stop-color=\"#ff8800\""));
    assert!(stdout.contains("fill=\"black\""));
}

#[test]
fn png_output_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let region = write_file(dir.path(), "board.svg", BOARD_SVG);
    let png = dir.path().join("board.png");

    let output = run(&[
        "fill",
        region.to_str().unwrap(),
        "--seed",
        "5",
        "-o",
        dir.path().join("board-out.svg").to_str().unwrap(),
        "--png",
        png.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let img = image::open(&png).expect("readable PNG");
    assert_eq!((img.width(), img.height()), (300, 200));
}

#[test]
fn bitmap_mask_region_works() {
    let dir = tempfile::tempdir().unwrap();
    let mask_path = dir.path().join("mask.png");
    image::RgbaImage::from_pixel(200, 120, image::Rgba([0, 0, 0, 255]))
        .save(&mask_path)
        .unwrap();

    let output = run(&["fill", mask_path.to_str().unwrap(), "--seed", "1"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("viewBox=\"0 0 200.00 120.00\""));
}

#[test]
fn empty_bitmap_reports_no_region() {
    let dir = tempfile::tempdir().unwrap();
    let mask_path = dir.path().join("blank.png");
    image::RgbaImage::from_pixel(50, 50, image::Rgba([255, 255, 255, 255]))
        .save(&mask_path)
        .unwrap();

    let output = run(&["fill", mask_path.to_str().unwrap(), "--seed", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no usable area"), "stderr: {stderr}");
}

#[test]
fn svg_without_shapes_fails() {
    let dir = tempfile::tempdir().unwrap();
    let region = write_file(dir.path(), "empty.svg", EMPTY_SVG);

    let output = run(&["fill", region.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no closed shapes"));
}

#[test]
fn invalid_density_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let region = write_file(dir.path(), "board.svg", BOARD_SVG);

    let output = run(&["fill", region.to_str().unwrap(), "--density", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("density"));
}

#[test]
fn unknown_style_is_a_usage_error() {
    let output = run(&["fill", "whatever.svg", "--style", "hex"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown style"));
}
