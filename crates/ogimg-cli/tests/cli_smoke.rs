//! CLI Smoke Tests
//!
//! Runs the built `ogimg` binary against temporary directories. The font
//! stylesheet points at a closed local port so no test reaches the network;
//! that exercises both failure policies.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const DEAD_FONT_URL: &str = "http://127.0.0.1:9/css2?family=Noto+Sans+KR:wght@700";

fn ogimg(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ogimg"))
        .args(args)
        .args(["--font-css-url", DEAD_FONT_URL, "--font-timeout-secs", "5"])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute ogimg")
}

fn png_size(path: &Path) -> (u32, u32) {
    let image = image::open(path).expect("output should decode as PNG");
    (image.width(), image.height())
}

#[test]
fn test_help_lists_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_ogimg"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["assets", "render", "posts"] {
        assert!(stdout.contains(command), "help should mention {command}");
    }
}

#[test]
fn test_assets_fall_back_without_font() {
    let dir = tempfile::tempdir().unwrap();
    let public = dir.path().join("public");

    let output = ogimg(&["assets", "--public-dir", public.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "assets should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(png_size(&public.join("og-default.png")), (1200, 630));
    assert_eq!(png_size(&public.join("favicon-16x16.png")), (16, 16));
    assert_eq!(png_size(&public.join("favicon-32x32.png")), (32, 32));
    assert_eq!(png_size(&public.join("apple-touch-icon.png")), (180, 180));
}

#[test]
fn test_assets_abort_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let public = dir.path().join("public");

    let output = ogimg(&[
        "assets",
        "--public-dir",
        public.to_str().unwrap(),
        "--on-font-failure",
        "abort",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
    assert!(!public.join("og-default.png").exists());
}

#[test]
fn test_render_aborts_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("card.png");

    let output = ogimg(&["render", "--title", "Hello", "-o", out.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr was: {stderr}");
    assert!(!out.exists());
}

#[test]
fn test_render_with_fallback_writes_card() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cards/hello.png");

    let output = ogimg(&[
        "render",
        "--title",
        "Hello",
        "--description",
        "World",
        "--category",
        "Rust",
        "-o",
        out.to_str().unwrap(),
        "--on-font-failure",
        "fallback",
        "--quiet",
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "--quiet should print nothing");
    assert_eq!(png_size(&out), (1200, 630));
}

#[test]
fn test_posts_render_one_card_per_post() {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("content");
    let out = dir.path().join("og");
    fs::create_dir_all(content.join("series")).unwrap();
    fs::write(
        content.join("hello.md"),
        "---\ntitle: Hello\ndescription: First post\ncategory: Rust\n---\nBody\n",
    )
    .unwrap();
    fs::write(
        content.join("series/part-1.mdx"),
        "---\ntitle: 연재 1편\ndescription: Part one\n---\n",
    )
    .unwrap();

    let output = ogimg(&[
        "posts",
        "--content-dir",
        content.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--on-font-failure",
        "fallback",
        "--concurrency",
        "2",
    ]);

    assert!(
        output.status.success(),
        "posts should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(png_size(&out.join("hello.png")), (1200, 630));
    assert_eq!(png_size(&out.join("series/part-1.png")), (1200, 630));
}

#[test]
fn test_unknown_policy_is_a_usage_error() {
    let output = ogimg(&["assets", "--on-font-failure", "retry"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("retry"));
}
