use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_fcx")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("target")
                .join("debug")
                .join(if cfg!(windows) { "fcx.exe" } else { "fcx" })
        })
}

fn run_cmd(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env_remove("FIGMA_API_KEY")
        .env_remove("FIGMA_TOKEN")
        .env_remove("FIGMA_OAUTH_TOKEN")
        .output()
        .expect("run fcx command")
}

#[test]
fn fetch_without_credentials_exits_fatally_with_hint() {
    let output = run_cmd(&["fetch", "AbC123"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("FIGMA_API_KEY"),
        "expected credential hint, got: {stderr}"
    );
}

#[test]
fn fetch_with_invalid_figma_url_exits_fatally() {
    let output = run_cmd(&[
        "--api-key",
        "test-token",
        "fetch",
        "https://www.figma.com/files/recent",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.to_ascii_lowercase().contains("file key"),
        "expected file-key error, got: {stderr}"
    );
}

#[test]
fn invalid_config_file_exits_fatally() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("fcx.toml");
    std::fs::write(&config, "output_format = \"xml\"\n").expect("write config");

    let output = run_cmd(&[
        "--api-key",
        "test-token",
        "--config",
        config.to_str().unwrap(),
        "fetch",
        "AbC123",
    ]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn help_lists_all_subcommands() {
    let output = run_cmd(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["fetch", "analyze", "images"] {
        assert!(
            stdout.contains(subcommand),
            "help should mention {subcommand}"
        );
    }
}
