//! Tests for the command line, run against the built binary.

use std::process::{Command, Output};

use ccswitch::cli::{Cli, Command as CliCommand};
use clap::Parser;
use tempfile::TempDir;

fn ccswitch_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ccswitch"));
    cmd.env("CCSWITCH_CONFIG_DIR", config_dir.path())
        .env_remove("CCSWITCH_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn run(config_dir: &TempDir, args: &[&str]) -> Output {
    ccswitch_cmd(config_dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn parses_management_subcommands() {
    let cli = Cli::try_parse_from(["ccswitch", "use", "2"]).unwrap();
    assert_eq!(cli.command, Some(CliCommand::Use { index: 2 }));

    let cli = Cli::try_parse_from(["ccswitch", "remove", "0"]).unwrap();
    assert_eq!(cli.command, Some(CliCommand::Remove { index: 0 }));

    let cli = Cli::try_parse_from(["ccswitch", "path"]).unwrap();
    assert_eq!(cli.command, Some(CliCommand::Path));
}

#[test]
fn run_passes_arguments_through() {
    let cli = Cli::try_parse_from(["ccswitch", "run", "--", "--model", "opus", "-p"]).unwrap();
    assert_eq!(
        cli.command,
        Some(CliCommand::Run {
            args: vec!["--model".to_string(), "opus".to_string(), "-p".to_string()]
        })
    );
}

#[test]
fn bare_arguments_go_to_the_wrapped_executable() {
    let cli = Cli::try_parse_from(["ccswitch", "--model", "opus", "-p"]).unwrap();
    assert_eq!(cli.command, None);
    assert_eq!(cli.args, vec!["--model", "opus", "-p"]);
}

#[test]
fn add_requires_token() {
    assert!(Cli::try_parse_from(["ccswitch", "add", "--name", "x"]).is_err());
}

#[test]
fn path_prints_overridden_location() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["path"]);

    assert!(output.status.success());
    let expected = dir.path().join("config.json");
    assert_eq!(stdout(&output).trim(), expected.display().to_string());
}

#[test]
fn add_list_use_workflow() {
    let dir = TempDir::new().unwrap();

    let output = run(
        &dir,
        &["add", "--name", "work", "--token", "sk-ant-abcdef123456", "--model", "opus"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run(&dir, &["use", "1"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Switched to 'work'"));

    let output = run(&dir, &["list"]);
    let listing = stdout(&output);
    assert!(listing.contains("default"));
    assert!(listing.contains("*  1  work"));
    assert!(listing.contains("model=opus"));
    assert!(!listing.contains("sk-ant-abcdef123456"));
}

#[test]
fn removing_last_profile_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["remove", "0"]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Cannot remove the last remaining profile"));
}

#[test]
fn use_out_of_range_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["use", "3"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No profile at index 3"));
}

#[test]
fn migrate_reports_creation() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["migrate"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Migrated none -> v2"));
    assert!(dir.path().join("config.json").exists());

    let output = run(&dir, &["migrate"]);
    assert!(stdout(&output).contains("Already at v2"));
}

#[cfg(unix)]
#[test]
fn run_injects_profile_env_and_exit_code() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["add", "--name", "work", "--token", "tok-1"]);
    assert!(output.status.success());
    run(&dir, &["use", "1"]);

    let output = ccswitch_cmd(&dir)
        .env("CCSWITCH_CLAUDE_BIN", "sh")
        .env_remove("ANTHROPIC_BASE_URL")
        .args([
            "run",
            "--",
            "-c",
            "printf '%s|%s' \"$ANTHROPIC_AUTH_TOKEN\" \"${ANTHROPIC_BASE_URL-unset}\"; exit 3",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout(&output), "tok-1|unset");
}

#[cfg(unix)]
#[test]
fn bare_invocation_runs_wrapped_executable() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["add", "--name", "work", "--token", "tok-2"]);
    assert!(output.status.success());
    run(&dir, &["use", "1"]);

    let output = ccswitch_cmd(&dir)
        .env("CCSWITCH_CLAUDE_BIN", "sh")
        .args(["-c", "printf '%s' \"$ANTHROPIC_AUTH_TOKEN\"; exit 5"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
    assert_eq!(stdout(&output), "tok-2");
}
