#!/usr/bin/env cargo
//! Dining Philosophers CI Tool
//!
//! Checks and tests every crate in the workspace for continuous integration

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::Command;

#[derive(Parser)]
#[command(
    name = "ci",
    about = "CI tool for checking and testing the dining philosophers workspace",
    long_about = r#"
CI tool for checking and testing the dining philosophers workspace

Examples:
  cargo ci                             # Check compilation (default)
  cargo ci check                       # Check that all crates compile
  cargo ci test                        # Run all tests

Crates:
  - philosophers-monitor (coordination monitor)
  - philosophers-dinner (actors and the `philosophers` binary)
"#
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Check that all crates compile
    Check,
    /// Run all tests
    Test,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Check) => run_check(),
        Some(Commands::Test) => run_test(),
        None => run_check(), // Default to check
    }
}

/// Check that all crates compile, tests and binaries included
fn run_check() -> Result<()> {
    println!("🍜 Dining Philosophers CI Check");
    println!("{}", "=".repeat(31));

    check_rust()?;
    cargo(&["check", "--workspace", "--all-targets"], "check")?;

    println!("\n✅ All crates check passed!");
    Ok(())
}

/// Run all tests
fn run_test() -> Result<()> {
    println!("🍜 Dining Philosophers CI Test");
    println!("{}", "=".repeat(30));

    check_rust()?;
    cargo(&["test", "--workspace"], "test")?;

    println!("\n✅ All tests completed!");
    Ok(())
}

fn check_rust() -> Result<()> {
    if which::which("cargo").is_err() {
        return Err(anyhow!(
            "❌ Error: Cargo not found. Please install Rust first.\n   Visit: https://rustup.rs/"
        ));
    }
    Ok(())
}

fn get_repo_root() -> Result<PathBuf> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").context(
        "❌ CI tool must be run via cargo. CARGO_MANIFEST_DIR not found.",
    )?;

    let manifest_path = PathBuf::from(manifest_dir);
    // If we're in the ci/ directory, go up to workspace root
    if manifest_path.file_name() == Some(std::ffi::OsStr::new("ci")) {
        if let Some(parent) = manifest_path.parent() {
            return Ok(parent.to_path_buf());
        }
    }
    Ok(manifest_path)
}

/// Run a cargo subcommand over the whole workspace, streaming its output
fn cargo(args: &[&str], what: &str) -> Result<()> {
    let repo_root = get_repo_root()?;

    println!("🦀 Running cargo {what}...");
    println!("   Workspace: {}", repo_root.display());

    let status = Command::new("cargo")
        .args(args)
        .env("RUST_BACKTRACE", "1")
        .current_dir(&repo_root)
        .status()
        .with_context(|| format!("Failed to execute cargo {what}"))?;

    if !status.success() {
        return Err(anyhow!("❌ cargo {what} failed"));
    }

    println!("✅ cargo {what} passed!");
    Ok(())
}
