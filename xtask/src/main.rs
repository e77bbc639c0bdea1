//! Development automation tasks for the `StillMint` workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! This is a CLI tool for developers, so `println!` and `eprintln!` are
//! intentionally used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::{env, fs};

use anyhow::{anyhow, Context};

const DEFAULT_TRACE_PATH: &str = "demos/desk.jsonl";

/// `stillmint-common` tiers, each checked with nothing else enabled.
const COMMON_TIERS: &[&str] = &["foundation", "observability", "runtime", "security"];

/// Crates that pick their own `stillmint-common` tiers.
const COMMON_CONSUMERS: &[&str] = &["stillmint-core", "stillmint-infra"];

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let task = args.next();

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("deny") => run_deny(),
        Some("audit") => run_audit(),
        Some("sample-trace") => {
            let path = args.next().map_or_else(|| PathBuf::from(DEFAULT_TRACE_PATH), PathBuf::from);
            write_sample_trace(&path)
        }
        Some("test-features") => check_common_tiers(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("StillMint Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci            Run all CI checks (fmt, clippy, check, test, deny, audit)");
    println!("    fmt           Check Rust code formatting");
    println!("    clippy        Run Clippy lints");
    println!("    test          Run all tests");
    println!("    sample-trace  Write a demo accelerometer trace (default {DEFAULT_TRACE_PATH})");
    println!("    test-features Check each stillmint-common tier and its consumers compile");
    println!("    deny          Check dependencies with cargo-deny");
    println!("    audit         Audit dependencies for security vulnerabilities");
    println!("    help          Show this help message");
}

/// Run all CI checks in sequence
fn run_ci() -> anyhow::Result<()> {
    println!("==> Running CI checks...\n");

    println!("==> Step 1/6: Checking Rust format...");
    run_fmt()?;

    println!("\n==> Step 2/6: Running Clippy...");
    run_clippy()?;

    println!("\n==> Step 3/6: Verifying the app crate (stillmint-app)...");
    verify_app_crate()?;

    println!("\n==> Step 4/6: Running tests...");
    run_test()?;

    println!("\n==> Step 5/6: Checking dependencies...");
    run_deny()?;

    println!("\n==> Step 6/6: Auditing dependencies...");
    run_audit()?;

    println!("\nAll CI checks passed!");
    Ok(())
}

/// Check Rust code formatting
fn run_fmt() -> anyhow::Result<()> {
    let status = Command::new("cargo").args(["fmt", "--all", "--", "--check"]).status()?;

    if !status.success() {
        anyhow::bail!("Format check failed. Run 'cargo fmt --all' to fix.");
    }

    Ok(())
}

/// Run Clippy lints
fn run_clippy() -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("Clippy run failed. See output above."))
    }
}

/// Verify the app crate and its binary compile
fn verify_app_crate() -> anyhow::Result<()> {
    println!("Checking stillmint-app compiles...");
    let status = Command::new("cargo").args(["check", "-p", "stillmint-app", "--bins"]).status()?;

    if !status.success() {
        anyhow::bail!("stillmint-app check failed");
    }

    println!("stillmint-app compiles successfully");
    Ok(())
}

/// Run all workspace tests
fn run_test() -> anyhow::Result<()> {
    let status = Command::new("cargo").args(["test", "--workspace"]).status()?;

    if !status.success() {
        anyhow::bail!("Tests failed");
    }

    Ok(())
}

/// Check dependencies with cargo-deny
fn run_deny() -> anyhow::Result<()> {
    require_cargo_tool("deny", "cargo-deny")?;

    let status = Command::new("cargo").args(["deny", "check"]).status()?;

    if !status.success() {
        anyhow::bail!("cargo-deny found issues");
    }

    Ok(())
}

/// Audit dependencies for security vulnerabilities
fn run_audit() -> anyhow::Result<()> {
    require_cargo_tool("audit", "cargo-audit")?;

    let status = Command::new("cargo").args(["audit"]).status()?;

    if !status.success() {
        anyhow::bail!("cargo-audit found vulnerabilities");
    }

    Ok(())
}

/// Check every `stillmint-common` tier on its own, then each consumer on its
/// own so a missing tier in its manifest is not masked by feature unification.
fn check_common_tiers() -> anyhow::Result<()> {
    cargo_check(&["-p", "stillmint-common"])?;
    for tier in COMMON_TIERS {
        cargo_check(&["-p", "stillmint-common", "--features", tier])?;
    }
    for consumer in COMMON_CONSUMERS {
        cargo_check(&["-p", consumer, "--all-targets"])?;
    }

    println!(
        "\n{} tiers and {} consumers compile",
        COMMON_TIERS.len(),
        COMMON_CONSUMERS.len()
    );
    Ok(())
}

fn cargo_check(args: &[&str]) -> anyhow::Result<()> {
    println!("\n==> cargo check {}", args.join(" "));
    let status = Command::new("cargo")
        .arg("check")
        .args(args)
        .status()
        .with_context(|| format!("Failed to run cargo check {}", args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("cargo check {} failed", args.join(" "));
    }
    Ok(())
}

fn require_cargo_tool(subcommand: &str, crate_name: &str) -> anyhow::Result<()> {
    let check_installed = Command::new("cargo").args([subcommand, "--version"]).output();

    if check_installed.is_err() || !check_installed.as_ref().is_ok_and(|o| o.status.success()) {
        eprintln!("{crate_name} is not installed.");
        eprintln!("Install it with: cargo install {crate_name}");
        anyhow::bail!("{crate_name} not found");
    }

    Ok(())
}

/// Write a five-minute demo trace: a settled desk with one fidget at the
/// one-minute mark and another at three minutes.
fn write_sample_trace(path: &Path) -> anyhow::Result<()> {
    const SECONDS: u64 = 300;
    const FIDGETS: [u64; 2] = [60, 180];

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut content = String::from("# StillMint demo trace: one sample per second\n");
    for second in 0..SECONDS {
        // Small deterministic jitter well under the stillness threshold.
        let jitter = f64::from(u32::try_from(second % 7).unwrap_or(0)) * 0.005;
        let (x, y, z) =
            if FIDGETS.contains(&second) { (0.42, 0.18, 0.05) } else { (0.01 + jitter, 0.02, 0.01) };
        let _ = writeln!(
            content,
            r#"{{"x": {x:.3}, "y": {y:.3}, "z": {z:.3}, "timestamp_ms": {}}}"#,
            second * 1000
        );
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {SECONDS} samples to {}", path.display());
    println!("Try: cargo run -p stillmint-app -- meditate <user-id> --trace {}", path.display());
    Ok(())
}
