//! Embeds the version string shown by `clinic --version`.
//!
//! Packagers may set `CLINIC_VERSION` at build time; otherwise the version
//! comes from `git describe`, falling back to the crate version.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=CLINIC_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let version = env::var("CLINIC_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(describe)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=CLINIC_VERSION={version}");
}

fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())?;

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let described = described.strip_prefix('v').unwrap_or(described);

    (!described.is_empty()).then(|| described.to_string())
}
