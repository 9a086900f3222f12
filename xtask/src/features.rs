use std::process::Command;

use anyhow::{Context, Result};

/// `cargo check` argument sets for `daybrief-infra`, labelled for output.
const FEATURE_COMBINATIONS: &[(&str, &[&str])] = &[
    ("default", &[]),
    ("no smtp", &["--no-default-features"]),
    ("smtp only", &["--no-default-features", "--features", "smtp"]),
];

/// Check that every escalation transport configuration compiles.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} daybrief-infra feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, (label, args)) in FEATURE_COMBINATIONS.iter().enumerate() {
        println!(
            "\n[{}/{}] cargo check -p daybrief-infra --all-targets {}",
            index + 1,
            FEATURE_COMBINATIONS.len(),
            args.join(" ")
        );

        let status = Command::new("cargo")
            .args(["check", "-p", "daybrief-infra", "--all-targets"])
            .args(*args)
            .status()
            .with_context(|| format!("Failed to run cargo check for '{label}'"))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{label}' failed to compile");
        }

        println!("✅ Features '{label}' compiled successfully");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());

    Ok(())
}
