//! The `darkroom info` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use darkroom_core::metadata::{extract_metadata, MetadataReport};
use darkroom_core::open_image;

/// Arguments for the `info` command.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Image to describe
    pub input: PathBuf,
}

/// Execute the info command.
pub fn execute(args: InfoArgs) -> anyhow::Result<()> {
    let imported = open_image(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let report = extract_metadata(&imported)?;
    print!("{}", format_report(&report));
    Ok(())
}

/// Titled blocks separated by blank lines; empty categories are skipped.
fn format_report(report: &MetadataReport) -> String {
    report
        .blocks()
        .map(|(title, text)| format!("[{title}]\n{text}"))
        .collect::<Vec<_>>()
        .join("\n")
}
