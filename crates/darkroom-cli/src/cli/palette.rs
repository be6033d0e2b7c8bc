//! The `darkroom palette` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use darkroom_core::palette::{extract_palette_from_path, Swatch};
use darkroom_core::PipelineConfig;

/// Arguments for the `palette` command.
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Image to sample
    pub input: PathBuf,
}

/// Execute the palette command.
pub fn execute(args: PaletteArgs, config: &PipelineConfig) -> anyhow::Result<()> {
    let swatches = extract_palette_from_path(&args.input, config)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    for swatch in &swatches {
        println!("{}", format_swatch(swatch));
    }
    Ok(())
}

/// `hex hover proportion`
fn format_swatch(swatch: &Swatch) -> String {
    format!("{} {} {:.4}", swatch.hex, swatch.hover, swatch.proportion)
}
