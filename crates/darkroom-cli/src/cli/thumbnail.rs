//! The `darkroom thumbnail` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use darkroom_core::encode::save_thumbnail;
use darkroom_core::{open_image, render, PipelineConfig};

use super::{output_name, EditArgs};

/// Arguments for the `thumbnail` command.
#[derive(Args, Debug)]
pub struct ThumbnailArgs {
    /// Source image
    pub input: PathBuf,

    #[command(flatten)]
    pub edit: EditArgs,

    /// Directory to write the thumbnail into
    #[arg(long)]
    pub out_dir: PathBuf,

    /// Bounding box width in pixels
    #[arg(long)]
    pub width: u32,

    /// Bounding box height in pixels
    #[arg(long)]
    pub height: u32,

    /// Thumbnail file name without extension (defaults to the input's)
    #[arg(long)]
    pub name: Option<String>,
}

/// Execute the thumbnail command.
pub fn execute(args: ThumbnailArgs, config: &PipelineConfig) -> anyhow::Result<()> {
    let params = args.edit.load_params()?;
    let imported = open_image(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let result = render(&imported.image, &params, config)
        .with_context(|| format!("Failed to edit {}", args.input.display()))?;

    let name = output_name(args.name.as_deref(), &args.input);
    let path = save_thumbnail(&result, &name, (args.width, args.height), &args.out_dir, config)?;
    println!("{}", path.display());
    Ok(())
}
