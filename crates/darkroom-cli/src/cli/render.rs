//! The `darkroom render` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use darkroom_core::encode::{export_image, ExportFormat, ExportRequest};
use darkroom_core::{open_image, render, PipelineConfig};

use super::{output_name, EditArgs};

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Source image
    pub input: PathBuf,

    #[command(flatten)]
    pub edit: EditArgs,

    /// Directory to write the result into
    #[arg(long)]
    pub out_dir: PathBuf,

    /// Output file name without extension (defaults to the input's)
    #[arg(long)]
    pub name: Option<String>,

    /// Output format: jpg or png
    #[arg(long, default_value = "jpg")]
    pub format: ExportFormat,

    /// Quality 1-100; 100 on a JPEG source keeps the source quality
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

/// Execute the render command.
pub fn execute(args: RenderArgs, config: &PipelineConfig) -> anyhow::Result<()> {
    let params = args.edit.load_params()?;
    let imported = open_image(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let result = render(&imported.image, &params, config)
        .with_context(|| format!("Failed to edit {}", args.input.display()))?;

    let request = ExportRequest {
        name: output_name(args.name.as_deref(), &args.input),
        format: args.format,
        out_dir: args.out_dir,
        quality: args.quality,
    };
    let path = export_image(&result, &imported.source, &request, config)?;
    println!("{}", path.display());
    Ok(())
}
