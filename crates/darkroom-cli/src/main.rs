//! Darkroom CLI - non-destructive single-image editing from the command line.
//!
//! Every command starts from the untouched source file; edits are described
//! by a parameter set (a TOML file and/or `--set name=value` overrides) and
//! rendered in one pass.
//!
//! # Usage
//!
//! ```bash
//! # Render an edit and export it
//! darkroom render photo.jpg --set rotate=90 --set sepia=true --out-dir ./out
//!
//! # Save a thumbnail of the edited image
//! darkroom thumbnail photo.jpg --params edit.toml --out-dir ./out --width 256 --height 256
//!
//! # Show metadata and palette
//! darkroom info photo.jpg
//! darkroom palette photo.jpg
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Darkroom - non-destructive image editing pipeline.
#[derive(Parser, Debug)]
#[command(name = "darkroom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Pipeline configuration file (TOML)
    #[arg(long, global = true, value_name = "TOML")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render an edit and export the result as JPEG or PNG
    Render(cli::render::RenderArgs),

    /// Render an edit and save a bounded JPEG thumbnail
    Thumbnail(cli::thumbnail::ThumbnailArgs),

    /// Print image info, EXIF and TIFF metadata
    Info(cli::info::InfoArgs),

    /// Print the dominant colors of an image
    Palette(cli::palette::PaletteArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    tracing::debug!("Darkroom v{}", darkroom_core::VERSION);

    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render(args) => cli::render::execute(args, &config),
        Commands::Thumbnail(args) => cli::thumbnail::execute(args, &config),
        Commands::Info(args) => cli::info::execute(args),
        Commands::Palette(args) => cli::palette::execute(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_core::encode::ExportFormat;

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "darkroom",
            "render",
            "photo.jpg",
            "--set",
            "rotate=90",
            "--set",
            "effect=Find edges",
            "--out-dir",
            "out",
            "--format",
            "png",
            "--quality",
            "80",
        ])
        .unwrap();

        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.input, PathBuf::from("photo.jpg"));
        assert_eq!(args.format, ExportFormat::Png);
        assert_eq!(args.quality, 80);
        assert_eq!(args.edit.set.len(), 2);
        assert_eq!(args.edit.set[1], ("effect".to_string(), "Find edges".to_string()));
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["darkroom", "render", "a.png", "--out-dir", "o"]).unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.format, ExportFormat::Jpg);
        assert_eq!(args.quality, 100);
        assert!(args.name.is_none());
        assert!(args.edit.params.is_none());
    }

    #[test]
    fn test_quality_out_of_range() {
        let result = Cli::try_parse_from([
            "darkroom", "render", "a.png", "--out-dir", "o", "--quality", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_requires_equals() {
        let result = Cli::try_parse_from([
            "darkroom", "render", "a.png", "--out-dir", "o", "--set", "sepia",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "darkroom",
            "info",
            "scan.tif",
            "--verbose",
            "--config",
            "darkroom.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("darkroom.toml")));
        assert!(matches!(cli.command, Commands::Info(_)));
    }

    #[test]
    fn test_parse_thumbnail() {
        let cli = Cli::try_parse_from([
            "darkroom",
            "thumbnail",
            "a.jpg",
            "--out-dir",
            "thumbs",
            "--width",
            "128",
            "--height",
            "96",
            "--name",
            "preview",
        ])
        .unwrap();
        let Commands::Thumbnail(args) = cli.command else {
            panic!("expected thumbnail");
        };
        assert_eq!((args.width, args.height), (128, 96));
        assert_eq!(args.name.as_deref(), Some("preview"));
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["darkroom"]).is_err());
    }
}
