//! Command implementations and the arguments they share.

pub mod info;
pub mod palette;
pub mod render;
pub mod thumbnail;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use darkroom_core::{EditParams, ParamValue, PipelineConfig};

/// Load the pipeline configuration, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Parameter-set arguments of the editing commands.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Parameter set file (TOML); missing keys keep their defaults
    #[arg(long, value_name = "TOML")]
    pub params: Option<PathBuf>,

    /// Override one parameter, e.g. `--set rotate=90` (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
}

impl EditArgs {
    /// Build the parameter set: file first, then each override in order.
    pub fn load_params(&self) -> anyhow::Result<EditParams> {
        let mut params = match &self.params {
            Some(path) => EditParams::load(path)
                .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
            None => EditParams::default(),
        };

        for (name, text) in &self.set {
            let value = ParamValue::parse_for(name, text)
                .with_context(|| format!("Invalid value for {name}: {text:?}"))?;
            params
                .set(name, value)
                .with_context(|| format!("Cannot set {name}={text}"))?;
        }
        Ok(params)
    }
}

/// Split `name=value`.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in {s:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Output name: the explicit one, else the input's file stem.
pub fn output_name(explicit: Option<&str>, input: &Path) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| {
            input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "darkroom".to_string())
}
