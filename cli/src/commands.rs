pub mod analyze;
pub mod classify;
pub mod isochrones;

use anyhow::Result;
use opmnet::ModelConfig;

/// Configuration from `--config`, or the defaults.
pub fn load_config(cli: &crate::cli::Cli) -> Result<ModelConfig> {
    match &cli.config {
        Some(path) => ModelConfig::read(path),
        None => Ok(ModelConfig::default()),
    }
}
