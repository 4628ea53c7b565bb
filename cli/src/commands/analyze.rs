use std::fs;

use anyhow::{Context, Result};
use opmnet::{write_enriched, AccessModel, UnspecifiedPolicy};
use serde_json::json;
use tracing::info;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::AnalyzeArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let mut model = AccessModel::from_files(&args.sites, &args.buildings, config)?;

    if let Some(path) = &args.services {
        let services = model.read_services(path)?;
        let records = model.classify(&services);
        info!(classified = records.len(), "classified candidate sites");
    }

    model.load_isochrones(&args.isochrones)?;
    let summary = model.site_summary()?;
    let coverage = model.coverage()?;
    print!("{summary}");
    print!("{coverage}");

    if let Some(path) = &args.report {
        let report = json!({ "sites": summary, "coverage": coverage });
        let bytes = serde_json::to_vec_pretty(&report).context("[analyze] Failed to serialize report")?;
        fs::write(path, bytes).with_context(|| format!("[analyze] Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }

    if let Some(path) = &args.export {
        write_enriched(path, &model.enriched_sites(&UnspecifiedPolicy)?)?;
    }

    if let Some(path) = &args.svg {
        model.render_svg(path)?;
    }

    Ok(())
}
