use anyhow::Result;
use opmnet::{compute_isochrones, read_layer, read_street_network, sites_from_features, NetworkIsochrones};
use tracing::info;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::IsochronesArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let out_dir = &args.output_dir.clone().unwrap_or(".".into());

    let sites = sites_from_features(&read_layer(&args.sites)?, &config.fields)?;
    let provider = NetworkIsochrones::new(read_street_network(&args.nodes, &args.edges)?);

    let isochrones = compute_isochrones(&provider, &sites)?;
    isochrones.write_dir(out_dir)?;
    info!(dir = %out_dir.display(), "wrote isochrone layers");

    Ok(())
}
