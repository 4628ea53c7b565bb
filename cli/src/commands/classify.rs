use anyhow::Result;
use opmnet::{classify_sites, read_layer, services_from_features, sites_from_features, sites_to_features, write_geojson};
use tracing::{info, warn};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ClassifyArgs) -> Result<()> {
    let config = super::load_config(cli)?;

    let sites = sites_from_features(&read_layer(&args.sites)?, &config.fields)?;
    let services = services_from_features(&read_layer(&args.services)?, &config.fields);

    let classification = classify_sites(&sites, &services, &config.classifier);
    for record in classification.records.iter().filter(|record| record.is_uncorroborated()) {
        warn!(site = %record.site, services = record.services, "promoted without a matching service subtype");
    }

    write_geojson(&args.output, &sites_to_features(&classification.sites, &config.fields))?;
    info!(path = %args.output.display(), "wrote classified sites");

    println!("Classified {} of {} sites", classification.records.len(), sites.len());
    Ok(())
}
