use std::path::PathBuf;

/// Public-space accessibility CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "opmnet", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model configuration (JSON); defaults match the source layers
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Classify candidate sites by the services around them
    Classify(ClassifyArgs),

    /// Compute 5, 10 and 20 minute isochrones over a street network
    Isochrones(IsochronesArgs),

    /// Build the accessibility graph and report provisioning
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Site layer (GeoJSON or Shapefile)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub sites: PathBuf,

    /// Service point layer (GeoJSON or Shapefile)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub services: PathBuf,

    /// Output GeoJSON for the classified sites
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct IsochronesArgs {
    /// Site layer (GeoJSON or Shapefile)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub sites: PathBuf,

    /// Street network nodes CSV (id,x,y)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub nodes: PathBuf,

    /// Street network edges CSV (u,v,time)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub edges: PathBuf,

    /// Output directory for iso_5/iso_10/iso_20.geojson, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Site layer (GeoJSON or Shapefile)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub sites: PathBuf,

    /// Building layer (GeoJSON or Shapefile)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub buildings: PathBuf,

    /// Directory holding iso_5/iso_10/iso_20.geojson
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub isochrones: PathBuf,

    /// Service layer; when given, sites are classified before the graph is built
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub services: Option<PathBuf>,

    /// Write the site summary and coverage report as JSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    /// Write typed sites with planning attributes as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub export: Option<PathBuf>,

    /// Render the graph as SVG
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,
}
