use std::path::PathBuf;

/// Smart-growth map data preparation and scenario queries
#[derive(clap::Parser, Debug)]
#[command(name = "smartgrowth", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Merge Measure O and Measure P results into precincts-voting.geojson
    Precincts(PathArgs),

    /// Merge the site attribute table into opportunity-sites.geojson
    Sites(PathArgs),

    /// Normalize council-districts.geojson
    Districts(PathArgs),

    /// Score, round and sort the upzone parcel layer; copy its summary
    Upzone(PathArgs),

    /// Run every preparation job, then validate
    All(PathArgs),

    /// Check published layer files (exits 1 on any error)
    Validate(PathArgs),

    /// Interpolate a scenario layer's projected impact at an adoption percent
    Scenario(ScenarioArgs),
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Source dataset directory, defaults to "data/source"
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,

    /// Published data directory, defaults to "public/data"
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ScenarioArgs {
    /// Layer id, e.g. upzone-scenario, commercial-viability
    pub layer: String,

    /// Adoption percent (0-100); defaults to the layer's slider default
    #[arg(short, long)]
    pub percent: Option<f64>,

    /// Published data directory, defaults to "public/data"
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,
}
