#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for land suitability analysis.

mod region_file;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use land_suitability_analysis::rotation::rotation_pattern;
use land_suitability_analysis::{AnalysisConfig, DatasetQuery, Recommendation, evaluate, report};
use land_suitability_analysis_models::{Dataset, Region};
use land_suitability_dataset::{ArcgisDatasets, DatasetRegistry, InMemoryDatasets};

#[derive(Parser)]
#[command(
    name = "land_suitability",
    about = "Agricultural suitability analysis for sketched regions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a region read from a `GeoJSON` file
    Analyze {
        /// `GeoJSON` Polygon, Feature, or `FeatureCollection` (first polygon wins)
        #[arg(long)]
        region: PathBuf,
        /// Dataset manifest overriding the built-in definitions
        /// (falls back to `LAND_SUITABILITY_DATASETS`)
        #[arg(long)]
        datasets: Option<PathBuf>,
        /// TOML file overriding buffer distances and the coverage threshold
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where spatial queries are answered
        #[arg(long, value_enum, default_value_t = Backend::Live)]
        backend: Backend,
        /// Print the recommendation as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// List the resolved dataset definitions
    Datasets {
        /// Dataset manifest overriding the built-in definitions
        #[arg(long)]
        datasets: Option<PathBuf>,
    },
    /// Print the crop rotation pattern for a soil type
    Rotation {
        /// Soil type as it appears in `DOMSOI` (e.g., "Loam")
        soil: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Query the `FeatureServer` layers for each analysis
    Live,
    /// Download every dataset once and query it in memory
    Snapshot,
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::de::from_str(&contents)?)
}

async fn analyze<Q: DatasetQuery>(
    region: &Region,
    query: &Q,
    config: &AnalysisConfig,
) -> Result<Recommendation, Box<dyn std::error::Error>> {
    let recommendation = evaluate(region, query, config).await?;
    log::info!("Outcome: {}", recommendation.outcome);
    Ok(recommendation)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            region,
            datasets,
            config,
            backend,
            json,
        } => {
            let registry = DatasetRegistry::from_override(datasets.as_deref())?;
            let config = load_config(config.as_deref())?;
            let region = region_file::read_region(&region)?;
            let client = reqwest::Client::new();

            let recommendation = match backend {
                Backend::Live => {
                    let query = ArcgisDatasets::new(client, &registry);
                    analyze(&region, &query, &config).await?
                }
                Backend::Snapshot => {
                    log::info!("Loading dataset snapshot...");
                    let query = InMemoryDatasets::load(&client, &registry).await?;
                    analyze(&region, &query, &config).await?
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            } else {
                print!("{}", report::render(&recommendation, &config));
            }
        }
        Commands::Datasets { datasets } => {
            let registry = DatasetRegistry::from_override(datasets.as_deref())?;
            println!("{:<12} {:<24} SOURCE", "ID", "TITLE");
            println!("{}", "-".repeat(80));
            for definition in registry.definitions() {
                println!(
                    "{:<12} {:<24} {}",
                    definition.id(),
                    definition.title(),
                    definition.source.describe()
                );
            }
            for dataset in Dataset::ALL {
                if registry.resolve(dataset.as_str()).is_none() {
                    log::warn!("Dataset '{dataset}' does not resolve; analyses will fail");
                }
            }
        }
        Commands::Rotation { soil } => {
            println!("{}", rotation_pattern(&soil));
        }
    }

    Ok(())
}
