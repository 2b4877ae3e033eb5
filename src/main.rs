use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use quake_predictor::config::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use quake_predictor::data::filter::within_radius;
use quake_predictor::data::summary::{
    magnitude_histogram, max_magnitude_per_degree, DatasetSummary, DEFAULT_HISTOGRAM_RANGE,
};
use quake_predictor::{
    distance, load_file, Coordinate, DistanceUnit, EarthquakeDataset, MagnitudeRegressor,
    RegressorConfig, DEFAULT_CONFIDENCE_DIGITS,
};

// Centre of the contiguous US.
const DEFAULT_LATITUDE: f64 = 39.8283;
const DEFAULT_LONGITUDE: f64 = -98.5795;

/// Earthquake Magnitude Predictor
#[derive(Parser)]
#[command(name = "quake-predictor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Earthquake table (.csv, .tsv, .json or .parquet)
    #[arg(long, env = "QUAKE_DATASET", default_value = "sample_earthquakes.csv")]
    data: PathBuf,

    /// Seed for the train/evaluation shuffle
    #[arg(long, env = "QUAKE_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Fraction of rows held out to score the model
    #[arg(long, env = "QUAKE_TEST_FRACTION", default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the magnitude at a coordinate
    Predict(CoordArgs),

    /// Score the model on the held-out rows
    Confidence {
        #[arg(long, default_value_t = DEFAULT_CONFIDENCE_DIGITS)]
        digits: u32,
    },

    /// Great-circle distance between two coordinates (no dataset needed)
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
        #[arg(long)]
        kilometers: bool,
    },

    /// List earthquakes within a radius of a coordinate
    Nearby {
        #[command(flatten)]
        coord: CoordArgs,
        #[arg(long, default_value_t = 100.0)]
        radius: f64,
        #[arg(long)]
        kilometers: bool,
    },

    /// Magnitude distribution and strongest cells of the dataset
    Summary {
        #[arg(long, default_value_t = 9)]
        bins: usize,
        /// How many 1°×1° cells to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[derive(Args)]
struct CoordArgs {
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_LATITUDE)]
    latitude: f64,
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_LONGITUDE)]
    longitude: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = RegressorConfig::default()
        .with_seed(cli.seed)
        .with_test_fraction(cli.test_fraction);

    match cli.command {
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
            kilometers,
        } => {
            let unit = DistanceUnit::from_kilometers_flag(kilometers);
            let d = distance(lat1, lon1, lat2, lon2, unit);
            println!("{d:.3} {}", unit.suffix());
        }
        Command::Predict(coord) => {
            let dataset = load(&cli.data)?;
            let regressor = MagnitudeRegressor::new(&dataset, config)
                .context("building magnitude regressor")?;
            println!(
                "Prediction: {}",
                regressor.predict(coord.latitude, coord.longitude)
            );
            println!(
                "Confidence: {}",
                regressor.confidence(DEFAULT_CONFIDENCE_DIGITS)
            );
        }
        Command::Confidence { digits } => {
            let dataset = load(&cli.data)?;
            let regressor = MagnitudeRegressor::new(&dataset, config)
                .context("building magnitude regressor")?;
            info!(
                "scoring on {} held-out rows (trained on {})",
                regressor.evaluation_size(),
                regressor.training_size()
            );
            println!("Confidence: {}", regressor.confidence(digits));
        }
        Command::Nearby {
            coord,
            radius,
            kilometers,
        } => {
            let dataset = load(&cli.data)?;
            let unit = DistanceUnit::from_kilometers_flag(kilometers);
            let center = Coordinate::new(coord.latitude, coord.longitude);
            let hits = within_radius(&dataset, center, radius, unit);
            println!(
                "{} earthquakes within {radius} {} of ({}, {})",
                hits.len(),
                unit.suffix(),
                center.latitude,
                center.longitude
            );
            for idx in hits {
                if let Some(rec) = dataset.get(idx) {
                    let here = Coordinate::new(rec.latitude, rec.longitude);
                    println!(
                        "  M{:.1}  ({:.4}, {:.4})  {:.1} {}",
                        rec.magnitude,
                        rec.latitude,
                        rec.longitude,
                        center.distance_to(&here, unit),
                        unit.suffix()
                    );
                }
            }
        }
        Command::Summary { bins, top } => {
            let dataset = load(&cli.data)?;
            print_summary(&dataset, bins, top);
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<EarthquakeDataset> {
    load_file(path).with_context(|| format!("loading dataset {}", path.display()))
}

fn print_summary(dataset: &EarthquakeDataset, bins: usize, top: usize) {
    let Some(summary) = DatasetSummary::from_dataset(dataset) else {
        println!("dataset is empty");
        return;
    };
    println!(
        "{} earthquakes, magnitude {:.1}..{:.1} (mean {:.2})",
        summary.count, summary.min_magnitude, summary.max_magnitude, summary.mean_magnitude
    );

    let (min, max) = DEFAULT_HISTOGRAM_RANGE;
    println!("\nMagnitude distribution");
    for bin in magnitude_histogram(dataset, min, max, bins) {
        println!("  {:>5.2} – {:<5.2} {:>7}", bin.lower, bin.upper, bin.count);
    }

    let mut cells: Vec<((i32, i32), f64)> = max_magnitude_per_degree(dataset).into_iter().collect();
    cells.sort_by(|a, b| b.1.total_cmp(&a.1));
    println!("\nHighest magnitude per geographic degree");
    for ((lat, lon), magnitude) in cells.into_iter().take(top) {
        println!("  ({lat:>4}, {lon:>4})  M{magnitude:.1}");
    }
}
