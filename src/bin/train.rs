//! Offline training for the course recommender
//!
//! Reads the course catalog CSV and writes the model artifact the server loads.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use saarthi_api::recommender::{
    artifact::save_model, dataset::load_courses_from_path, TrainedModel, TrainingOptions,
    DEFAULT_MAX_FEATURES, DEFAULT_NEIGHBORS,
};

/// Train the course recommendation model
#[derive(Parser, Debug)]
#[command(name = "train")]
#[command(about = "Fit the course recommender on a catalog CSV", long_about = None)]
struct Args {
    /// Catalog with columns Title, Type, Level, Skills Covered, Duration, URL
    #[arg(short, long, default_value = "courses_dataset.csv")]
    input: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, default_value = "model.bin")]
    output: PathBuf,

    /// Maximum size of the skill vocabulary
    #[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
    max_features: usize,

    /// Default number of nearest neighbors returned per query
    #[arg(long, default_value_t = DEFAULT_NEIGHBORS)]
    neighbors: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "saarthi_api=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let courses = load_courses_from_path(&args.input)?;
    let model = TrainedModel::train(
        courses,
        TrainingOptions {
            max_features: args.max_features,
            neighbors: args.neighbors,
        },
    )?;
    save_model(&model, &args.output)?;

    println!(
        "Trained on {} courses ({} skill terms) -> {}",
        model.courses().len(),
        model.encoder().skills().vocabulary_size(),
        args.output.display()
    );
    Ok(())
}
