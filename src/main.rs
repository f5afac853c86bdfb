//! Command-line front end: classify a drawing saved as an image file, inspect
//! label tables, and print the feedback tally.
//!
//! Run with:
//!   cargo run -- classify --variant digits path/to/drawing.png

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sketch_nn::pipeline::DEFAULT_TOP_K;
use sketch_nn::{Classifier, ElementKind, LabelTable, ModelSource, ModelVariant, TallyStore};

#[derive(Parser, Debug)]
#[command(name = "sketch-nn")]
#[command(about = "Classify hand-drawn digits and Hangul syllables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify an image file and print the ranked labels
    Classify(ClassifyArgs),

    /// Print the number of classes in a variant's label table
    Labels(ModelArgs),

    /// Print the prediction feedback tally
    Stats {
        #[arg(long, env = "SKETCH_STATS_PATH", default_value = "trained_models/tally.json")]
        stats_path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Model variant: digits or hangul
    #[arg(long, default_value = "digits")]
    variant: ModelVariant,

    /// Directory holding model JSON files and label tables
    #[arg(long, env = "SKETCH_MODELS_DIR", default_value = "trained_models")]
    models_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Number of ranked candidates to print
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Feed raw 0-255 bytes instead of normalized floats
    #[arg(long)]
    quantized: bool,

    /// Image file to classify
    image: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> sketch_nn::Result<()> {
    match cli.command {
        Commands::Classify(args) => {
            let kind = if args.quantized { ElementKind::Quantized } else { ElementKind::Float };
            let source = ModelSource::in_dir(&args.model.models_dir, args.model.variant)
                .with_element_kind(kind);
            let classifier = Classifier::load(&source, args.top_k)?;
            let bytes = std::fs::read(&args.image)
                .map_err(|e| sketch_nn::ClassifyError::Io { path: args.image.clone(), source: e })?;
            let ranked = classifier.classify_bytes(&bytes, args.top_k)?;
            print!("{}", ranked);
        }
        Commands::Labels(args) => {
            let source = ModelSource::in_dir(&args.models_dir, args.variant);
            let labels = LabelTable::load(&source.labels_path)?;
            println!("{}: {} labels in {}", args.variant, labels.len(), source.labels_path.display());
        }
        Commands::Stats { stats_path } => {
            let tally = TallyStore::new(stats_path).load()?;
            println!("{}", tally);
        }
    }
    Ok(())
}
