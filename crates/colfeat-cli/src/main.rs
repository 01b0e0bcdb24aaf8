use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colfeat::{Corpus, Featurizer, StatsFeaturizer, TfidfFeaturizer};
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "colfeat")]
#[command(about = "Extract numeric features from a string column", long_about = None)]
struct Cli {
    /// CSV file with the training corpus (header row required)
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Column to featurize
    #[arg(short, long, value_name = "NAME")]
    column: String,

    /// CSV file to transform with the fitted state (defaults to the fit corpus)
    #[arg(short, long, value_name = "PATH")]
    transform: Option<PathBuf>,

    /// Which featurizer to run
    #[arg(short = 'F', long, value_enum, default_value = "both")]
    featurizer: FeaturizerKind,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
enum FeaturizerKind {
    /// Binary character/shape presence indicators
    Stats,
    /// TF-IDF weighted character n-grams
    Tfidf,
    /// Both featurizers, one after the other
    Both,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    /// Matrix shape and per-block vocabulary sizes
    Summary,
    /// Full row vectors as a JSON object
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let fit_corpus = Corpus::from_csv_path(&cli.input)
        .with_context(|| format!("Failed to read corpus: {}", cli.input.display()))?;
    info!(
        rows = fit_corpus.len(),
        column = %cli.column,
        "Corpus loaded"
    );

    let target_corpus = match &cli.transform {
        Some(path) => Corpus::from_csv_path(path)
            .with_context(|| format!("Failed to read transform corpus: {}", path.display()))?,
        None => fit_corpus.clone(),
    };

    if matches!(cli.featurizer, FeaturizerKind::Stats | FeaturizerKind::Both) {
        run_stats(&cli, &fit_corpus, &target_corpus)?;
    }
    if matches!(cli.featurizer, FeaturizerKind::Tfidf | FeaturizerKind::Both) {
        run_tfidf(&cli, &fit_corpus, &target_corpus)?;
    }

    Ok(())
}

fn run_stats(cli: &Cli, fit_corpus: &Corpus, target_corpus: &Corpus) -> Result<()> {
    let mut featurizer = StatsFeaturizer::new();
    featurizer.fit(fit_corpus, &cli.column)?;
    let features = featurizer.transform(target_corpus, &cli.column)?;

    match cli.format {
        OutputFormat::Summary => {
            let [chars, shapes, token_shapes] = featurizer.block_sizes()?;
            println!(
                "stats: {} rows x {} features (chars={chars}, shapes={shapes}, token_shapes={token_shapes})",
                features.nrows(),
                features.ncols(),
            );
        }
        OutputFormat::Json => print_json("stats", &features)?,
    }
    Ok(())
}

fn run_tfidf(cli: &Cli, fit_corpus: &Corpus, target_corpus: &Corpus) -> Result<()> {
    let mut featurizer = TfidfFeaturizer::new();
    featurizer.fit(fit_corpus, &cli.column)?;
    let features = featurizer.transform(target_corpus, &cli.column)?;

    match cli.format {
        OutputFormat::Summary => {
            println!(
                "tfidf: {} rows x {} features",
                features.nrows(),
                features.ncols(),
            );
        }
        OutputFormat::Json => print_json("tfidf", &features)?,
    }
    Ok(())
}

fn print_json(name: &str, features: &ndarray::Array2<f64>) -> Result<()> {
    let rows: Vec<Vec<f64>> = features.outer_iter().map(|row| row.to_vec()).collect();
    let output = serde_json::json!({
        "featurizer": name,
        "shape": [features.nrows(), features.ncols()],
        "rows": rows,
    });
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}
