//! Command-line interface
//!
//! `fit` learns a parameter bundle from a training file, `apply` runs a saved
//! bundle over any file, and `run` does both for a train/test pair.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::preprocessing::{Applier, ApplyMode, Fitter, ParameterBundle, PipelineConfig};
use crate::utils::{write_csv, DataLoader, FeatureMatrix, DEFAULT_MAX_ROWS};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "insurance-prep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Leak-free preprocessing for insurance cross-sell records")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit a parameter bundle on a training file
    Fit {
        /// Training data (CSV)
        #[arg(short, long)]
        train: PathBuf,

        /// Where to write the bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Also write the processed training set here
        #[arg(short, long)]
        processed: Option<PathBuf>,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum rows read from the input
        #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,
    },

    /// Apply a saved bundle to a data file
    Apply {
        /// Parameter bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Data to transform (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Output file (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// The data is the partition the bundle was fitted on; removes
        /// outlier and invalid-age rows
        #[arg(long)]
        train_mode: bool,

        /// Maximum rows read from the input
        #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,
    },

    /// Fit on a training file and transform it and a test file
    Run {
        /// Training data (CSV)
        #[arg(long)]
        train: PathBuf,

        /// Held-out data (CSV)
        #[arg(long)]
        test: PathBuf,

        /// Directory for the bundle and both processed files
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum rows read from each input
        #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,
    },

    /// Summarize a saved bundle
    Inspect {
        /// Parameter bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Fit { train, bundle, processed, config, max_rows } => {
                cmd_fit(&train, &bundle, processed.as_deref(), config.as_deref(), max_rows)
            }
            Commands::Apply { bundle, data, output, train_mode, max_rows } => {
                let mode = if train_mode { ApplyMode::Train } else { ApplyMode::Eval };
                cmd_apply(&bundle, &data, &output, mode, max_rows)
            }
            Commands::Run { train, test, out_dir, config, max_rows } => {
                cmd_run(&train, &test, &out_dir, config.as_deref(), max_rows)
            }
            Commands::Inspect { bundle } => cmd_inspect(&bundle),
        }
    }
}

fn build_fitter(config: Option<&Path>) -> anyhow::Result<Fitter> {
    let config = match config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    Ok(Fitter::with_config(config)?)
}

fn load(path: &Path, max_rows: usize) -> anyhow::Result<polars::prelude::DataFrame> {
    step_run(&format!("Loading {}", path.display()));
    let df = DataLoader::new().with_max_rows(Some(max_rows)).load_csv(path)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));
    Ok(df)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_fit(
    train_path: &Path,
    bundle_path: &Path,
    processed_path: Option<&Path>,
    config_path: Option<&Path>,
    max_rows: usize,
) -> anyhow::Result<()> {
    section("Fit");

    let fitter = build_fitter(config_path)?;
    let train = load(train_path, max_rows)?;

    step_run("Fitting");
    let start = Instant::now();
    let bundle = fitter.fit(&train)?;
    step_done(&format!("{:?}", start.elapsed()));

    step_run(&format!("Saving bundle → {}", bundle_path.display()));
    bundle.save(bundle_path)?;
    step_done("");

    if let Some(path) = processed_path {
        step_run("Transforming training set");
        let mut processed = Applier::new(&bundle).apply_train(&train)?;
        step_done(&format!("{} rows kept of {}", processed.height(), train.height()));
        write_csv(&mut processed, path)?;
    }

    println!();
    Ok(())
}

pub fn cmd_apply(
    bundle_path: &Path,
    data_path: &Path,
    output_path: &Path,
    mode: ApplyMode,
    max_rows: usize,
) -> anyhow::Result<()> {
    section(&format!("Apply ({:?})", mode));

    let bundle = ParameterBundle::load(bundle_path)?;
    let df = load(data_path, max_rows)?;

    step_run("Transforming");
    let mut processed = Applier::new(&bundle).apply(&df, mode)?;
    step_done(&format!("{} rows × {} cols", processed.height(), processed.width()));

    step_run(&format!("Saving → {}", output_path.display()));
    write_csv(&mut processed, output_path)?;
    step_done("");

    println!();
    Ok(())
}

pub fn cmd_run(
    train_path: &Path,
    test_path: &Path,
    out_dir: &Path,
    config_path: Option<&Path>,
    max_rows: usize,
) -> anyhow::Result<()> {
    section("Run");

    let fitter = build_fitter(config_path)?;
    std::fs::create_dir_all(out_dir)?;

    let train = load(train_path, max_rows)?;
    let test = load(test_path, max_rows)?;

    step_run("Fitting and transforming");
    let start = Instant::now();
    let (bundle, mut train_processed) = fitter.fit_apply(&train)?;
    let applier = Applier::new(&bundle);
    let mut test_processed = applier.apply_eval(&test)?;
    step_done(&format!("{:?}", start.elapsed()));

    applier.bundle().save(out_dir.join("bundle.json"))?;
    write_csv(&mut train_processed, out_dir.join("train_processed.csv"))?;
    write_csv(&mut test_processed, out_dir.join("test_processed.csv"))?;

    let features = FeatureMatrix::from_frame(&train_processed, applier.bundle().label_column())?;
    println!("  {}", kv("train", &format!("{} → {} rows", train.height(), train_processed.height())));
    println!("  {}", kv("test ", &format!("{} → {} rows", test.height(), test_processed.height())));
    println!("  {}", kv("features", &features.feature_names.join(", ")));
    println!("  {}", kv("output", &out_dir.display().to_string()));

    println!();
    Ok(())
}

pub fn cmd_inspect(bundle_path: &Path) -> anyhow::Result<()> {
    section("Bundle");

    let bundle = ParameterBundle::load(bundle_path)?;

    println!("  {}", kv("fitted rows", &bundle.fitted_rows().to_string()));
    println!("  {}", kv("label", bundle.label_column()));

    for (column, median) in bundle.imputer().medians() {
        println!("  {}", kv(&format!("median {}", column), &median.to_string()));
    }
    for (column, vocabulary) in bundle.encoder().vocabularies() {
        let codes: Vec<String> = vocabulary.iter().map(|(v, c)| format!("{}={}", v, c)).collect();
        println!("  {}", kv(&format!("vocabulary {}", column), &codes.join(", ")));
    }

    let ordinal = bundle.ordinal();
    println!(
        "  {}",
        kv(&format!("ordinal {}", ordinal.column()), &format!("unmapped → {}", ordinal.default_code()))
    );

    let threshold = bundle
        .filter()
        .premium_threshold()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("  {}", kv("premium threshold", &threshold));
    println!("  {}", kv("age edges", &format!("{:?}", bundle.binner().age_edges())));

    let premium_edges = match bundle.binner().premium_edges() {
        Some(edges) if bundle.binner().has_premium_groups() => format!("{:?}", edges),
        Some(edges) => format!("{:?} (degenerate, Premium_Group omitted)", edges),
        None => "-".to_string(),
    };
    println!("  {}", kv("premium edges", &premium_edges));

    for column in bundle.scaler().columns() {
        if let Some(p) = bundle.scaler().params(column) {
            println!("  {}", kv(&format!("scale {}", column), &format!("mean {:.4}, std {:.4}", p.mean, p.scale)));
        }
    }

    println!();
    Ok(())
}
