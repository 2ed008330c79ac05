use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use segwarp_evo::{FitnessMode, GaConfig, MutationParams, compute_centroid};
use segwarp_io::{DatasetReader, ResultWriter, read_centroids};
use segwarp_nc::{ClassCentroid, NearestCentroid, fuzzy_predict_with, predict_with};

#[derive(Parser)]
#[command(name = "segwarp")]
#[command(about = "Evolutionary DTW centroids and nearest-centroid time series classification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel evaluation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared tuning parameters for the evolutionary search.
#[derive(Args, Debug, Clone)]
struct GaArgs {
    /// Population size
    #[arg(long, default_value_t = 100)]
    pop_size: usize,

    /// Number of generations
    #[arg(long, default_value_t = 200)]
    ngen: usize,

    /// Crossover probability per pair
    #[arg(long, default_value_t = 0.2)]
    cxpb: f64,

    /// Mutation probability per individual
    #[arg(long, default_value_t = 0.1)]
    mutpb: f64,

    /// Mean of the vertical mutation shifts
    #[arg(long, default_value_t = 0.0)]
    mu: f64,

    /// Standard deviation of the smooth vertical shift
    #[arg(long, default_value_t = 0.03)]
    sigma: f64,

    /// Standard deviation of the extreme vertical shift
    #[arg(long, default_value_t = 0.3)]
    sigma_extreme: f64,

    /// Maximum lateral displacement as a fraction of the first series' length
    #[arg(long, default_value_t = 0.04)]
    desp_ratio: f64,

    /// Tournament size for selection
    #[arg(long, default_value_t = 10)]
    tournsize: usize,

    /// Score each generation on a random subsample of the series
    #[arg(long, default_value_t = false)]
    batch_evaluate: bool,

    /// Subsample size as a fraction of the series count
    #[arg(long, default_value_t = 0.1)]
    batch_size: f64,

    /// Evaluate candidates in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Record a convergence trace
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Number of best individuals kept in the archive
    #[arg(long, default_value_t = 3)]
    hof_size: usize,

    /// Score candidates with FastDTW at this radius ratio instead of exact DTW
    #[arg(long)]
    fast_window: Option<f64>,
}

impl GaArgs {
    fn to_config(&self, seed: u64) -> Result<GaConfig> {
        let mutation = MutationParams {
            mu: self.mu,
            sigma: self.sigma,
            sigma_extreme: self.sigma_extreme,
            desp_ratio: self.desp_ratio,
            ..MutationParams::default()
        };
        let fitness_mode = match self.fast_window {
            Some(window_ratio) => FitnessMode::Fast { window_ratio },
            None => FitnessMode::Exact,
        };
        let config = GaConfig::new(self.pop_size, self.ngen)?
            .with_cxpb(self.cxpb)
            .with_mutpb(self.mutpb)
            .with_mutation(mutation)
            .with_tournsize(self.tournsize)
            .with_batch_evaluate(self.batch_evaluate)
            .with_batch_size(self.batch_size)
            .with_parallel(self.parallel)
            .with_trace_convergence(self.trace)
            .with_hof_size(self.hof_size)
            .with_fitness_mode(fitness_mode)
            .with_seed(seed);
        config.validate().context("invalid search configuration")?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compute one centroid per class and write centroids.json
    Centroid {
        /// Path to the input CSV file (label column, then values)
        #[arg(long)]
        data: PathBuf,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Only compute the centroid of this class
        #[arg(long)]
        label: Option<String>,

        #[command(flatten)]
        ga: GaArgs,
    },

    /// Classify series by their nearest class centroid
    Classify {
        /// Training CSV; centroids are fitted on it
        #[arg(long, required_unless_present = "centroids", conflicts_with = "centroids")]
        train: Option<PathBuf>,

        /// Previously written centroids.json to classify against
        #[arg(long)]
        centroids: Option<PathBuf>,

        /// Test CSV to classify and score
        #[arg(long)]
        test: PathBuf,

        /// Also report fuzzy class memberships
        #[arg(long, default_value_t = false)]
        fuzzy: bool,

        /// Write centroids.json and predictions.json to this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        ga: GaArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct CentroidOutput {
    n_series: usize,
    n_classes: usize,
    inertia: f64,
    classes: Vec<ClassOutput>,
    output: PathBuf,
}

#[derive(Serialize)]
struct ClassOutput {
    label: String,
    length: usize,
    fitness: f64,
    evaluations: usize,
}

#[derive(Serialize)]
struct ClassifyOutput {
    n_test: usize,
    classes: Vec<String>,
    accuracy: f64,
    inertia: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memberships: Option<Vec<Vec<f64>>>,
}

fn class_summary(classes: &[ClassCentroid]) -> Vec<ClassOutput> {
    classes
        .iter()
        .map(|c| ClassOutput {
            label: c.label.clone(),
            length: c.result.centroid.len(),
            fitness: c.result.fitness,
            evaluations: c.result.logbook.total_evaluations(),
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Centroid {
            data,
            output_dir,
            label,
            ga,
        } => {
            let config = ga.to_config(cli.seed)?;
            let dataset = DatasetReader::new(&data)
                .read()
                .context("failed to read input CSV")?;

            let classes = match label {
                Some(label) => {
                    let members = dataset.series_of(&label);
                    anyhow::ensure!(!members.is_empty(), "no series with label {label}");
                    let result = compute_centroid(&members, &config)
                        .with_context(|| format!("centroid search failed for class {label}"))?;
                    vec![ClassCentroid { label, result }]
                }
                None => {
                    let mut nc = NearestCentroid::new(config);
                    nc.fit(&dataset.series, &dataset.labels)
                        .context("centroid search failed")?;
                    nc.classes().to_vec()
                }
            };

            let writer = ResultWriter::new(&output_dir)?;
            let output = writer.write_centroids(&classes)?;

            let summary = CentroidOutput {
                n_series: dataset.len(),
                n_classes: classes.len(),
                inertia: classes.iter().map(|c| c.result.fitness).sum(),
                classes: class_summary(&classes),
                output,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Classify {
            train,
            centroids,
            test,
            fuzzy,
            output_dir,
            ga,
        } => {
            let test_set = DatasetReader::new(&test)
                .read()
                .context("failed to read test CSV")?;

            let (class_labels, predicted, memberships, inertia) = match (train, centroids) {
                (Some(train), _) => {
                    let config = ga.to_config(cli.seed)?;
                    let train_set = DatasetReader::new(&train)
                        .read()
                        .context("failed to read training CSV")?;
                    let mut nc = NearestCentroid::new(config);
                    nc.fit(&train_set.series, &train_set.labels)
                        .context("centroid search failed")?;
                    if let Some(dir) = &output_dir {
                        ResultWriter::new(dir)?.write_centroids(nc.classes())?;
                    }

                    let class_labels: Vec<String> =
                        nc.labels().into_iter().map(str::to_owned).collect();
                    let predicted: Vec<String> = nc
                        .predict(&test_set.series)?
                        .into_iter()
                        .map(str::to_owned)
                        .collect();
                    let memberships = if fuzzy {
                        Some(nc.fuzzy_predict(&test_set.series)?)
                    } else {
                        None
                    };
                    (class_labels, predicted, memberships, Some(nc.inertia()))
                }
                (None, Some(path)) => {
                    let stored = read_centroids(&path).context("failed to read centroids")?;
                    let values: Vec<&[f64]> =
                        stored.iter().map(|s| s.centroid.as_slice()).collect();
                    let class_labels: Vec<String> =
                        stored.iter().map(|s| s.label.clone()).collect();
                    let predicted: Vec<String> = predict_with(&values, &test_set.series)?
                        .into_iter()
                        .map(|i| class_labels[i].clone())
                        .collect();
                    let memberships = if fuzzy {
                        Some(fuzzy_predict_with(&values, &test_set.series)?)
                    } else {
                        None
                    };
                    (class_labels, predicted, memberships, None)
                }
                (None, None) => anyhow::bail!("either --train or --centroids is required"),
            };

            let correct = predicted
                .iter()
                .zip(&test_set.labels)
                .filter(|(p, l)| p.as_str() == l.as_str())
                .count();
            let accuracy = correct as f64 / test_set.len() as f64;
            info!(correct, total = test_set.len(), accuracy, "classification complete");

            if let Some(dir) = &output_dir {
                let labels: Vec<&str> = class_labels.iter().map(String::as_str).collect();
                let predicted: Vec<&str> = predicted.iter().map(String::as_str).collect();
                ResultWriter::new(dir)?.write_predictions(
                    &labels,
                    &predicted,
                    memberships.as_deref(),
                )?;
            }

            let output = ClassifyOutput {
                n_test: test_set.len(),
                classes: class_labels,
                accuracy,
                inertia,
                memberships,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
