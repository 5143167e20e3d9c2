//! Kohonen CLI - Competitive-Learning Vector Quantizer
//!
//! Command-line interface for clustering point sets and running the
//! two-cluster demo.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use kohonen::{
    ClusterSource, Config, KohonenError, NetworkConfig, NormalizationStrategy, Quantizer, Result,
    ScatterPlot, Trainer, TrainingConfig, WeightRange,
};
use log::error;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "kohonen")]
#[command(version)]
#[command(about = "Competitive-learning vector quantizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Initial weight band.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Band {
    /// [0.01, 0.25)
    Narrow,
    /// [0, 1)
    Unit,
}

impl From<Band> for WeightRange {
    fn from(band: Band) -> Self {
        match band {
            Band::Narrow => WeightRange::NARROW,
            Band::Unit => WeightRange::UNIT,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate points around seed centers, cluster them and report the split
    Demo {
        /// Seed centers, e.g. "10,10;20,20"
        #[arg(short, long, default_value = "10,10;20,20")]
        centers: String,

        /// Points generated per center
        #[arg(short, long, default_value = "30")]
        points: usize,

        /// Maximum distance of a point from its center
        #[arg(short, long, default_value = "10")]
        radius: f64,

        /// Number of clusters (defaults to the number of centers)
        #[arg(short = 'k', long)]
        clusters: Option<usize>,

        /// Number of training epochs
        #[arg(short = 'n', long, default_value = "10000")]
        epochs: usize,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Initial weight band
        #[arg(long, value_enum, default_value = "narrow")]
        band: Band,

        /// Train on raw coordinates instead of axis-normalized ones
        #[arg(long)]
        no_normalize: bool,

        /// Write a scatter plot colored by cluster to this PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cluster points read from a file (one point per line)
    Cluster {
        /// Input file, comma or whitespace separated numbers, '#' comments
        #[arg(short, long)]
        input: PathBuf,

        /// Layer sizes, comma-separated; the last one is the cluster count
        #[arg(short, long, default_value = "2")]
        layers: String,

        /// Number of training epochs
        #[arg(short = 'n', long, default_value = "10000")]
        epochs: usize,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Initial weight band
        #[arg(long, value_enum, default_value = "narrow")]
        band: Band,

        /// Train on raw values instead of axis-normalized ones
        #[arg(long)]
        no_normalize: bool,

        /// Write a scatter plot (first two components) to this PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Demo {
            centers,
            points,
            radius,
            clusters,
            epochs,
            seed,
            band,
            no_normalize,
            output,
        } => run_demo(
            centers,
            points,
            radius,
            clusters,
            build_config(epochs, seed, band, no_normalize),
            output,
        ),

        Commands::Cluster {
            input,
            layers,
            epochs,
            seed,
            band,
            no_normalize,
            output,
        } => cluster_file(
            input,
            layers,
            build_config(epochs, seed, band, no_normalize),
            output,
        ),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_config(epochs: usize, seed: Option<u64>, band: Band, no_normalize: bool) -> Config {
    Config {
        network: NetworkConfig {
            weight_range: band.into(),
            normalization: if no_normalize {
                NormalizationStrategy::None
            } else {
                NormalizationStrategy::GlobalAxis
            },
            seed,
            ..Default::default()
        },
        training: TrainingConfig {
            epochs,
            // Keep sample draws independent of the initialization stream.
            seed: seed.map(|s| s.wrapping_add(1)),
            ..Default::default()
        },
    }
}

fn run_demo(
    centers: String,
    points: usize,
    radius: f64,
    clusters: Option<usize>,
    mut config: Config,
    output: Option<PathBuf>,
) -> Result<()> {
    let start_time = Instant::now();

    let centers = parse_rows(&centers, ';')?;
    let source = ClusterSource::new(centers, radius, points)?;

    let mut rng = match config.network.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(2)),
        None => ChaCha8Rng::from_entropy(),
    };
    let samples = source.generate(&mut rng)?;
    let data: Vec<Vec<f64>> = samples.iter().map(|s| s.point.clone()).collect();

    config.network.layer_sizes = vec![clusters.unwrap_or(source.centers.len())];
    config.network.input_width = source.width();

    println!("Kohonen vector quantizer");
    println!(
        "   {} points around {} centers, radius {}",
        data.len(),
        source.centers.len(),
        radius
    );
    println!();

    let quantizer = fit_with_progress(config, &data)?;
    let labels = quantizer.classify_batch(&data)?;

    let k = quantizer.network().clusters();
    let mut table = vec![vec![0usize; source.centers.len()]; k];
    for (sample, &label) in samples.iter().zip(&labels) {
        table[label][sample.center] += 1;
    }

    println!("Cluster assignments (rows: clusters, columns: source centers):");
    for (cluster, row) in table.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|n| format!("{:>5}", n)).collect();
        println!("  cluster {:>2}: {}", cluster, cells.join(" "));
    }

    let majority: usize = table.iter().map(|row| row.iter().copied().max().unwrap_or(0)).sum();
    println!(
        "✓ Purity: {:.1}%",
        100.0 * majority as f64 / data.len().max(1) as f64
    );

    if let Some(path) = output {
        write_plot(&path, &data, &labels)?;
    }

    println!("Done in {}", HumanDuration(start_time.elapsed()));
    Ok(())
}

fn cluster_file(input: PathBuf, layers: String, mut config: Config, output: Option<PathBuf>) -> Result<()> {
    let file = File::open(&input)?;
    let reader = BufReader::new(file);

    let mut data: Vec<Vec<f64>> = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = parse_row(trimmed).map_err(|e| {
            KohonenError::Parse(format!("{}:{}: {}", input.display(), line_no + 1, e))
        })?;
        data.push(row);
    }

    let width = data.first().map(Vec::len).ok_or(KohonenError::EmptyTrainingSet)?;

    config.network.layer_sizes = parse_sizes(&layers)?;
    config.network.input_width = width;

    let quantizer = fit_with_progress(config, &data)?;
    let labels = quantizer.classify_batch(&data)?;

    for (i, label) in labels.iter().enumerate() {
        println!("{}\t{}", i, label);
    }

    if let Some(path) = output {
        write_plot(&path, &data, &labels)?;
    }

    Ok(())
}

fn fit_with_progress(config: Config, data: &[Vec<f64>]) -> Result<Quantizer> {
    let bar_style = ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ");

    let pb = ProgressBar::new(config.training.epochs as u64);
    pb.set_style(bar_style);
    pb.set_message("Training...");

    let mut trainer = Trainer::new(config.training.clone());
    let mut quantizer = Quantizer::new(config)?;
    let report = quantizer.fit_with_trainer(&mut trainer, data, |_| pb.inc(1))?;

    pb.finish_and_clear();
    println!(
        "✓ Trained {} clusters: {} epochs, {} updates, quantization error {:.6}",
        quantizer.network().clusters(),
        format_number(report.epochs_completed),
        format_number(report.updates),
        report.quantization_error
    );

    Ok(quantizer)
}

fn write_plot(path: &Path, data: &[Vec<f64>], labels: &[usize]) -> Result<()> {
    let mut plot = ScatterPlot::new(800, 800);
    plot.extend(data, labels)?;
    plot.save(path)?;
    println!("✓ Wrote scatter plot to {}", path.display());
    Ok(())
}

/// Parses "1,2;3,4" style lists of vectors.
fn parse_rows(s: &str, separator: char) -> Result<Vec<Vec<f64>>> {
    s.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_row(part).map_err(KohonenError::Parse))
        .collect()
}

fn parse_row(s: &str) -> std::result::Result<Vec<f64>, String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {}", field, e))
        })
        .collect()
}

fn parse_sizes(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .map(|field| {
            field
                .parse::<usize>()
                .map_err(|e| KohonenError::Parse(format!("invalid layer size '{}': {}", field, e)))
        })
        .collect()
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows("10,10; 20 , 20 ;", ';').unwrap();
        assert_eq!(rows, vec![vec![10.0, 10.0], vec![20.0, 20.0]]);
        assert!(parse_rows("1,x", ';').is_err());
    }

    #[test]
    fn test_parse_row_separators() {
        assert_eq!(parse_row("1.5, -2\t3").unwrap(), vec![1.5, -2.0, 3.0]);
    }

    #[test]
    fn test_parse_sizes() {
        assert_eq!(parse_sizes("4, 2").unwrap(), vec![4, 2]);
        assert!(parse_sizes("2,-1").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_build_config() {
        let config = build_config(5, Some(9), Band::Unit, true);
        assert_eq!(config.network.weight_range, WeightRange::UNIT);
        assert_eq!(config.network.normalization, NormalizationStrategy::None);
        assert_eq!(config.network.seed, Some(9));
        assert_eq!(config.training.seed, Some(10));
        assert_eq!(config.training.epochs, 5);
    }
}
