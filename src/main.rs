//! Toy Boundaries - classifier decision boundaries on synthetic data
//!
//! Usage: cargo run --release -- --datasets galaxy,donut,duo,wave --output-dir plots
//!
//! With no arguments every model is fitted on the galaxy and donut datasets
//! and the images land in the current directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use toy_boundaries::demo::print_summary;
use toy_boundaries::plot::RendererKind;
use toy_boundaries::{Config, DatasetKind, Demo, ModelKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot classifier decision boundaries on toy data")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the generated images
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Datasets to generate (galaxy, donut, duo, wave)
    #[arg(short, long, value_delimiter = ',')]
    datasets: Vec<String>,

    /// Models to fit (DecisionTree, NaiveBayes, RandomForest, KNeighbors, AdaBoost)
    #[arg(short, long, value_delimiter = ',')]
    models: Vec<String>,

    /// Points per class
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid points per axis for decision maps
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Image backend (native, gnuplot). Native images carry no title or key;
    /// use gnuplot for titled figures.
    #[arg(long)]
    renderer: Option<String>,

    /// Draw training samples on top of decision maps
    #[arg(long)]
    overlay: bool,

    /// Also write each dataset as CSV
    #[arg(long)]
    save_data: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

impl Args {
    /// Layer command line overrides on top of the file (or default) config
    fn into_config(self) -> Result<(Config, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::new(),
        };

        if !self.datasets.is_empty() {
            config.data.datasets = self
                .datasets
                .iter()
                .map(|s| s.parse::<DatasetKind>())
                .collect::<toy_boundaries::Result<_>>()?;
        }
        if !self.models.is_empty() {
            config.model.models = self
                .models
                .iter()
                .map(|s| s.parse::<ModelKind>())
                .collect::<toy_boundaries::Result<_>>()?;
        }
        if let Some(dir) = self.output_dir {
            config.output.dir = dir;
        }
        if let Some(n) = self.samples {
            config.data.samples_per_class = n;
        }
        if let Some(seed) = self.seed {
            config.data.seed = seed;
        }
        if let Some(resolution) = self.resolution {
            config.plot.resolution = resolution;
        }
        if let Some(renderer) = &self.renderer {
            config.plot.renderer = renderer.parse::<RendererKind>()?;
        }
        if self.overlay {
            config.plot.overlay_samples = true;
        }
        if self.save_data {
            config.output.save_data = true;
        }

        config.validate().context("Invalid configuration")?;
        Ok((config, self.dump_config))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("toy_boundaries=info")),
        )
        .init();

    let (config, dump_config) = Args::parse().into_config()?;

    if dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    info!(
        datasets = config.data.datasets.len(),
        models = config.model.models.len(),
        renderer = %config.plot.renderer,
        output = %config.output.dir.display(),
        "starting toy boundary demo"
    );

    let demo = Demo::new(config)?;
    let records = demo.run().context("Demo run failed")?;

    print_summary(&records);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_renderer_help_mentions_titles() {
        let command = Args::command();
        let renderer = command
            .get_arguments()
            .find(|arg| arg.get_id() == "renderer")
            .unwrap();

        let help = renderer.get_help().unwrap().to_string();
        assert!(help.contains("no title or key"), "{}", help);
        assert!(help.contains("gnuplot for titled figures"), "{}", help);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "toy_boundaries",
            "--datasets",
            "duo,wave",
            "--models",
            "knn",
            "--renderer",
            "gnuplot",
            "--overlay",
        ]);
        let (config, dump) = args.into_config().unwrap();

        assert!(!dump);
        assert_eq!(config.data.datasets, vec![DatasetKind::Duo, DatasetKind::Wave]);
        assert_eq!(config.model.models, vec![ModelKind::KNeighbors]);
        assert_eq!(config.plot.renderer, RendererKind::Gnuplot);
        assert!(config.plot.overlay_samples);
    }
}
