//! Configuration management
//!
//! Provides unified configuration for data generation, models, plotting and
//! output. Every section falls back to its defaults when absent from the TOML.

use crate::data::DatasetKind;
use crate::error::{Result, ToyError};
use crate::models::{
    AdaBoostConfig, ForestConfig, KnnConfig, ModelKind, NaiveBayesConfig, TreeConfig,
};
use crate::plot::{ImageConfig, RendererKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data configuration
    pub data: DataConfig,
    /// Model configuration
    pub model: ModelConfig,
    /// Plot configuration
    pub plot: PlotConfig,
    /// Output configuration
    pub output: OutputConfig,
}

/// Data-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Datasets to generate, in output order
    pub datasets: Vec<DatasetKind>,
    /// Points per class
    pub samples_per_class: usize,
    /// Standard deviation of the coordinate jitter
    pub noise: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            datasets: vec![DatasetKind::Galaxy, DatasetKind::Donut],
            samples_per_class: 100,
            noise: 0.5,
            seed: 42,
        }
    }
}

/// Model-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Models to fit, in output order
    pub models: Vec<ModelKind>,
    pub decision_tree: TreeConfig,
    pub naive_bayes: NaiveBayesConfig,
    pub random_forest: ForestConfig,
    pub k_neighbors: KnnConfig,
    pub ada_boost: AdaBoostConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            models: ModelKind::ALL.to_vec(),
            decision_tree: TreeConfig::default(),
            naive_bayes: NaiveBayesConfig::default(),
            random_forest: ForestConfig::default(),
            k_neighbors: KnnConfig::default(),
            ada_boost: AdaBoostConfig::default(),
        }
    }
}

/// Plot-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Grid points per axis for decision maps
    pub resolution: usize,
    /// Image backend
    pub renderer: RendererKind,
    /// Draw the training samples on top of decision maps
    pub overlay_samples: bool,
    pub image: ImageConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            resolution: 200,
            renderer: RendererKind::Native,
            overlay_samples: false,
            image: ImageConfig::default(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the images
    pub dir: PathBuf,
    /// Also write each dataset as CSV
    pub save_data: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            save_data: false,
        }
    }
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to TOML file
    pub fn save_toml(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Reject values that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.data.samples_per_class == 0 {
            return Err(ToyError::InvalidParameter(
                "samples_per_class must be positive".to_string(),
            ));
        }
        if !(self.data.noise >= 0.0) {
            return Err(ToyError::InvalidParameter(format!(
                "noise must be non-negative, got {}",
                self.data.noise
            )));
        }
        if self.plot.resolution < 2 {
            return Err(ToyError::InvalidParameter(format!(
                "resolution must be at least 2, got {}",
                self.plot.resolution
            )));
        }
        self.plot.image.validate()
    }
}
