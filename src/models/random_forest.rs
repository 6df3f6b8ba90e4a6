//! Random Forest classifier
//!
//! Bagged Gini trees from smartcore, each split drawing `ceil(sqrt(d))`
//! candidate features unless configured otherwise.

use super::{check_features, check_training_input, from_targets, to_dense, to_targets, Classifier};
use crate::error::{Result, ToyError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::SplitCriterion;
use tracing::debug;

/// Random Forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_estimators: u16,
    /// Maximum depth of each tree
    pub max_depth: Option<u16>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Max features per split (ceil(sqrt(d)) if None)
    pub max_features: Option<usize>,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 10,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Candidate features per split for `n_features` columns
    pub fn features_per_split(&self, n_features: usize) -> usize {
        self.max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize)
            .clamp(1, n_features.max(1))
    }

    fn parameters(&self, n_features: usize) -> RandomForestClassifierParameters {
        let params = RandomForestClassifierParameters::default()
            .with_criterion(SplitCriterion::Gini)
            .with_n_trees(self.n_estimators)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_m(self.features_per_split(n_features))
            .with_seed(self.seed);

        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

/// Random Forest model
#[derive(Debug)]
pub struct RandomForest {
    config: ForestConfig,
    model: Option<RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    n_features: usize,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            model: None,
            n_features: 0,
        }
    }

    /// Number of trees (0 when unfitted)
    pub fn n_trees(&self) -> usize {
        if self.model.is_some() {
            self.config.n_estimators as usize
        } else {
            0
        }
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        "RandomForest"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_input(x, y)?;
        if self.config.n_estimators == 0 {
            return Err(ToyError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.config.min_samples_split < 2 || self.config.min_samples_leaf == 0 {
            return Err(ToyError::InvalidParameter(
                "min_samples_split must be >= 2 and min_samples_leaf >= 1".to_string(),
            ));
        }

        let params = self.config.parameters(x.ncols());
        let model = RandomForestClassifier::fit(&to_dense(x)?, &to_targets(y)?, params)
            .map_err(|e| ToyError::Model(format!("RandomForest training failed: {:?}", e)))?;
        debug!(
            trees = self.config.n_estimators,
            features_per_split = self.config.features_per_split(x.ncols()),
            "random forest fitted"
        );

        self.model = Some(model);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let model = self.model.as_ref().ok_or(ToyError::NotFitted)?;
        check_features(x, self.n_features)?;

        let predictions = model
            .predict(&to_dense(x)?)
            .map_err(|e| ToyError::Model(format!("RandomForest prediction failed: {:?}", e)))?;
        Ok(from_targets(predictions))
    }
}
