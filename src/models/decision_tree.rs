//! Decision Tree classifier
//!
//! Thin wrapper around smartcore's CART implementation with Gini splits.

use super::{check_features, check_training_input, from_targets, to_dense, to_targets, Classifier};
use crate::error::{Result, ToyError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};
use tracing::debug;

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until pure)
    pub max_depth: Option<u16>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeConfig {
    fn parameters(&self) -> DecisionTreeClassifierParameters {
        let params = DecisionTreeClassifierParameters::default()
            .with_criterion(SplitCriterion::Gini)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf);

        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

/// Decision Tree model
#[derive(Debug)]
pub struct DecisionTree {
    config: TreeConfig,
    model: Option<DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    n_features: usize,
}

impl DecisionTree {
    /// Create a new decision tree with config
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            model: None,
            n_features: 0,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &'static str {
        "DecisionTree"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_input(x, y)?;
        if self.config.min_samples_split < 2 || self.config.min_samples_leaf == 0 {
            return Err(ToyError::InvalidParameter(
                "min_samples_split must be >= 2 and min_samples_leaf >= 1".to_string(),
            ));
        }

        let model = DecisionTreeClassifier::fit(
            &to_dense(x)?,
            &to_targets(y)?,
            self.config.parameters(),
        )
        .map_err(|e| ToyError::Model(format!("DecisionTree training failed: {:?}", e)))?;
        debug!(samples = x.nrows(), "decision tree fitted");

        self.model = Some(model);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let model = self.model.as_ref().ok_or(ToyError::NotFitted)?;
        check_features(x, self.n_features)?;

        let predictions = model
            .predict(&to_dense(x)?)
            .map_err(|e| ToyError::Model(format!("DecisionTree prediction failed: {:?}", e)))?;
        Ok(from_targets(predictions))
    }
}
