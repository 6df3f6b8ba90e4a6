//! AdaBoost (multi-class SAMME) over shallow decision trees

use super::weighted_tree::WeightedTree;
use super::{argmax, check_training_input, Classifier};
use crate::error::{Result, ToyError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaBoostConfig {
    /// Maximum number of boosting rounds
    pub n_estimators: usize,
    /// Depth of each weak learner
    pub max_depth: usize,
    /// Shrinks each learner's vote
    pub learning_rate: f64,
}

impl Default for AdaBoostConfig {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            max_depth: 3,
            learning_rate: 1.0,
        }
    }
}

/// Boosted ensemble of weighted decision trees
#[derive(Debug, Clone)]
pub struct AdaBoost {
    config: AdaBoostConfig,
    estimators: Vec<(WeightedTree, f64)>,
    n_classes: usize,
}

impl AdaBoost {
    pub fn new(config: AdaBoostConfig) -> Self {
        Self {
            config,
            estimators: Vec::new(),
            n_classes: 0,
        }
    }

    /// Number of weak learners kept after fitting
    pub fn n_estimators(&self) -> usize {
        self.estimators.len()
    }
}

impl Classifier for AdaBoost {
    fn name(&self) -> &'static str {
        "AdaBoost"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        let n_classes = check_training_input(x, y)?;
        if self.config.n_estimators == 0 || self.config.max_depth == 0 {
            return Err(ToyError::InvalidParameter(
                "AdaBoost needs at least one estimator of depth >= 1".to_string(),
            ));
        }
        if !(self.config.learning_rate > 0.0) {
            return Err(ToyError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.config.learning_rate
            )));
        }

        let n = y.len();
        let chance = 1.0 - 1.0 / n_classes.max(2) as f64;
        let mut weights = vec![1.0 / n as f64; n];
        let mut estimators = Vec::with_capacity(self.config.n_estimators);

        for round in 0..self.config.n_estimators {
            let mut tree = WeightedTree::new(Some(self.config.max_depth));
            tree.fit(x, y, &weights)?;
            debug!(
                round,
                depth = tree.depth(),
                leaf_sizes = ?tree.leaf_sizes(),
                "weak learner fitted"
            );

            let predictions = tree.predict(x)?;
            let total: f64 = weights.iter().sum();
            let error: f64 = predictions
                .iter()
                .zip(y.iter())
                .zip(weights.iter())
                .filter(|((p, t), _)| p != t)
                .map(|(_, w)| w)
                .sum::<f64>()
                / total;

            if error <= 0.0 {
                estimators.push((tree, 1.0));
                debug!(round, "perfect weak learner, stopping");
                break;
            }
            if error >= chance {
                if estimators.is_empty() {
                    estimators.push((tree, 1.0));
                }
                debug!(round, error, "weak learner no better than chance, stopping");
                break;
            }

            let alpha = self.config.learning_rate
                * (((1.0 - error) / error).ln() + ((n_classes as f64) - 1.0).ln());

            for ((w, p), t) in weights.iter_mut().zip(predictions.iter()).zip(y.iter()) {
                if p != t {
                    *w *= alpha.exp();
                }
            }
            let total: f64 = weights.iter().sum();
            for w in &mut weights {
                *w /= total;
            }

            estimators.push((tree, alpha));
        }

        self.estimators = estimators;
        self.n_classes = n_classes;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        if self.estimators.is_empty() {
            return Err(ToyError::NotFitted);
        }

        let mut scores = vec![vec![0.0; self.n_classes]; x.nrows()];
        for (tree, alpha) in &self.estimators {
            for (row, class) in tree.predict(x)?.into_iter().enumerate() {
                scores[row][class] += alpha;
            }
        }

        Ok(scores.iter().map(|s| argmax(s)).collect())
    }
}
