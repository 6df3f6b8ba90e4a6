//! Classifiers
//!
//! Decision Tree, Gaussian Naive Bayes, Random Forest and k-Nearest Neighbors
//! wrap the smartcore implementations; AdaBoost boosts weighted trees of its
//! own. All of them sit behind the common [`Classifier`] trait.

mod adaboost;
mod decision_tree;
mod knn;
mod naive_bayes;
mod random_forest;
mod weighted_tree;

pub use adaboost::{AdaBoost, AdaBoostConfig};
pub use decision_tree::{DecisionTree, TreeConfig};
pub use knn::{KNeighbors, KnnConfig, Weighting};
pub use naive_bayes::{GaussianNaiveBayes, NaiveBayesConfig};
pub use random_forest::{ForestConfig, RandomForest};

use crate::config::ModelConfig;
use crate::error::{Result, ToyError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;
use std::str::FromStr;

/// A supervised classifier over dense feature rows and integer labels
pub trait Classifier {
    /// Display name, also used for output file names
    fn name(&self) -> &'static str;

    /// Fit on `x` (n x d) with labels `y` (n)
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()>;

    /// Predict one label per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>>;

    /// Fraction of rows whose prediction matches `y`
    fn accuracy(&self, x: &Array2<f64>, y: &[usize]) -> Result<f64> {
        let predictions = self.predict(x)?;
        accuracy(&predictions, y)
    }
}

/// Fraction of equal entries
pub fn accuracy(predictions: &[usize], truth: &[usize]) -> Result<f64> {
    if predictions.len() != truth.len() {
        return Err(ToyError::ShapeMismatch {
            what: "predictions",
            expected: truth.len(),
            actual: predictions.len(),
        });
    }
    if truth.is_empty() {
        return Err(ToyError::EmptyDataset);
    }

    let correct = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Validate training input and return the number of classes
pub(crate) fn check_training_input(x: &Array2<f64>, y: &[usize]) -> Result<usize> {
    if x.nrows() == 0 {
        return Err(ToyError::EmptyDataset);
    }
    if x.ncols() == 0 {
        return Err(ToyError::InvalidParameter("no feature columns".to_string()));
    }
    if x.nrows() != y.len() {
        return Err(ToyError::ShapeMismatch {
            what: "labels",
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    Ok(y.iter().max().map(|&l| l + 1).unwrap_or(0))
}

pub(crate) fn check_features(x: &Array2<f64>, n_features: usize) -> Result<()> {
    if x.ncols() != n_features {
        return Err(ToyError::ShapeMismatch {
            what: "feature columns",
            expected: n_features,
            actual: x.ncols(),
        });
    }
    Ok(())
}

/// Copy an ndarray feature matrix into smartcore's dense layout
pub(crate) fn to_dense(x: &Array2<f64>) -> Result<DenseMatrix<f64>> {
    let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
        .map_err(|e| ToyError::Model(format!("Failed to create feature matrix: {:?}", e)))
}

/// Labels as smartcore targets
pub(crate) fn to_targets(y: &[usize]) -> Result<Vec<u32>> {
    y.iter()
        .map(|&label| {
            u32::try_from(label)
                .map_err(|_| ToyError::InvalidParameter(format!("label {} too large", label)))
        })
        .collect()
}

pub(crate) fn from_targets(y: Vec<u32>) -> Vec<usize> {
    y.into_iter().map(|label| label as usize).collect()
}

/// Index of the largest score; ties go to the lowest index
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

/// The classifiers the demo knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    DecisionTree,
    NaiveBayes,
    RandomForest,
    KNeighbors,
    AdaBoost,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::DecisionTree,
        ModelKind::NaiveBayes,
        ModelKind::RandomForest,
        ModelKind::KNeighbors,
        ModelKind::AdaBoost,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::DecisionTree => "DecisionTree",
            ModelKind::NaiveBayes => "NaiveBayes",
            ModelKind::RandomForest => "RandomForest",
            ModelKind::KNeighbors => "KNeighbors",
            ModelKind::AdaBoost => "AdaBoost",
        }
    }

    /// Build an unfitted model from its configuration section
    pub fn build(&self, config: &ModelConfig) -> Box<dyn Classifier> {
        match self {
            ModelKind::DecisionTree => Box::new(DecisionTree::new(config.decision_tree.clone())),
            ModelKind::NaiveBayes => Box::new(GaussianNaiveBayes::new(config.naive_bayes.clone())),
            ModelKind::RandomForest => Box::new(RandomForest::new(config.random_forest.clone())),
            ModelKind::KNeighbors => Box::new(KNeighbors::new(config.k_neighbors.clone())),
            ModelKind::AdaBoost => Box::new(AdaBoost::new(config.ada_boost.clone())),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ToyError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "decisiontree" | "tree" => Ok(ModelKind::DecisionTree),
            "naivebayes" | "gaussiannb" | "nb" => Ok(ModelKind::NaiveBayes),
            "randomforest" | "forest" => Ok(ModelKind::RandomForest),
            "kneighbors" | "knn" => Ok(ModelKind::KNeighbors),
            "adaboost" => Ok(ModelKind::AdaBoost),
            _ => Err(ToyError::UnknownModel(s.trim().to_string())),
        }
    }
}
