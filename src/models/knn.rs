//! K-Nearest Neighbors classifier
//!
//! Classifies a sample by the labels of the k closest training examples,
//! using smartcore's Euclidean KNN.

use super::{check_features, check_training_input, from_targets, to_dense, to_targets, Classifier};
use crate::error::{Result, ToyError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::distance::euclidian::Euclidian;
use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};
use smartcore::neighbors::KNNWeightFunction;

/// Neighbor weighting scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// All neighbors have equal weight
    Uniform,
    /// Weight by inverse of distance
    Distance,
}

impl From<Weighting> for KNNWeightFunction {
    fn from(weighting: Weighting) -> Self {
        match weighting {
            Weighting::Uniform => KNNWeightFunction::Uniform,
            Weighting::Distance => KNNWeightFunction::Distance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnConfig {
    /// Number of neighbors to consider
    pub k: usize,
    pub weights: Weighting,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 1,
            weights: Weighting::Uniform,
        }
    }
}

type EuclideanKnn = KNNClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>, Euclidian<f64>>;

/// KNN Classifier
#[derive(Debug)]
pub struct KNeighbors {
    config: KnnConfig,
    model: Option<EuclideanKnn>,
    n_features: usize,
}

impl KNeighbors {
    pub fn new(config: KnnConfig) -> Self {
        Self {
            config,
            model: None,
            n_features: 0,
        }
    }
}

impl Classifier for KNeighbors {
    fn name(&self) -> &'static str {
        "KNeighbors"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_input(x, y)?;
        if self.config.k == 0 || self.config.k > x.nrows() {
            return Err(ToyError::InvalidParameter(format!(
                "k must be in 1..={}, got {}",
                x.nrows(),
                self.config.k
            )));
        }

        let params = KNNClassifierParameters::default()
            .with_k(self.config.k)
            .with_weight(self.config.weights.into());
        let model = KNNClassifier::fit(&to_dense(x)?, &to_targets(y)?, params)
            .map_err(|e| ToyError::Model(format!("KNeighbors training failed: {:?}", e)))?;

        self.model = Some(model);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let model = self.model.as_ref().ok_or(ToyError::NotFitted)?;
        check_features(x, self.n_features)?;

        let predictions = model
            .predict(&to_dense(x)?)
            .map_err(|e| ToyError::Model(format!("KNeighbors prediction failed: {:?}", e)))?;
        Ok(from_targets(predictions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_one_neighbor_memorizes() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let y = vec![0, 1, 1, 0];

        let mut knn = KNeighbors::new(KnnConfig::default());
        knn.fit(&x, &y).unwrap();

        assert_eq!(knn.accuracy(&x, &y).unwrap(), 1.0);
        assert_eq!(knn.predict(&array![[0.9, 0.1]]).unwrap(), vec![1]);
    }

    #[test]
    fn test_majority_vote() {
        let x = array![[0.0, 0.0], [0.1, 0.0], [0.2, 0.0], [3.0, 0.0]];
        let y = vec![1, 0, 0, 1];

        let mut knn = KNeighbors::new(KnnConfig {
            k: 3,
            ..Default::default()
        });
        knn.fit(&x, &y).unwrap();
        assert_eq!(knn.predict(&array![[0.05, 0.0]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_distance_weighting() {
        let x = array![[0.0, 0.0], [2.0, 0.0], [2.1, 0.0]];
        let y = vec![1, 0, 0];

        let mut knn = KNeighbors::new(KnnConfig {
            k: 3,
            weights: Weighting::Distance,
        });
        knn.fit(&x, &y).unwrap();

        // One close neighbor outweighs two distant ones
        assert_eq!(knn.predict(&array![[0.2, 0.0]]).unwrap(), vec![1]);
    }

    #[test]
    fn test_invalid_k() {
        let x = array![[0.0, 0.0], [1.0, 1.0]];
        for k in [0, 3] {
            let mut knn = KNeighbors::new(KnnConfig {
                k,
                ..Default::default()
            });
            assert!(matches!(knn.fit(&x, &[0, 1]), Err(ToyError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_unfitted_and_wrong_width() {
        let knn = KNeighbors::new(KnnConfig::default());
        assert!(matches!(knn.predict(&array![[0.0, 0.0]]), Err(ToyError::NotFitted)));

        let mut knn = KNeighbors::new(KnnConfig::default());
        knn.fit(&array![[0.0, 0.0], [1.0, 1.0]], &[0, 1]).unwrap();
        assert!(matches!(
            knn.predict(&array![[0.0]]),
            Err(ToyError::ShapeMismatch { .. })
        ));
    }
}
