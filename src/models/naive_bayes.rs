//! Gaussian Naive Bayes, backed by smartcore

use super::{check_features, check_training_input, from_targets, to_dense, to_targets, Classifier};
use crate::error::{Result, ToyError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::naive_bayes::gaussian::{GaussianNB, GaussianNBParameters};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Class priors, one per label present in the training data
    /// (None = class frequencies)
    pub priors: Option<Vec<f64>>,
}

/// Gaussian Naive Bayes classifier
#[derive(Debug)]
pub struct GaussianNaiveBayes {
    config: NaiveBayesConfig,
    model: Option<GaussianNB<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    n_features: usize,
}

impl GaussianNaiveBayes {
    pub fn new(config: NaiveBayesConfig) -> Self {
        Self {
            config,
            model: None,
            n_features: 0,
        }
    }
}

impl Classifier for GaussianNaiveBayes {
    fn name(&self) -> &'static str {
        "NaiveBayes"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_input(x, y)?;

        let mut params = GaussianNBParameters::default();
        if let Some(priors) = &self.config.priors {
            if priors.iter().any(|p| !(*p > 0.0)) {
                return Err(ToyError::InvalidParameter(format!(
                    "priors must be positive, got {:?}",
                    priors
                )));
            }
            params = params.with_priors(priors.clone());
        }

        let model = GaussianNB::fit(&to_dense(x)?, &to_targets(y)?, params)
            .map_err(|e| ToyError::Model(format!("NaiveBayes training failed: {:?}", e)))?;

        self.model = Some(model);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let model = self.model.as_ref().ok_or(ToyError::NotFitted)?;
        check_features(x, self.n_features)?;

        let predictions = model
            .predict(&to_dense(x)?)
            .map_err(|e| ToyError::Model(format!("NaiveBayes prediction failed: {:?}", e)))?;
        Ok(from_targets(predictions))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_data;
    use super::*;
    use ndarray::array;

    #[test]
    fn test_separated_clusters() {
        let (x, y) = test_data::three_clusters(25, 2);
        let mut nb = GaussianNaiveBayes::new(NaiveBayesConfig::default());
        nb.fit(&x, &y).unwrap();

        assert!(nb.accuracy(&x, &y).unwrap() > 0.98);
    }

    #[test]
    fn test_priors_break_symmetry() {
        // Same mean and spread for both classes; only the prior differs.
        let x = array![[-1.0, -1.0], [1.0, 1.0], [-1.0, -1.0], [1.0, 1.0]];
        let y = vec![0, 0, 1, 1];

        let mut favors_one = GaussianNaiveBayes::new(NaiveBayesConfig {
            priors: Some(vec![0.2, 0.8]),
        });
        favors_one.fit(&x, &y).unwrap();
        assert_eq!(favors_one.predict(&array![[0.0, 0.0]]).unwrap(), vec![1]);

        let mut favors_zero = GaussianNaiveBayes::new(NaiveBayesConfig {
            priors: Some(vec![0.8, 0.2]),
        });
        favors_zero.fit(&x, &y).unwrap();
        assert_eq!(favors_zero.predict(&array![[0.0, 0.0]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_missing_label_never_predicted() {
        let x = array![[0.0, 0.0], [0.1, 0.2], [5.0, 5.0], [5.1, 5.2]];
        let y = vec![0, 0, 2, 2];

        let mut nb = GaussianNaiveBayes::new(NaiveBayesConfig::default());
        nb.fit(&x, &y).unwrap();

        let predictions = nb.predict(&array![[2.5, 2.5], [0.0, 0.0], [5.0, 5.0]]).unwrap();
        assert!(predictions.iter().all(|&p| p != 1));
        assert_eq!(predictions[1], 0);
        assert_eq!(predictions[2], 2);
    }

    #[test]
    fn test_invalid_priors_and_unfitted() {
        let nb = GaussianNaiveBayes::new(NaiveBayesConfig::default());
        assert!(matches!(
            nb.predict(&array![[0.0, 0.0]]),
            Err(ToyError::NotFitted)
        ));

        let (x, y) = test_data::separated(5, 1);
        let mut nb = GaussianNaiveBayes::new(NaiveBayesConfig {
            priors: Some(vec![-0.5, 1.5]),
        });
        assert!(matches!(nb.fit(&x, &y), Err(ToyError::InvalidParameter(_))));
    }
}
