//! Predicted classes laid out on the probing grid

use crate::data::Grid;
use crate::error::{Result, ToyError};

/// One predicted class per grid point
#[derive(Debug, Clone)]
pub struct DecisionMap {
    grid: Grid,
    classes: Vec<usize>,
    n_classes: usize,
}

impl DecisionMap {
    /// Pair a grid with the classifier output for `grid.points()`
    pub fn new(grid: Grid, predictions: Vec<usize>, n_classes: usize) -> Result<Self> {
        if predictions.len() != grid.len() {
            return Err(ToyError::ShapeMismatch {
                what: "grid predictions",
                expected: grid.len(),
                actual: predictions.len(),
            });
        }
        if let Some(&bad) = predictions.iter().find(|&&c| c >= n_classes) {
            return Err(ToyError::InvalidParameter(format!(
                "predicted class {} outside {} classes",
                bad, n_classes
            )));
        }

        Ok(Self {
            grid,
            classes: predictions,
            n_classes,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Class at column `i` (x index) and row `j` (y index)
    pub fn class_at(&self, i: usize, j: usize) -> usize {
        self.classes[j * self.grid.xs().len() + i]
    }

    /// Number of grid points assigned to each class
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &c in &self.classes {
            counts[c] += 1;
        }
        counts
    }
}
