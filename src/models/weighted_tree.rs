//! Weighted CART tree, the weak learner behind AdaBoost
//!
//! Plain Gini impurity over weighted class counts. Thresholds sit between
//! neighboring distinct feature values.

use super::{argmax, check_features, check_training_input};
use crate::error::{Result, ToyError};
use ndarray::Array2;

/// Tree node
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        class: usize,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_sizes(&self, out: &mut Vec<usize>) {
        match self {
            TreeNode::Leaf { n_samples, .. } => out.push(*n_samples),
            TreeNode::Split { left, right, .. } => {
                left.collect_sizes(out);
                right.collect_sizes(out);
            }
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Training data borrowed for the duration of one fit
struct FitData<'a> {
    x: &'a Array2<f64>,
    y: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
}

impl FitData<'_> {
    fn class_weights(&self, indices: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += self.weights[i];
        }
        counts
    }
}

/// Decision tree fitted on weighted samples
#[derive(Debug, Clone)]
pub(crate) struct WeightedTree {
    max_depth: Option<usize>,
    root: Option<TreeNode>,
    n_features: usize,
}

impl WeightedTree {
    /// `None` grows the tree until every leaf is pure
    pub(crate) fn new(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            root: None,
            n_features: 0,
        }
    }

    pub(crate) fn fit(&mut self, x: &Array2<f64>, y: &[usize], weights: &[f64]) -> Result<()> {
        let n_classes = check_training_input(x, y)?;
        if weights.len() != y.len() {
            return Err(ToyError::ShapeMismatch {
                what: "sample weights",
                expected: y.len(),
                actual: weights.len(),
            });
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ToyError::InvalidParameter(
                "sample weights must be finite and non-negative".to_string(),
            ));
        }

        let data = FitData {
            x,
            y,
            weights,
            n_classes,
        };
        let indices: Vec<usize> = (0..x.nrows()).collect();

        self.n_features = x.ncols();
        self.root = Some(self.build_tree(&data, &indices, 0));
        Ok(())
    }

    fn build_tree(&self, data: &FitData<'_>, indices: &[usize], depth: usize) -> TreeNode {
        let counts = data.class_weights(indices);
        let impurity = gini(&counts);

        let depth_reached = self.max_depth.map_or(false, |d| depth >= d);
        if depth_reached || indices.len() < 2 || impurity < 1e-12 {
            return leaf(&counts, indices.len());
        }

        match find_best_split(data, indices, impurity) {
            Some(split) => TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(self.build_tree(data, &split.left, depth + 1)),
                right: Box::new(self.build_tree(data, &split.right, depth + 1)),
            },
            None => leaf(&counts, indices.len()),
        }
    }

    pub(crate) fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let root = self.root.as_ref().ok_or(ToyError::NotFitted)?;
        check_features(x, self.n_features)?;

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let mut node = root;
                loop {
                    match node {
                        TreeNode::Leaf { class, .. } => return *class,
                        TreeNode::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            node = if row[*feature] <= *threshold { left } else { right };
                        }
                    }
                }
            })
            .collect())
    }

    /// Depth of the fitted tree (0 when unfitted)
    pub(crate) fn depth(&self) -> usize {
        self.root.as_ref().map(TreeNode::depth).unwrap_or(0)
    }

    /// Samples that reached each leaf, left to right
    pub(crate) fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        if let Some(root) = &self.root {
            root.collect_sizes(&mut sizes);
        }
        sizes
    }
}

/// Find the split with the largest impurity decrease
fn find_best_split(
    data: &FitData<'_>,
    indices: &[usize],
    parent_impurity: f64,
) -> Option<BestSplit> {
    let total = data.class_weights(indices);
    let total_weight: f64 = total.iter().sum();
    if total_weight <= 0.0 {
        return None;
    }

    let mut best_gain = 1e-12;
    let mut best: Option<(usize, f64)> = None;

    for feature in 0..data.x.ncols() {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| {
            data.x[[a, feature]]
                .partial_cmp(&data.x[[b, feature]])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Sweep thresholds left to right, moving one sample at a time
        let mut left = vec![0.0; data.n_classes];
        let mut left_weight = 0.0;

        for pos in 0..order.len() - 1 {
            let i = order[pos];
            left[data.y[i]] += data.weights[i];
            left_weight += data.weights[i];

            let here = data.x[[i, feature]];
            let next = data.x[[order[pos + 1], feature]];
            if here >= next {
                continue;
            }

            let right: Vec<f64> = total.iter().zip(left.iter()).map(|(t, l)| t - l).collect();
            let right_weight = total_weight - left_weight;

            let weighted = (left_weight * gini(&left) + right_weight * gini(&right)) / total_weight;
            let gain = parent_impurity - weighted;

            if gain > best_gain {
                best_gain = gain;
                best = Some((feature, split_threshold(here, next)));
            }
        }
    }

    let (feature, threshold) = best?;
    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| data.x[[i, feature]] <= threshold);

    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some(BestSplit {
        feature,
        threshold,
        left,
        right,
    })
}

/// Midpoint of two distinct sorted values; falls back to `here` when the
/// midpoint rounds up to `next`, which happens for neighboring floats.
fn split_threshold(here: f64, next: f64) -> f64 {
    let mid = here + (next - here) / 2.0;
    if mid >= next {
        here
    } else {
        mid
    }
}

fn leaf(counts: &[f64], n_samples: usize) -> TreeNode {
    TreeNode::Leaf {
        class: argmax(counts),
        n_samples,
    }
}

/// Gini impurity of weighted class counts
fn gini(counts: &[f64]) -> f64 {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::super::test_data;
    use super::*;
    use ndarray::array;

    fn uniform(n: usize) -> Vec<f64> {
        vec![1.0; n]
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4.0, 0.0]), 0.0);
        assert!((gini(&[2.0, 2.0]) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_fits_training_data_exactly() {
        let (x, y) = test_data::three_clusters(30, 4);
        let mut tree = WeightedTree::new(None);
        tree.fit(&x, &y, &uniform(y.len())).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.leaf_sizes().iter().sum::<usize>(), 90);
    }

    #[test]
    fn test_threshold_is_midpoint() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let y = vec![0, 0, 1, 1];

        let mut tree = WeightedTree::new(None);
        tree.fit(&x, &y, &uniform(4)).unwrap();

        let probe = array![[1.99, 0.0], [2.01, 0.0]];
        assert_eq!(tree.predict(&probe).unwrap(), vec![0, 1]);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_neighboring_floats_still_split() {
        let a = f64::from_bits(1.0f64.to_bits() + 1);
        let b = f64::from_bits(1.0f64.to_bits() + 2);
        assert_eq!(split_threshold(a, b), a);

        let x = array![[a, 0.0], [b, 0.0]];
        let y = vec![0, 1];

        let mut tree = WeightedTree::new(None);
        tree.fit(&x, &y, &uniform(2)).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), vec![0, 1]);
        assert_eq!(tree.leaf_sizes(), vec![1, 1]);

        let mut shallow = WeightedTree::new(Some(3));
        shallow.fit(&x, &y, &uniform(2)).unwrap();
        assert_eq!(shallow.predict(&x).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let (x, y) = test_data::three_clusters(20, 8);
        let mut stump = WeightedTree::new(Some(1));
        stump.fit(&x, &y, &uniform(y.len())).unwrap();

        assert_eq!(stump.depth(), 2);
        assert_eq!(stump.leaf_sizes().len(), 2);
    }

    #[test]
    fn test_weights_shift_the_majority() {
        let x = array![[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]];
        let y = vec![0, 0, 1];

        let mut tree = WeightedTree::new(None);
        tree.fit(&x, &y, &[1.0, 1.0, 5.0]).unwrap();
        assert_eq!(tree.predict(&array![[0.0, 0.0]]).unwrap(), vec![1]);
    }

    #[test]
    fn test_errors() {
        let tree = WeightedTree::new(None);
        assert!(matches!(
            tree.predict(&array![[0.0, 0.0]]),
            Err(ToyError::NotFitted)
        ));

        let mut tree = WeightedTree::new(None);
        let x = array![[0.0, 0.0], [1.0, 1.0]];
        assert!(tree.fit(&x, &[0], &[1.0]).is_err());
        assert!(tree.fit(&x, &[0, 1], &[1.0, -1.0]).is_err());

        tree.fit(&x, &[0, 1], &uniform(2)).unwrap();
        assert!(matches!(
            tree.predict(&array![[0.0, 0.0, 0.0]]),
            Err(ToyError::ShapeMismatch { .. })
        ));
    }
}
