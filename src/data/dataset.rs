//! Labeled sample matrix built from per-class point clouds

use super::grid::Bounds;
use super::toy::Points;
use crate::error::{Result, ToyError};
use ndarray::Array2;
use std::path::Path;
use tracing::debug;

/// Samples (n x 2) with one class label per row
#[derive(Debug, Clone)]
pub struct LabeledSamples {
    /// Feature matrix, one `(x, y)` row per sample
    pub features: Array2<f64>,
    /// Class label of each row
    pub labels: Vec<usize>,
    n_classes: usize,
}

impl LabeledSamples {
    /// Wrap an existing feature matrix and label vector
    pub fn new(features: Array2<f64>, labels: Vec<usize>) -> Result<Self> {
        if features.ncols() != 2 {
            return Err(ToyError::ShapeMismatch {
                what: "feature columns",
                expected: 2,
                actual: features.ncols(),
            });
        }
        if features.nrows() != labels.len() {
            return Err(ToyError::ShapeMismatch {
                what: "labels",
                expected: features.nrows(),
                actual: labels.len(),
            });
        }

        let n_classes = labels.iter().max().map(|&l| l + 1).unwrap_or(0);
        Ok(Self {
            features,
            labels,
            n_classes,
        })
    }

    /// Stack the classes in order; class `i` gets label `i`
    pub fn from_classes(classes: &[Points]) -> Result<Self> {
        for class in classes {
            if class.xs.len() != class.ys.len() {
                return Err(ToyError::ShapeMismatch {
                    what: "class coordinates",
                    expected: class.xs.len(),
                    actual: class.ys.len(),
                });
            }
        }

        let n: usize = classes.iter().map(Points::len).sum();
        let mut features = Array2::zeros((n, 2));
        let mut labels = Vec::with_capacity(n);

        let mut row = 0;
        for (label, class) in classes.iter().enumerate() {
            for (x, y) in class.iter() {
                features[[row, 0]] = x;
                features[[row, 1]] = y;
                labels.push(label);
                row += 1;
            }
        }

        debug!(samples = n, classes = classes.len(), "stacked toy classes");

        Ok(Self {
            features,
            labels,
            n_classes: classes.len(),
        })
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Bounding box of all samples
    pub fn bounds(&self) -> Result<Bounds> {
        Bounds::from_features(&self.features)
    }

    /// Points grouped back by label
    pub fn class_points(&self) -> Result<Vec<Points>> {
        split_by_label(&self.features, &self.labels, self.n_classes)
    }

    /// Write `x,y,label` rows
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["x", "y", "label"])?;

        for (row, label) in self.features.rows().into_iter().zip(self.labels.iter()) {
            writer.write_record(&[row[0].to_string(), row[1].to_string(), label.to_string()])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Read back a file written by [`LabeledSamples::save_csv`]
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut values = Vec::new();
        let mut labels = Vec::new();

        for record in reader.records() {
            let record = record?;
            if record.len() != 3 {
                return Err(ToyError::ShapeMismatch {
                    what: "CSV columns",
                    expected: 3,
                    actual: record.len(),
                });
            }
            for field in record.iter().take(2) {
                let v: f64 = field
                    .trim()
                    .parse()
                    .map_err(|_| ToyError::InvalidParameter(format!("bad coordinate {:?}", field)))?;
                values.push(v);
            }
            let label: usize = record[2]
                .trim()
                .parse()
                .map_err(|_| ToyError::InvalidParameter(format!("bad label {:?}", &record[2])))?;
            labels.push(label);
        }

        let features = Array2::from_shape_vec((labels.len(), 2), values).map_err(|_| {
            ToyError::InvalidParameter("CSV rows do not form an n x 2 matrix".to_string())
        })?;
        Self::new(features, labels)
    }
}

/// Split rows of `features` into one point cloud per label
pub fn split_by_label(
    features: &Array2<f64>,
    labels: &[usize],
    n_classes: usize,
) -> Result<Vec<Points>> {
    if features.nrows() != labels.len() {
        return Err(ToyError::ShapeMismatch {
            what: "labels",
            expected: features.nrows(),
            actual: labels.len(),
        });
    }

    let mut groups = vec![Points::default(); n_classes];
    for (row, &label) in features.rows().into_iter().zip(labels.iter()) {
        if label >= n_classes {
            return Err(ToyError::InvalidParameter(format!(
                "label {} outside {} classes",
                label, n_classes
            )));
        }
        groups[label].push(row[0], row[1]);
    }
    Ok(groups)
}
