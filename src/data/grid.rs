//! Regular grid covering the samples, used to sample decision boundaries

use crate::error::{Result, ToyError};
use ndarray::{Array1, Array2};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Bounding box of an n x 2 feature matrix
    pub fn from_features(features: &Array2<f64>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(ToyError::EmptyDataset);
        }
        if features.ncols() != 2 {
            return Err(ToyError::ShapeMismatch {
                what: "feature columns",
                expected: 2,
                actual: features.ncols(),
            });
        }

        let (x_min, x_max) = min_max(features.column(0).iter().copied());
        let (y_min, y_max) = min_max(features.column(1).iter().copied());

        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Grow a degenerate (zero-width) axis so that it can be sampled
    fn widened(mut self) -> Self {
        if self.width() <= f64::EPSILON {
            self.x_min -= 0.5;
            self.x_max += 0.5;
        }
        if self.height() <= f64::EPSILON {
            self.y_min -= 0.5;
            self.y_max += 0.5;
        }
        self
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// `resolution x resolution` lattice; x varies fastest in [`Grid::points`]
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Grid {
    /// Grid spanning `bounds` with `resolution` points per axis
    pub fn covering(bounds: &Bounds, resolution: usize) -> Result<Self> {
        if resolution < 2 {
            return Err(ToyError::InvalidParameter(format!(
                "grid resolution must be at least 2, got {}",
                resolution
            )));
        }

        let bounds = bounds.widened();
        let xs = Array1::linspace(bounds.x_min, bounds.x_max, resolution).to_vec();
        let ys = Array1::linspace(bounds.y_min, bounds.y_max, resolution).to_vec();

        Ok(Self { xs, ys })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates of the `idx`-th lattice point
    pub fn point(&self, idx: usize) -> (f64, f64) {
        let nx = self.xs.len();
        (self.xs[idx % nx], self.ys[idx / nx])
    }

    /// All lattice points as an n x 2 matrix
    pub fn points(&self) -> Array2<f64> {
        let mut points = Array2::zeros((self.len(), 2));
        for (j, &y) in self.ys.iter().enumerate() {
            for (i, &x) in self.xs.iter().enumerate() {
                let row = j * self.xs.len() + i;
                points[[row, 0]] = x;
                points[[row, 1]] = y;
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_bounds() {
        let features = array![[1.0, -2.0], [3.0, 5.0], [-1.0, 0.0]];
        let bounds = Bounds::from_features(&features).unwrap();

        assert_eq!(bounds.x_min, -1.0);
        assert_eq!(bounds.x_max, 3.0);
        assert_eq!(bounds.y_min, -2.0);
        assert_eq!(bounds.y_max, 5.0);
    }

    #[test]
    fn test_grid_uses_each_axis_range() {
        let bounds = Bounds {
            x_min: 0.0,
            x_max: 1.0,
            y_min: -10.0,
            y_max: 10.0,
        };
        let grid = Grid::covering(&bounds, 5).unwrap();

        assert_eq!(grid.len(), 25);
        assert_relative_eq!(grid.xs()[4], 1.0);
        assert_relative_eq!(grid.ys()[0], -10.0);
        assert_relative_eq!(grid.ys()[4], 10.0);
    }

    #[test]
    fn test_x_varies_fastest() {
        let bounds = Bounds {
            x_min: 0.0,
            x_max: 2.0,
            y_min: 0.0,
            y_max: 4.0,
        };
        let grid = Grid::covering(&bounds, 3).unwrap();
        let points = grid.points();

        assert_eq!(points.row(1).to_vec(), vec![1.0, 0.0]);
        assert_eq!(points.row(3).to_vec(), vec![0.0, 2.0]);
        assert_eq!(grid.point(5), (2.0, 2.0));
    }

    #[test]
    fn test_degenerate_axis_is_widened() {
        let features = array![[1.0, 1.0], [1.0, 1.0]];
        let bounds = Bounds::from_features(&features).unwrap();
        let grid = Grid::covering(&bounds, 2).unwrap();

        assert_relative_eq!(grid.xs()[0], 0.5);
        assert_relative_eq!(grid.xs()[1], 1.5);
    }

    #[test]
    fn test_invalid_inputs() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            Bounds::from_features(&empty),
            Err(ToyError::EmptyDataset)
        ));

        let bounds = Bounds {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert!(Grid::covering(&bounds, 1).is_err());
    }
}
