//! Toy data module
//!
//! Synthetic two-class point clouds, the labeled sample matrix built from
//! them, and the grid used to probe a fitted classifier.

mod dataset;
mod grid;
mod toy;

pub use dataset::{split_by_label, LabeledSamples};
pub use grid::{Bounds, Grid};
pub use toy::{DatasetKind, Points, ToyGenerator};
