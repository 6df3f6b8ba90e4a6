//! # Toy Boundaries
//!
//! Synthetic two-class toy datasets ("galaxy" spirals, "donut" rings, "duo"
//! blobs and "wave" bands), a handful of classic classifiers, and images of
//! the raw data and of each classifier's decision boundary.
//!
//! ## Modules
//!
//! - `data` - Toy shape generators, labeled samples and probing grids
//! - `models` - smartcore-backed Decision Tree, Naive Bayes, Random Forest and KNN, plus AdaBoost
//! - `plot` - Scatter and decision map rendering (native PNG or gnuplot)
//! - `demo` - The generate → fit → predict → plot pipeline
//! - `config` - TOML configuration
//! - `error` - Error types

pub mod config;
pub mod data;
pub mod demo;
pub mod error;
pub mod models;
pub mod plot;

pub use config::Config;
pub use data::{DatasetKind, LabeledSamples, ToyGenerator};
pub use demo::{Demo, RunRecord};
pub use error::{Result, ToyError};
pub use models::{Classifier, ModelKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::data::{Bounds, DatasetKind, Grid, LabeledSamples, Points, ToyGenerator};
    pub use crate::demo::{print_summary, Demo, RunRecord};
    pub use crate::error::{Result, ToyError};
    pub use crate::models::{Classifier, ModelKind};
    pub use crate::plot::{DecisionMap, Renderer, RendererKind};
}
