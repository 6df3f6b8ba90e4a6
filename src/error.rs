//! Error types

use thiserror::Error;

/// Errors raised while generating data, fitting models or rendering images
#[derive(Error, Debug)]
pub enum ToyError {
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("model has not been fitted")]
    NotFitted,

    #[error("model failed: {0}")]
    Model(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("unknown renderer: {0}")]
    UnknownRenderer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("gnuplot failed: {0}")]
    Gnuplot(String),
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, ToyError>;
