//! Error handling and error types for treeboost.
//!
//! All fallible operations in the crate report through [`TreeBoostError`],
//! propagated with Rust's `Result` type system.

use std::io;
use thiserror::Error;

/// Main error type for the treeboost library.
///
/// Covers the error conditions that can occur during dataset construction,
/// model training, prediction, and persistence. There is deliberately no
/// "not fitted" variant: an untrained model has no prediction surface, so
/// the condition is unrepresentable.
#[derive(Error, Debug)]
pub enum TreeBoostError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Dataset-related errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Training-related errors
    #[error("Training error: {message}")]
    Training { message: String },

    /// Prediction errors
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// Model serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// JSON errors from the hyperparameter mapping surface
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Bincode errors from model artifact encoding
    #[error("Bincode error: {source}")]
    Bincode {
        #[from]
        source: bincode::Error,
    },
}

/// Type alias for Results using TreeBoostError
pub type Result<T> = std::result::Result<T, TreeBoostError>;

impl TreeBoostError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        TreeBoostError::Config {
            message: message.into(),
        }
    }

    /// Create a dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        TreeBoostError::Dataset {
            message: message.into(),
        }
    }

    /// Create a training error
    pub fn training<S: Into<String>>(message: S) -> Self {
        TreeBoostError::Training {
            message: message.into(),
        }
    }

    /// Create a prediction error
    pub fn prediction<S: Into<String>>(message: S) -> Self {
        TreeBoostError::Prediction {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        TreeBoostError::Serialization {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        TreeBoostError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        TreeBoostError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Category name for this error, used in logs and diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            TreeBoostError::Config { .. } => "config",
            TreeBoostError::Dataset { .. } => "dataset",
            TreeBoostError::Training { .. } => "training",
            TreeBoostError::Prediction { .. } => "prediction",
            TreeBoostError::Serialization { .. } => "serialization",
            TreeBoostError::InvalidParameter { .. } => "invalid_parameter",
            TreeBoostError::DimensionMismatch { .. } => "dimension_mismatch",
            TreeBoostError::IO { .. } => "io",
            TreeBoostError::Json { .. } => "json",
            TreeBoostError::Bincode { .. } => "bincode",
        }
    }
}
