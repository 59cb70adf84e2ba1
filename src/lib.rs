//! # treeboost
//!
//! A gradient-boosted-tree multiclass classifier behind a uniform
//! training/inference/persistence interface, designed to slot into a larger
//! pipeline that handles data loading and feature preprocessing elsewhere.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use treeboost::{Classifier, Dataset, Hyperparameters};
//! use ndarray::{arr1, arr2};
//!
//! # fn main() -> treeboost::Result<()> {
//! let features = arr2(&[
//!     [0.1, 0.2],
//!     [0.2, 0.1],
//!     [5.0, 5.1],
//!     [5.1, 5.0],
//! ]);
//! let labels = arr1(&[0.0, 0.0, 1.0, 1.0]);
//! let dataset = Dataset::new(features.clone(), labels)?;
//!
//! // Fitting consumes nothing and yields a trained model; prediction and
//! // persistence only exist on the trained type.
//! let hyperparameters = Hyperparameters::new().iterations(50).depth(4);
//! let model = Classifier::new(hyperparameters).fit(&dataset)?;
//!
//! let predictions = model.predict(features.view())?;
//! let probabilities = model.predict_proba(features.view())?;
//! let accuracy = model.evaluate(&dataset)?;
//!
//! model.save("model_dir")?;
//! let restored = treeboost::TrainedClassifier::load("model_dir")?;
//! assert_eq!(restored.predict(features.view())?, predictions);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error handling, fundamental types, constants
//! - [`config`]: hyperparameters and validation
//! - [`dataset`]: feature matrix + label vector wrapper
//! - [`boosting`]: the multiclass softmax gradient-boosting engine
//! - [`metrics`]: accuracy and training loss
//! - [`classifier`]: the `Classifier`/`TrainedClassifier` interface and the
//!   free-function wrappers

#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module
pub mod core;

// Configuration management module
pub mod config;

// Dataset management module
pub mod dataset;

// Boosting engine module
pub mod boosting;

// Metrics module
pub mod metrics;

// Model interface module
pub mod classifier;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::{MODEL_FORMAT_VERSION, PREDICTOR_FILE_NAME},
    error::{Result, TreeBoostError},
    types::{ClassIndex, Label, Score},
};

// Re-export the model interface
pub use classifier::{
    evaluate_predictor_model, load_predictor_model, predict_with_model, save_predictor_model,
    train_predictor_model, Classifier, Prediction, TrainedClassifier, MODEL_NAME,
};

pub use config::Hyperparameters;
pub use dataset::Dataset;
pub use metrics::accuracy;
