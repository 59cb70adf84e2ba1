//! Dataset structure holding a feature matrix and a label vector.
//!
//! A [`Dataset`] is owned by its caller and passed to model operations by
//! reference; the library never mutates it.

use crate::core::error::{Result, TreeBoostError};
use crate::core::types::{Label, Score};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Tabular training or evaluation data: one row per sample, one column per
/// feature, plus a class label for every row.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix (num_data x num_features)
    features: Array2<Score>,
    /// Target labels (num_data,)
    labels: Array1<Label>,
    num_data: usize,
    num_features: usize,
}

impl Dataset {
    /// Create a new dataset from a feature matrix and a label vector.
    ///
    /// Validates that the dataset is non-empty, that the label vector length
    /// matches the number of rows, and that every value is finite. NaN and
    /// infinite values are rejected up front rather than feeding undefined
    /// comparisons into tree construction.
    pub fn new(features: Array2<Score>, labels: Array1<Label>) -> Result<Self> {
        check_consistency(features.view(), labels.view())?;
        let num_data = features.nrows();
        let num_features = features.ncols();
        Ok(Dataset {
            features,
            labels,
            num_data,
            num_features,
        })
    }

    /// Number of samples in the dataset
    pub fn num_data(&self) -> usize {
        self.num_data
    }

    /// Number of feature columns
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Borrow the feature matrix
    pub fn features(&self) -> ArrayView2<'_, Score> {
        self.features.view()
    }

    /// Borrow the label vector
    pub fn labels(&self) -> ArrayView1<'_, Label> {
        self.labels.view()
    }

    /// Distinct label values, sorted ascending.
    ///
    /// The position of a label in this vector is its contiguous class index.
    pub fn distinct_labels(&self) -> Vec<Label> {
        distinct_sorted(self.labels.view())
    }
}

/// Validate a feature matrix and label vector without taking ownership.
///
/// Borrowed data paths (the free training/evaluation functions) run the same
/// checks as [`Dataset::new`] without copying their inputs.
pub(crate) fn check_consistency(
    features: ArrayView2<'_, Score>,
    labels: ArrayView1<'_, Label>,
) -> Result<()> {
    let num_data = features.nrows();
    let num_features = features.ncols();

    if num_data == 0 || num_features == 0 {
        return Err(TreeBoostError::dataset("empty dataset provided"));
    }

    if labels.len() != num_data {
        return Err(TreeBoostError::dimension_mismatch(
            format!("features rows: {}", num_data),
            format!("labels length: {}", labels.len()),
        ));
    }

    if features.iter().any(|v| !v.is_finite()) {
        return Err(TreeBoostError::dataset(
            "feature matrix contains non-finite values",
        ));
    }

    if labels.iter().any(|v| !v.is_finite()) {
        return Err(TreeBoostError::dataset(
            "label vector contains non-finite values",
        ));
    }

    Ok(())
}

/// Distinct label values from a label view, sorted ascending.
pub(crate) fn distinct_sorted(labels: ArrayView1<'_, Label>) -> Vec<Label> {
    let mut labels: Vec<Label> = labels.to_vec();
    labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    labels.dedup();
    labels
}
