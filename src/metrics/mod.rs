//! Evaluation metrics for classification models.

use crate::core::constants::PROBABILITY_EPSILON;
use crate::core::error::{Result, TreeBoostError};
use crate::core::types::{ClassIndex, Label, Score};
use ndarray::{ArrayView1, ArrayView2};

/// Fraction of rows where the predicted label equals the true label.
pub fn accuracy(predictions: ArrayView1<'_, Label>, targets: ArrayView1<'_, Label>) -> Result<f64> {
    if predictions.len() != targets.len() {
        return Err(TreeBoostError::dimension_mismatch(
            format!("targets length: {}", targets.len()),
            format!("predictions length: {}", predictions.len()),
        ));
    }
    if predictions.is_empty() {
        return Err(TreeBoostError::dataset("empty prediction vector"));
    }

    let correct = predictions
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| p == t)
        .count();
    Ok(correct as f64 / predictions.len() as f64)
}

/// Mean negative log-probability of the true class.
///
/// `probabilities` is a `num_rows x num_classes` matrix; `class_ids` holds the
/// true contiguous class index per row. Probabilities are clamped away from
/// zero before the logarithm. This is the per-iteration training loss the
/// booster reports.
pub fn multiclass_log_loss(probabilities: ArrayView2<'_, Score>, class_ids: &[ClassIndex]) -> f64 {
    let num_data = class_ids.len();
    if num_data == 0 {
        return 0.0;
    }
    let total: f64 = class_ids
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let p = probabilities[[i, c]].max(PROBABILITY_EPSILON);
            -p.ln()
        })
        .sum();
    total / num_data as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_accuracy_exact_match() {
        let predictions = arr1(&[0.0, 1.0, 2.0, 1.0]);
        let targets = arr1(&[0.0, 1.0, 2.0, 1.0]);
        assert_eq!(accuracy(predictions.view(), targets.view()).unwrap(), 1.0);
    }

    #[test]
    fn test_accuracy_partial() {
        let predictions = arr1(&[0.0, 1.0, 2.0, 2.0]);
        let targets = arr1(&[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(accuracy(predictions.view(), targets.view()).unwrap(), 0.5);
    }

    #[test]
    fn test_accuracy_length_mismatch() {
        let predictions = arr1(&[0.0, 1.0]);
        let targets = arr1(&[0.0]);
        assert!(accuracy(predictions.view(), targets.view()).is_err());
    }

    #[test]
    fn test_log_loss_perfect_predictions() {
        let probabilities = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let loss = multiclass_log_loss(probabilities.view(), &[0, 1]);
        assert!(loss.abs() < 1e-12);
    }

    #[test]
    fn test_log_loss_uniform_predictions() {
        let probabilities = arr2(&[[0.5, 0.5], [0.5, 0.5]]);
        let loss = multiclass_log_loss(probabilities.view(), &[0, 1]);
        assert!((loss - 2.0_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_log_loss_clamps_zero_probability() {
        let probabilities = arr2(&[[0.0, 1.0]]);
        let loss = multiclass_log_loss(probabilities.view(), &[0]);
        assert!(loss.is_finite());
        assert!(loss > 0.0);
    }
}
