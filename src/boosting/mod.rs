//! Multiclass gradient boosting over regression trees.
//!
//! The booster trains with the softmax objective: every round fits one tree
//! per class to the pseudo-residuals `indicator(y == k) - p_k`, with hessians
//! `p_k * (1 - p_k)` and Newton leaf values regularized by `l2_leaf_reg`.
//! Training is deterministic: no row or feature sampling, exact split search.
//!
//! The booster works on contiguous class indices `0..num_classes`; the label
//! mapping lives in the classifier layer above.

pub mod tree;

use crate::core::constants::{MIN_HESSIAN, TRAIN_LOG_FILE_NAME};
use crate::core::error::{Result, TreeBoostError};
use crate::core::types::{ClassIndex, Score};
use crate::metrics::multiclass_log_loss;
use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tree::{RegressionTree, TreeParams};

/// Training parameters for the booster.
#[derive(Debug, Clone, Copy)]
pub struct BoosterParams {
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    /// Number of boosting rounds
    pub iterations: usize,
    /// Depth of each tree
    pub max_depth: usize,
    /// L2 regularization coefficient on leaf values
    pub l2_leaf_reg: f64,
}

/// A trained multiclass boosted-tree model.
///
/// Raw scores start from the log class priors; each round adds the shrunken
/// outputs of `num_classes` trees. Probabilities are the row-wise softmax of
/// the raw scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticlassBooster {
    num_classes: usize,
    num_features: usize,
    /// Initial raw score per class (log prior)
    init_scores: Vec<f64>,
    /// Learning rate the trees were fitted with
    shrinkage: f64,
    /// Trees grouped by round: `trees[round][class]`
    trees: Vec<Vec<RegressionTree>>,
}

impl MulticlassBooster {
    /// Train a booster on the given feature matrix and class indices.
    ///
    /// `train_dir` is a scratch directory for transient training artifacts;
    /// a per-iteration loss file (`learn_error.tsv`) is written into it.
    pub fn train(
        features: ArrayView2<'_, Score>,
        class_ids: &[ClassIndex],
        num_classes: usize,
        params: &BoosterParams,
        train_dir: &Path,
    ) -> Result<Self> {
        let num_data = features.nrows();
        let num_features = features.ncols();

        if num_data == 0 || num_features == 0 {
            return Err(TreeBoostError::training("empty training data"));
        }
        if class_ids.len() != num_data {
            return Err(TreeBoostError::dimension_mismatch(
                format!("features rows: {}", num_data),
                format!("class ids length: {}", class_ids.len()),
            ));
        }
        if num_classes == 0 {
            return Err(TreeBoostError::training("no classes in training data"));
        }
        if let Some(&bad) = class_ids.iter().find(|&&c| c >= num_classes) {
            return Err(TreeBoostError::training(format!(
                "class id {} out of range for {} classes",
                bad, num_classes
            )));
        }

        let mut log_file = BufWriter::new(File::create(train_dir.join(TRAIN_LOG_FILE_NAME))?);
        writeln!(log_file, "iter\tlearn_error")?;

        // Degenerate single-class data: the prior alone predicts perfectly.
        if num_classes == 1 {
            return Ok(MulticlassBooster {
                num_classes,
                num_features,
                init_scores: vec![0.0],
                shrinkage: params.learning_rate,
                trees: Vec::new(),
            });
        }

        let init_scores = log_priors(class_ids, num_classes, num_data);

        let mut scores = Array2::<f64>::zeros((num_data, num_classes));
        for mut row in scores.rows_mut() {
            for (k, s) in row.iter_mut().enumerate() {
                *s = init_scores[k];
            }
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            l2_reg: params.l2_leaf_reg,
            min_samples_leaf: 1,
        };

        let mut trees: Vec<Vec<RegressionTree>> = Vec::with_capacity(params.iterations);
        let mut probabilities = softmax_rows(&scores);

        for iteration in 0..params.iterations {
            // Per-class gradient/hessian buffers from the current probabilities
            let round_trees: Vec<RegressionTree> = (0..num_classes)
                .into_par_iter()
                .map(|k| {
                    let mut gradients = vec![0.0; num_data];
                    let mut hessians = vec![0.0; num_data];
                    for i in 0..num_data {
                        let p = probabilities[[i, k]];
                        let indicator = if class_ids[i] == k { 1.0 } else { 0.0 };
                        gradients[i] = indicator - p;
                        hessians[i] = (p * (1.0 - p)).max(MIN_HESSIAN);
                    }
                    RegressionTree::fit(features, &gradients, &hessians, &tree_params)
                })
                .collect();

            for (k, tree) in round_trees.iter().enumerate() {
                for i in 0..num_data {
                    scores[[i, k]] += params.learning_rate * tree.predict_row(features.row(i));
                }
            }
            trees.push(round_trees);

            probabilities = softmax_rows(&scores);
            let learn_error = multiclass_log_loss(probabilities.view(), class_ids);
            writeln!(log_file, "{}\t{:.6}", iteration, learn_error)?;
            log::debug!("iteration {}: learn_error {:.6}", iteration, learn_error);
        }

        log_file.flush()?;
        log::info!(
            "trained booster: {} rounds, {} classes, {} features",
            trees.len(),
            num_classes,
            num_features
        );

        Ok(MulticlassBooster {
            num_classes,
            num_features,
            init_scores,
            shrinkage: params.learning_rate,
            trees,
        })
    }

    /// Number of classes the booster was trained on
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Number of feature columns the booster expects
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Number of completed boosting rounds
    pub fn num_rounds(&self) -> usize {
        self.trees.len()
    }

    /// Per-class probability matrix (num_rows x num_classes); rows sum to 1.
    pub fn predict_proba(&self, features: ArrayView2<'_, Score>) -> Result<Array2<Score>> {
        let raw = self.raw_scores(features)?;
        Ok(softmax_rows(&raw))
    }

    /// Most probable class index per row.
    pub fn predict_class(&self, features: ArrayView2<'_, Score>) -> Result<Vec<ClassIndex>> {
        let raw = self.raw_scores(features)?;
        Ok(raw
            .rows()
            .into_iter()
            .map(|row| argmax(row.iter().copied()))
            .collect())
    }

    /// Raw (pre-softmax) scores for every row and class.
    fn raw_scores(&self, features: ArrayView2<'_, Score>) -> Result<Array2<f64>> {
        if features.ncols() != self.num_features {
            return Err(TreeBoostError::dimension_mismatch(
                format!("{} features", self.num_features),
                format!("{} features", features.ncols()),
            ));
        }

        let num_data = features.nrows();
        let per_row: Vec<Vec<f64>> = features
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| {
                let mut scores = self.init_scores.clone();
                for round in &self.trees {
                    for (k, tree) in round.iter().enumerate() {
                        scores[k] += self.shrinkage * tree.predict_row(row);
                    }
                }
                scores
            })
            .collect();

        let flat: Vec<f64> = per_row.into_iter().flatten().collect();
        Array2::from_shape_vec((num_data, self.num_classes), flat)
            .map_err(|e| TreeBoostError::prediction(e.to_string()))
    }
}

/// Log class priors, clamped away from empty classes.
fn log_priors(class_ids: &[ClassIndex], num_classes: usize, num_data: usize) -> Vec<f64> {
    let mut counts = vec![0usize; num_classes];
    for &c in class_ids {
        counts[c] += 1;
    }
    counts
        .iter()
        .map(|&c| {
            let p = (c as f64 / num_data as f64).clamp(1e-8, 1.0 - 1e-8);
            p.ln()
        })
        .collect()
}

/// Row-wise softmax with the log-sum-exp shift for numerical stability.
fn softmax_rows(scores: &Array2<f64>) -> Array2<f64> {
    let mut result = scores.clone();
    for mut row in result.rows_mut() {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for v in row.iter_mut() {
            *v = (*v - max).exp();
            sum += *v;
        }
        for v in row.iter_mut() {
            *v /= sum;
        }
    }
    result
}

/// Index of the largest value; ties resolve to the first occurrence.
fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best_idx = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if v > best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use tempfile::TempDir;

    fn toy_features() -> Array2<f64> {
        arr2(&[
            [0.1, 0.2],
            [0.2, 0.1],
            [0.15, 0.15],
            [5.0, 5.2],
            [5.1, 4.9],
            [5.2, 5.1],
            [10.0, 0.1],
            [10.2, 0.2],
            [9.9, 0.3],
        ])
    }

    fn toy_class_ids() -> Vec<usize> {
        vec![0, 0, 0, 1, 1, 1, 2, 2, 2]
    }

    fn params() -> BoosterParams {
        BoosterParams {
            learning_rate: 0.1,
            iterations: 30,
            max_depth: 3,
            l2_leaf_reg: 1.0,
        }
    }

    #[test]
    fn test_train_separable_classes() {
        let scratch = TempDir::new().unwrap();
        let features = toy_features();
        let booster = MulticlassBooster::train(
            features.view(),
            &toy_class_ids(),
            3,
            &params(),
            scratch.path(),
        )
        .unwrap();

        assert_eq!(booster.num_classes(), 3);
        assert_eq!(booster.num_features(), 2);
        assert_eq!(booster.num_rounds(), 30);
        let predicted = booster.predict_class(features.view()).unwrap();
        assert_eq!(predicted, toy_class_ids());
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let scratch = TempDir::new().unwrap();
        let features = toy_features();
        let booster = MulticlassBooster::train(
            features.view(),
            &toy_class_ids(),
            3,
            &params(),
            scratch.path(),
        )
        .unwrap();

        let proba = booster.predict_proba(features.view()).unwrap();
        assert_eq!(proba.dim(), (9, 3));
        for row in proba.rows() {
            let sum: f64 = row.sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_learn_error_file_written() {
        let scratch = TempDir::new().unwrap();
        let features = toy_features();
        MulticlassBooster::train(
            features.view(),
            &toy_class_ids(),
            3,
            &params(),
            scratch.path(),
        )
        .unwrap();

        let contents =
            std::fs::read_to_string(scratch.path().join(TRAIN_LOG_FILE_NAME)).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("iter\tlearn_error"));
        assert_eq!(lines.count(), 30);
    }

    #[test]
    fn test_single_class_degenerate() {
        let scratch = TempDir::new().unwrap();
        let features = arr2(&[[1.0], [2.0], [3.0]]);
        let booster =
            MulticlassBooster::train(features.view(), &[0, 0, 0], 1, &params(), scratch.path())
                .unwrap();

        let proba = booster.predict_proba(features.view()).unwrap();
        assert_eq!(proba.dim(), (3, 1));
        assert!(proba.iter().all(|&p| (p - 1.0).abs() < 1e-12));
        assert_eq!(booster.predict_class(features.view()).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let scratch = TempDir::new().unwrap();
        let features = toy_features();
        let booster = MulticlassBooster::train(
            features.view(),
            &toy_class_ids(),
            3,
            &params(),
            scratch.path(),
        )
        .unwrap();

        let narrow = arr2(&[[1.0], [2.0]]);
        let err = booster.predict_proba(narrow.view()).unwrap_err();
        assert_eq!(err.category(), "dimension_mismatch");
    }

    #[test]
    fn test_out_of_range_class_id_rejected() {
        let scratch = TempDir::new().unwrap();
        let features = arr2(&[[1.0], [2.0]]);
        let err =
            MulticlassBooster::train(features.view(), &[0, 3], 2, &params(), scratch.path())
                .unwrap_err();
        assert_eq!(err.category(), "training");
    }

    #[test]
    fn test_training_is_deterministic() {
        let features = toy_features();
        let scratch_a = TempDir::new().unwrap();
        let scratch_b = TempDir::new().unwrap();
        let a = MulticlassBooster::train(
            features.view(),
            &toy_class_ids(),
            3,
            &params(),
            scratch_a.path(),
        )
        .unwrap();
        let b = MulticlassBooster::train(
            features.view(),
            &toy_class_ids(),
            3,
            &params(),
            scratch_b.path(),
        )
        .unwrap();

        let pa = a.predict_proba(features.view()).unwrap();
        let pb = b.predict_proba(features.view()).unwrap();
        assert_eq!(pa, pb);
    }
}
