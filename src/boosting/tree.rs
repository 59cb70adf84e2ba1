//! Depth-limited regression trees fitted to gradient/hessian pairs.
//!
//! Each boosting round fits one tree per class to the pseudo-residuals of the
//! softmax objective. Splits maximize the regularized gain
//! `G_L^2/(H_L + lambda) + G_R^2/(H_R + lambda) - G^2/(H + lambda)` and leaf
//! values are the Newton step `G/(H + lambda)`.

use crate::core::types::{FeatureIndex, NodeIndex, Score};
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Parameters controlling a single tree fit.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Maximum tree depth
    pub max_depth: usize,
    /// L2 regularization coefficient applied to leaf values and split gains
    pub l2_reg: f64,
    /// Minimum number of samples on each side of a split
    pub min_samples_leaf: usize,
}

/// A node in the flattened tree representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split node: rows with `feature <= threshold` go left.
    Split {
        /// Feature column the split tests
        feature: FeatureIndex,
        /// Split threshold (midpoint between adjacent sorted values)
        threshold: f64,
        /// Index of the left child node
        left: NodeIndex,
        /// Index of the right child node
        right: NodeIndex,
    },
    /// Terminal node carrying the regularized Newton leaf value.
    Leaf {
        /// Value added (after shrinkage) to the raw score of this class
        value: f64,
    },
}

/// A single regression tree stored as a flat node vector rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Fit a tree to per-sample gradients and hessians.
    pub fn fit(
        features: ArrayView2<'_, Score>,
        gradients: &[f64],
        hessians: &[f64],
        params: &TreeParams,
    ) -> Self {
        let indices: Vec<usize> = (0..features.nrows()).collect();
        let mut nodes = Vec::new();
        build_node(features, gradients, hessians, &indices, 0, params, &mut nodes);
        RegressionTree { nodes }
    }

    /// Predict the output for a single feature row.
    pub fn predict_row(&self, row: ArrayView1<'_, Score>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Newton leaf value for the samples at `indices`.
fn leaf_value(gradients: &[f64], hessians: &[f64], indices: &[usize], l2_reg: f64) -> f64 {
    let grad_sum: f64 = indices.iter().map(|&i| gradients[i]).sum();
    let hess_sum: f64 = indices.iter().map(|&i| hessians[i]).sum();
    grad_sum / (hess_sum + l2_reg)
}

fn build_node(
    features: ArrayView2<'_, Score>,
    gradients: &[f64],
    hessians: &[f64],
    indices: &[usize],
    depth: usize,
    params: &TreeParams,
    nodes: &mut Vec<TreeNode>,
) -> NodeIndex {
    let value = leaf_value(gradients, hessians, indices, params.l2_reg);

    if depth >= params.max_depth || indices.len() < 2 {
        let idx = nodes.len();
        nodes.push(TreeNode::Leaf { value });
        return idx;
    }

    let split = find_best_split(features, gradients, hessians, indices, params);
    let (best_feature, best_threshold) = match split {
        Some(s) => s,
        None => {
            let idx = nodes.len();
            nodes.push(TreeNode::Leaf { value });
            return idx;
        }
    };

    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();
    for &i in indices {
        if features[[i, best_feature]] <= best_threshold {
            left_indices.push(i);
        } else {
            right_indices.push(i);
        }
    }

    // Placeholder until both children are built
    let node_idx = nodes.len();
    nodes.push(TreeNode::Leaf { value: 0.0 });

    let left = build_node(
        features,
        gradients,
        hessians,
        &left_indices,
        depth + 1,
        params,
        nodes,
    );
    let right = build_node(
        features,
        gradients,
        hessians,
        &right_indices,
        depth + 1,
        params,
        nodes,
    );

    nodes[node_idx] = TreeNode::Split {
        feature: best_feature,
        threshold: best_threshold,
        left,
        right,
    };
    node_idx
}

/// Scan every feature for the threshold with the largest positive gain.
fn find_best_split(
    features: ArrayView2<'_, Score>,
    gradients: &[f64],
    hessians: &[f64],
    indices: &[usize],
    params: &TreeParams,
) -> Option<(FeatureIndex, f64)> {
    let n = indices.len();
    let lambda = params.l2_reg;

    let total_grad: f64 = indices.iter().map(|&i| gradients[i]).sum();
    let total_hess: f64 = indices.iter().map(|&i| hessians[i]).sum();
    let parent_objective = total_grad * total_grad / (total_hess + lambda);

    let mut best_gain = 0.0;
    let mut best: Option<(FeatureIndex, f64)> = None;

    for feature in 0..features.ncols() {
        let mut sorted: Vec<(f64, f64, f64)> = indices
            .iter()
            .map(|&i| (features[[i, feature]], gradients[i], hessians[i]))
            .collect();
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut left_grad = 0.0;
        let mut left_hess = 0.0;

        for i in 0..n - 1 {
            left_grad += sorted[i].1;
            left_hess += sorted[i].2;

            // No valid threshold between equal feature values
            if sorted[i].0 == sorted[i + 1].0 {
                continue;
            }

            let left_count = i + 1;
            let right_count = n - left_count;
            if left_count < params.min_samples_leaf || right_count < params.min_samples_leaf {
                continue;
            }

            let right_grad = total_grad - left_grad;
            let right_hess = total_hess - left_hess;

            let gain = left_grad * left_grad / (left_hess + lambda)
                + right_grad * right_grad / (right_hess + lambda)
                - parent_objective;

            if gain > best_gain {
                best_gain = gain;
                best = Some((feature, (sorted[i].0 + sorted[i + 1].0) / 2.0));
            }
        }
    }

    best
}
