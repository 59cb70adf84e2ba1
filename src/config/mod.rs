//! Hyperparameter configuration for the boosted-tree classifier.
//!
//! Hyperparameters arrive either as a plain struct or as a key-to-value
//! mapping (see [`Hyperparameters::from_map`]). Unknown keys in a mapping are
//! accepted and ignored, so callers may forward an opaque options bag.

use crate::core::constants::*;
use crate::core::error::{Result, TreeBoostError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hyperparameters controlling model training.
///
/// All fields are fixed before fit; the trained model stores the exact set it
/// was built with and persists it alongside the trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// The gradient step applied to each tree's contribution
    pub learning_rate: f64,
    /// The maximum number of boosting rounds
    pub iterations: usize,
    /// Depth of each tree
    pub depth: usize,
    /// Coefficient of the L2 regularization term on leaf values
    pub l2_leaf_reg: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            learning_rate: DEFAULT_LEARNING_RATE,
            iterations: DEFAULT_ITERATIONS,
            depth: DEFAULT_DEPTH,
            l2_leaf_reg: DEFAULT_L2_LEAF_REG,
        }
    }
}

impl Hyperparameters {
    /// Create hyperparameters with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Build hyperparameters from a plain key-to-value mapping.
    ///
    /// Missing keys take their defaults; unknown keys are ignored. The
    /// resulting set is validated before being returned.
    pub fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let params: Hyperparameters = serde_json::from_value(serde_json::Value::Object(map))?;
        params.validate()?;
        Ok(params)
    }

    /// Set the learning rate
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the iteration count
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the tree depth
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set the L2 leaf regularization coefficient
    pub fn l2_leaf_reg(mut self, l2_leaf_reg: f64) -> Self {
        self.l2_leaf_reg = l2_leaf_reg;
        self
    }

    /// Validate the hyperparameter values
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 || self.learning_rate > 1.0
        {
            return Err(TreeBoostError::invalid_parameter(
                "learning_rate",
                self.learning_rate.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        if self.iterations == 0 {
            return Err(TreeBoostError::invalid_parameter(
                "iterations",
                self.iterations.to_string(),
                "must be at least 1",
            ));
        }

        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(TreeBoostError::invalid_parameter(
                "depth",
                self.depth.to_string(),
                format!("must be in range [1, {}]", MAX_DEPTH),
            ));
        }

        if !self.l2_leaf_reg.is_finite() || self.l2_leaf_reg < 0.0 {
            return Err(TreeBoostError::invalid_parameter(
                "l2_leaf_reg",
                self.l2_leaf_reg.to_string(),
                "must be non-negative",
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Hyperparameters {
    /// Deterministic, alphabetically-ordered listing for stable display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth: {}, iterations: {}, l2_leaf_reg: {}, learning_rate: {}",
            self.depth, self.iterations, self.l2_leaf_reg, self.learning_rate
        )
    }
}
