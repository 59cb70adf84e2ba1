//! Core data types for the treeboost implementation.

/// Feature and prediction value type. 64-bit float so that persisted models
/// reproduce their predictions bit-exactly after a save/load round trip.
pub type Score = f64;

/// Target label type. Class labels are arbitrary finite values supplied by
/// the caller; the model maps them to contiguous class indices internally.
pub type Label = f64;

/// Feature index type for identifying columns in the feature matrix.
pub type FeatureIndex = usize;

/// Tree node identifier type.
pub type NodeIndex = usize;

/// Contiguous class index type (`0..num_classes`).
pub type ClassIndex = usize;
