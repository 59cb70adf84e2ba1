//! Constants and default parameter values.

/// Default learning rate (gradient step per boosting round)
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default maximum number of boosting iterations
pub const DEFAULT_ITERATIONS: usize = 100;

/// Default tree depth
pub const DEFAULT_DEPTH: usize = 6;

/// Default coefficient of the L2 regularization term applied to leaf values
pub const DEFAULT_L2_LEAF_REG: f64 = 3.0;

/// Upper bound on tree depth accepted by validation
pub const MAX_DEPTH: usize = 16;

/// Fixed filename of the persisted model inside a caller-supplied directory
pub const PREDICTOR_FILE_NAME: &str = "predictor.bin";

/// Format version written into every persisted model artifact
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Per-iteration training loss file written into the fit scratch directory
pub const TRAIN_LOG_FILE_NAME: &str = "learn_error.tsv";

/// Clamp applied to probabilities before taking logarithms
pub const PROBABILITY_EPSILON: f64 = 1e-15;

/// Lower bound on per-sample hessian values during training
pub const MIN_HESSIAN: f64 = 1e-16;
