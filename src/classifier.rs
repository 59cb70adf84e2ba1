//! Uniform training/inference/persistence interface over the boosted-tree
//! multiclass model.
//!
//! The untrained/trained distinction is modelled in the type system:
//! [`Classifier`] holds hyperparameters and exposes only [`Classifier::fit`],
//! which yields a [`TrainedClassifier`]. Prediction, evaluation and saving
//! exist only on the trained type, so "called before fit" is a compile error
//! rather than a runtime check.

use crate::boosting::{BoosterParams, MulticlassBooster};
use crate::config::Hyperparameters;
use crate::core::constants::{MODEL_FORMAT_VERSION, PREDICTOR_FILE_NAME};
use crate::core::error::{Result, TreeBoostError};
use crate::core::types::{Label, Score};
use crate::dataset::{self, Dataset};
use crate::metrics::accuracy;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Human-readable model name used in display output.
pub const MODEL_NAME: &str = "Gradient Boosted Classifier";

/// An untrained classifier: a validated-on-fit set of hyperparameters.
///
/// Constructing a `Classifier` never trains anything; there is no model
/// handle until [`fit`](Classifier::fit) returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classifier {
    hyperparameters: Hyperparameters,
}

impl Classifier {
    /// Create a classifier with the given hyperparameters.
    pub fn new(hyperparameters: Hyperparameters) -> Self {
        Classifier { hyperparameters }
    }

    /// Borrow the stored hyperparameters.
    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    /// Fit the classifier to the training data, yielding a trained model.
    ///
    /// Training runs synchronously until the iteration cap. A scoped scratch
    /// directory holds transient training artifacts (the per-iteration loss
    /// file) and is removed when fit returns, on success and failure alike.
    pub fn fit(&self, data: &Dataset) -> Result<TrainedClassifier> {
        self.fit_views(data.features(), data.labels())
    }

    /// Borrowed fit path shared by [`fit`](Classifier::fit) and
    /// [`train_predictor_model`]. Assumes the inputs were already validated
    /// for consistency.
    fn fit_views(
        &self,
        features: ArrayView2<'_, Score>,
        labels: ArrayView1<'_, Label>,
    ) -> Result<TrainedClassifier> {
        self.hyperparameters.validate()?;

        let class_labels = dataset::distinct_sorted(labels);
        let class_ids: Vec<usize> = labels
            .iter()
            .map(|l| class_labels.partition_point(|c| c < l))
            .collect();

        log::info!(
            "fitting {} on {} rows, {} features, {} classes",
            MODEL_NAME,
            features.nrows(),
            features.ncols(),
            class_labels.len()
        );

        let params = BoosterParams {
            learning_rate: self.hyperparameters.learning_rate,
            iterations: self.hyperparameters.iterations,
            max_depth: self.hyperparameters.depth,
            l2_leaf_reg: self.hyperparameters.l2_leaf_reg,
        };

        let scratch = tempfile::tempdir()?;
        let booster = MulticlassBooster::train(
            features,
            &class_ids,
            class_labels.len(),
            &params,
            scratch.path(),
        )?;

        Ok(TrainedClassifier {
            hyperparameters: self.hyperparameters.clone(),
            class_labels,
            booster,
        })
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model name: {} ({})", MODEL_NAME, self.hyperparameters)
    }
}

/// A trained classifier: hyperparameters, the class label set, and the
/// underlying boosted-tree model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedClassifier {
    hyperparameters: Hyperparameters,
    /// Distinct training labels, sorted ascending; position = class index
    class_labels: Vec<Label>,
    booster: MulticlassBooster,
}

impl TrainedClassifier {
    /// Hyperparameters the model was trained with.
    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    /// Distinct training labels, sorted ascending.
    pub fn classes(&self) -> &[Label] {
        &self.class_labels
    }

    /// Predict class labels for the given data.
    pub fn predict(&self, inputs: ArrayView2<'_, Score>) -> Result<Array1<Label>> {
        let class_ids = self.booster.predict_class(inputs)?;
        Ok(class_ids.into_iter().map(|c| self.class_labels[c]).collect())
    }

    /// Predict per-class probabilities for the given data.
    ///
    /// The returned matrix has one column per distinct training label, in
    /// ascending label order; every row sums to 1.
    pub fn predict_proba(&self, inputs: ArrayView2<'_, Score>) -> Result<Array2<Score>> {
        self.booster.predict_proba(inputs)
    }

    /// Evaluate the classifier on labeled data and return the accuracy.
    pub fn evaluate(&self, data: &Dataset) -> Result<f64> {
        let predictions = self.predict(data.features())?;
        accuracy(predictions.view(), data.labels())
    }

    /// Save the trained model into the given directory under
    /// [`PREDICTOR_FILE_NAME`].
    ///
    /// The artifact is a [`MODEL_FORMAT_VERSION`] prefix followed by the
    /// bincode-encoded model.
    pub fn save<P: AsRef<Path>>(&self, model_dir_path: P) -> Result<()> {
        let path = model_dir_path.as_ref().join(PREDICTOR_FILE_NAME);
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, &MODEL_FORMAT_VERSION)?;
        bincode::serialize_into(&mut writer, self)?;
        log::info!("saved model to {}", path.display());
        Ok(())
    }

    /// Load a previously saved model from the given directory.
    ///
    /// The version prefix is checked before the model is decoded, so an
    /// artifact from an incompatible release fails with a clear
    /// version-mismatch error even when its model layout differs.
    pub fn load<P: AsRef<Path>>(model_dir_path: P) -> Result<TrainedClassifier> {
        let path = model_dir_path.as_ref().join(PREDICTOR_FILE_NAME);
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);
        let format_version: u32 = bincode::deserialize_from(&mut reader)?;
        if format_version != MODEL_FORMAT_VERSION {
            return Err(TreeBoostError::serialization(format!(
                "unsupported model format version {} (expected {})",
                format_version, MODEL_FORMAT_VERSION
            )));
        }
        let model: TrainedClassifier = bincode::deserialize_from(&mut reader)?;
        log::info!("loaded model from {}", path.display());
        Ok(model)
    }
}

impl fmt::Display for TrainedClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model name: {} ({})", MODEL_NAME, self.hyperparameters)
    }
}

/// Prediction output of [`predict_with_model`]: class labels or a per-class
/// probability matrix, depending on the `return_probs` flag.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Predicted class labels, one per input row
    Labels(Array1<Label>),
    /// Per-class probability matrix (rows x classes)
    Probabilities(Array2<Score>),
}

impl Prediction {
    /// The label vector, if this is a label prediction.
    pub fn labels(&self) -> Option<&Array1<Label>> {
        match self {
            Prediction::Labels(labels) => Some(labels),
            Prediction::Probabilities(_) => None,
        }
    }

    /// The probability matrix, if this is a probability prediction.
    pub fn probabilities(&self) -> Option<&Array2<Score>> {
        match self {
            Prediction::Labels(_) => None,
            Prediction::Probabilities(probs) => Some(probs),
        }
    }
}

/// Instantiate and train a classifier in one step.
///
/// The training data is borrowed and never copied or mutated.
pub fn train_predictor_model(
    train_inputs: &Array2<Score>,
    train_targets: &Array1<Label>,
    hyperparameters: &Hyperparameters,
) -> Result<TrainedClassifier> {
    dataset::check_consistency(train_inputs.view(), train_targets.view())?;
    Classifier::new(hyperparameters.clone()).fit_views(train_inputs.view(), train_targets.view())
}

/// Predict class labels or probabilities, dispatching on `return_probs`.
pub fn predict_with_model(
    classifier: &TrainedClassifier,
    data: &Array2<Score>,
    return_probs: bool,
) -> Result<Prediction> {
    if return_probs {
        Ok(Prediction::Probabilities(
            classifier.predict_proba(data.view())?,
        ))
    } else {
        Ok(Prediction::Labels(classifier.predict(data.view())?))
    }
}

/// Save a trained model, creating the target directory if needed.
pub fn save_predictor_model<P: AsRef<Path>>(
    model: &TrainedClassifier,
    predictor_dir_path: P,
) -> Result<()> {
    std::fs::create_dir_all(predictor_dir_path.as_ref())?;
    model.save(predictor_dir_path)
}

/// Load a trained model from the given directory.
pub fn load_predictor_model<P: AsRef<Path>>(predictor_dir_path: P) -> Result<TrainedClassifier> {
    TrainedClassifier::load(predictor_dir_path)
}

/// Evaluate a trained model on labeled test data and return the accuracy.
///
/// The test data is borrowed and never copied or mutated.
pub fn evaluate_predictor_model(
    model: &TrainedClassifier,
    test_inputs: &Array2<Score>,
    test_targets: &Array1<Label>,
) -> Result<f64> {
    dataset::check_consistency(test_inputs.view(), test_targets.view())?;
    let predictions = model.predict(test_inputs.view())?;
    accuracy(predictions.view(), test_targets.view())
}
