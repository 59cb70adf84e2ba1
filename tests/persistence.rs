//! Save/load round-trip tests for the persisted model artifact.

use ndarray::{arr1, arr2, Array1, Array2};
use tempfile::TempDir;
use treeboost::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn toy_data() -> (Array2<f64>, Array1<f64>) {
    let features = arr2(&[
        [0.1, 0.3],
        [0.2, 0.2],
        [0.3, 0.1],
        [0.2, 0.3],
        [4.9, 5.0],
        [5.0, 5.2],
        [5.1, 4.8],
        [9.8, 0.2],
        [10.0, 0.1],
        [10.2, 0.3],
    ]);
    let labels = arr1(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    (features, labels)
}

#[test]
fn test_round_trip_preserves_predictions_exactly() {
    init_logging();
    let (features, labels) = toy_data();
    let model = train_predictor_model(&features, &labels, &Hyperparameters::default()).unwrap();

    let dir = TempDir::new().unwrap();
    save_predictor_model(&model, dir.path()).unwrap();
    assert!(dir.path().join(PREDICTOR_FILE_NAME).is_file());

    let restored = load_predictor_model(dir.path()).unwrap();

    let before = model.predict(features.view()).unwrap();
    let after = restored.predict(features.view()).unwrap();
    assert_eq!(before, after);

    let proba_before = model.predict_proba(features.view()).unwrap();
    let proba_after = restored.predict_proba(features.view()).unwrap();
    assert_eq!(proba_before, proba_after);
}

#[test]
fn test_round_trip_preserves_accuracy_exactly() {
    init_logging();
    let (features, labels) = toy_data();
    let model = train_predictor_model(&features, &labels, &Hyperparameters::default()).unwrap();
    let accuracy_before = evaluate_predictor_model(&model, &features, &labels).unwrap();

    let dir = TempDir::new().unwrap();
    save_predictor_model(&model, dir.path()).unwrap();
    let restored = load_predictor_model(dir.path()).unwrap();
    let accuracy_after = evaluate_predictor_model(&restored, &features, &labels).unwrap();

    assert_eq!(accuracy_before, accuracy_after);
}

#[test]
fn test_round_trip_preserves_hyperparameters_and_classes() {
    init_logging();
    let (features, labels) = toy_data();
    let hyperparameters = Hyperparameters::new().learning_rate(0.2).iterations(25);
    let model = train_predictor_model(&features, &labels, &hyperparameters).unwrap();

    let dir = TempDir::new().unwrap();
    save_predictor_model(&model, dir.path()).unwrap();
    let restored = load_predictor_model(dir.path()).unwrap();

    assert_eq!(restored.hyperparameters(), &hyperparameters);
    assert_eq!(restored.classes(), model.classes());
}

#[test]
fn test_save_creates_missing_directories() {
    init_logging();
    let (features, labels) = toy_data();
    let model = train_predictor_model(&features, &labels, &Hyperparameters::default()).unwrap();

    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("artifacts").join("predictor");
    save_predictor_model(&model, &nested).unwrap();
    assert!(nested.join(PREDICTOR_FILE_NAME).is_file());
    assert!(load_predictor_model(&nested).is_ok());
}

#[test]
fn test_load_from_empty_directory_fails() {
    init_logging();
    let dir = TempDir::new().unwrap();
    assert!(load_predictor_model(dir.path()).is_err());
}

#[test]
fn test_load_rejects_version_mismatch() {
    init_logging();
    let (features, labels) = toy_data();
    let model = train_predictor_model(&features, &labels, &Hyperparameters::default()).unwrap();

    let dir = TempDir::new().unwrap();
    save_predictor_model(&model, dir.path()).unwrap();

    // The artifact starts with the format version as a little-endian u32.
    let path = dir.path().join(PREDICTOR_FILE_NAME);
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] = bytes[0].wrapping_add(1);
    std::fs::write(&path, bytes).unwrap();

    let err = load_predictor_model(dir.path()).unwrap_err();
    assert_eq!(err.category(), "serialization");
    assert!(err.to_string().contains("format version"));
}

#[test]
fn test_version_check_precedes_model_decoding() {
    init_logging();
    let dir = TempDir::new().unwrap();

    // A wrong version followed by bytes that are not a valid model; the
    // version gate must reject it before any model decoding is attempted.
    let mut bytes = 9999u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"\xff\xff\xff\xff\xff\xff\xff\xff");
    std::fs::write(dir.path().join(PREDICTOR_FILE_NAME), bytes).unwrap();

    let err = load_predictor_model(dir.path()).unwrap_err();
    assert_eq!(err.category(), "serialization");
    assert!(err.to_string().contains("9999"));
}

#[test]
fn test_load_rejects_corrupt_artifact() {
    init_logging();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(PREDICTOR_FILE_NAME), b"not a model").unwrap();
    assert!(load_predictor_model(dir.path()).is_err());
}
