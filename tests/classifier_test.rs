use newscheck::{
    load_classifier, ArtifactConfig, ArtifactError, ClassifierError, Label, LabelPredictor,
    NewsChecker, NewsClassifier, Outcome, Verdict,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const VECTORIZER_JSON: &str = r#"{
    "vocabulary": {
        "central": 0, "bank": 1, "raised": 2, "interest": 3, "rates": 4,
        "scientists": 5, "confirm": 6, "moon": 7, "made": 8, "cheese": 9
    },
    "idf": [1.2, 1.1, 1.3, 1.4, 1.2, 1.5, 1.6, 2.0, 1.1, 2.2],
    "lowercase": true,
    "ngram_range": [1, 1],
    "norm": "l2"
}"#;

const MODEL_JSON: &str = r#"{
    "coefficients": [0.9, 1.1, 0.4, 0.8, 1.0, -0.2, -0.6, -1.3, -0.1, -1.8],
    "intercept": -0.05,
    "classes": [0, 1]
}"#;

/// Three terms instead of the ten the ONNX fixtures were exported for.
const NARROW_VECTORIZER_JSON: &str = r#"{
    "vocabulary": {"central": 0, "bank": 1, "rates": 2},
    "idf": [1.0, 1.0, 1.0]
}"#;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Lays out an ONNX classifier under the default artifact names.
fn onnx_artifacts(model_fixture: &str, vectorizer: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(fixture(model_fixture), dir.path().join("model.onnx")).expect("copy model");
    fs::write(dir.path().join("vectorizer.json"), vectorizer).expect("write vectorizer");
    dir
}

fn write_artifacts(dir: &Path, model: &str, vectorizer: &str) {
    fs::write(dir.join("model.json"), model).expect("write model");
    fs::write(dir.join("vectorizer.json"), vectorizer).expect("write vectorizer");
}

fn config(dir: &Path) -> ArtifactConfig {
    ArtifactConfig::new(dir).with_model_file("model.json")
}

fn setup_test_classifier() -> (TempDir, NewsClassifier) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_artifacts(dir.path(), MODEL_JSON, VECTORIZER_JSON);
    let classifier = load_classifier(&config(dir.path())).expect("artifacts load");
    (dir, classifier)
}

#[test]
fn test_real_and_fake_scenarios() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, classifier) = setup_test_classifier();
    let checker = NewsChecker::new(classifier);

    let fake = checker.check("Scientists confirm the moon is made of cheese");
    assert_eq!(fake.verdict(), Some(Verdict::Fake));
    assert!(fake.render().contains("misleading or false"));

    let real = checker.check("The central bank raised interest rates by 0.25%");
    assert_eq!(real.verdict(), Some(Verdict::Real));
    assert!(real.render().contains("trustworthy"));
    Ok(())
}

#[test]
fn test_whitespace_input_warns() {
    let (_dir, classifier) = setup_test_classifier();
    let checker = NewsChecker::new(classifier);
    assert_eq!(checker.check("   "), Outcome::MissingInput);
}

#[test]
fn test_unknown_vocabulary_still_gets_a_verdict() -> Result<(), ClassifierError> {
    let (_dir, classifier) = setup_test_classifier();
    // All-zero features fall back to the intercept, which is negative
    assert_eq!(classifier.predict("completely unrelated words")?, Label(0));
    Ok(())
}

#[test]
fn test_info_reports_artifacts() {
    let (_dir, classifier) = setup_test_classifier();
    let info = classifier.info();
    assert_eq!(info.backend, "linear");
    assert_eq!(info.num_features, 10);
    assert!(info.model_path.ends_with("model.json"));
    assert!(info.vectorizer_path.ends_with("vectorizer.json"));
}

#[test]
fn test_missing_classifier_is_named() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("vectorizer.json"), VECTORIZER_JSON).expect("write vectorizer");

    let err = load_classifier(&config(dir.path())).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("model.json"));
}

#[test]
fn test_missing_vectorizer_is_named() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("model.json"), MODEL_JSON).expect("write model");

    match load_classifier(&config(dir.path())) {
        Err(ArtifactError::NotFound { file, .. }) => assert_eq!(file, "vectorizer.json"),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_artifact_is_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_artifacts(dir.path(), "{ not json", VECTORIZER_JSON);

    let err = load_classifier(&config(dir.path())).unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, ArtifactError::LoadError(_)));
}

#[test]
fn test_incompatible_artifacts_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_artifacts(dir.path(), r#"{"coefficients": [1.0, 2.0, 3.0]}"#, VECTORIZER_JSON);

    let err = load_classifier(&config(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::LoadError(ClassifierError::ModelError(_))
    ));
}

#[test]
fn test_checksum_mismatch_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_artifacts(dir.path(), MODEL_JSON, VECTORIZER_JSON);

    let config = config(dir.path()).with_checksums(Some("deadbeef".into()), None);
    let err = load_classifier(&config).unwrap_err();
    assert!(matches!(err, ArtifactError::HashMismatch { .. }));
}

#[test]
fn test_matching_checksum_loads() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write_artifacts(dir.path(), MODEL_JSON, VECTORIZER_JSON);

    let digest = newscheck::artifacts::sha256_hex(&dir.path().join("vectorizer.json"))?;
    let config = config(dir.path()).with_checksums(None, Some(digest));
    assert!(load_classifier(&config).is_ok());
    Ok(())
}

#[test]
fn test_unsupported_model_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("model.pkl"), b"\x80\x04").expect("write model");
    fs::write(dir.path().join("vectorizer.json"), VECTORIZER_JSON).expect("write vectorizer");

    let config = ArtifactConfig::new(dir.path()).with_model_file("model.pkl");
    let err = load_classifier(&config).unwrap_err();
    assert!(matches!(err, ArtifactError::LoadError(ClassifierError::BuildError(_))));
}

#[test]
fn test_thread_safety() {
    let (_dir, classifier) = setup_test_classifier();
    let classifier = Arc::new(classifier);
    let mut handles = vec![];

    for _ in 0..3 {
        let classifier = Arc::clone(&classifier);
        let handle = thread::spawn(move || {
            let label = LabelPredictor::predict(&classifier, "central bank rates");
            assert_eq!(label.ok(), Some(Label::REAL));
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_onnx_classifier_scenarios() -> Result<(), Box<dyn std::error::Error>> {
    let dir = onnx_artifacts("linear_classifier.onnx", VECTORIZER_JSON);
    let classifier = load_classifier(&ArtifactConfig::new(dir.path()))?;

    let info = classifier.info();
    assert_eq!(info.backend, "onnx");
    assert_eq!(info.num_features, 10);

    assert_eq!(classifier.predict("Scientists confirm the moon is made of cheese")?, Label::FAKE);
    assert_eq!(classifier.predict("The central bank raised interest rates by 0.25%")?, Label::REAL);

    let checker = NewsChecker::new(classifier);
    assert_eq!(checker.check("central bank rates").verdict(), Some(Verdict::Real));
    Ok(())
}

#[test]
fn test_onnx_width_mismatch_is_load_error() {
    let dir = onnx_artifacts("linear_classifier.onnx", NARROW_VECTORIZER_JSON);

    let err = load_classifier(&ArtifactConfig::new(dir.path())).unwrap_err();
    assert!(!err.is_not_found());
    match err {
        ArtifactError::LoadError(ClassifierError::ModelError(message)) => {
            assert!(message.contains("3 features"), "{}", message);
            assert!(message.contains("expects 10"), "{}", message);
        }
        other => panic!("expected a model width error, got {:?}", other),
    }
}

#[test]
fn test_onnx_float_output_fails_prediction() -> Result<(), ArtifactError> {
    let dir = onnx_artifacts("score_classifier.onnx", VECTORIZER_JSON);
    let checker = NewsChecker::new(load_classifier(&ArtifactConfig::new(dir.path()))?);

    let outcome = checker.check("The central bank raised interest rates");
    assert!(matches!(outcome, Outcome::PredictionFailed(_)));
    assert!(outcome.render().contains("Failed to extract label tensor"));

    // The checker keeps serving after the failure
    assert!(matches!(checker.check("bank rates"), Outcome::PredictionFailed(_)));
    Ok(())
}

#[test]
fn test_onnx_multiple_labels_fail_prediction() -> Result<(), ArtifactError> {
    let dir = onnx_artifacts("pair_classifier.onnx", VECTORIZER_JSON);
    let classifier = load_classifier(&ArtifactConfig::new(dir.path()))?;

    match classifier.predict("central bank") {
        Err(ClassifierError::PredictionError(message)) => {
            assert!(message.contains("Expected exactly one label"), "{}", message);
        }
        other => panic!("expected a prediction error, got {:?}", other),
    }
    Ok(())
}
