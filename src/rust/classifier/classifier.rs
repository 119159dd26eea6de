use std::sync::Arc;

use log::debug;

use super::error::ClassifierError;
use super::model::ClassifierModel;
use super::vectorizer::TfidfVectorizer;
use crate::predictor::{Label, LabelPredictor};

/// A loaded vectorizer + classifier pair, ready to label news text.
///
/// # Thread Safety
///
/// This type is `Send + Sync`: both artifacts are read-only after loading and are
/// held behind `Arc`, so one instance can serve any number of threads.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use newscheck::{LabelPredictor, NewsClassifier};
///
/// let classifier = NewsClassifier::builder()
///     .with_vectorizer("vectorizer.json")?
///     .with_model("model.onnx")?
///     .build()?;
///
/// let label = classifier.predict("The central bank raised interest rates by 0.25%")?;
/// println!("Predicted label: {}", label);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NewsClassifier {
    pub model_path: String,
    pub vectorizer_path: String,
    pub vectorizer: Arc<TfidfVectorizer>,
    pub model: Arc<ClassifierModel>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<NewsClassifier>();
    }
};

impl NewsClassifier {
    /// Creates a new NewsClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::NewsClassifierBuilder {
        super::builder::NewsClassifierBuilder::new()
    }

    /// Returns information about the loaded artifacts
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            vectorizer_path: self.vectorizer_path.clone(),
            backend: self.model.backend().to_string(),
            num_features: self.vectorizer.num_features(),
            vocabulary_size: self.vectorizer.vocabulary_size(),
        }
    }

    /// Vectorizes the text and runs the classifier on the resulting features.
    pub fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let features = self.vectorizer.transform(text)?;
        debug!(
            "Feature vector has {} non-zero entries",
            features.iter().filter(|&&x| x != 0.0).count()
        );
        self.model.predict(&features)
    }
}

impl LabelPredictor for NewsClassifier {
    fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        NewsClassifier::predict(self, text)
    }
}
