use std::path::Path;
use std::sync::Arc;

use log::{error, info};

use super::classifier::NewsClassifier;
use super::error::ClassifierError;
use super::model::ClassifierModel;
use super::vectorizer::TfidfVectorizer;
use crate::runtime::RuntimeConfig;

/// A builder for constructing a NewsClassifier with a fluent interface.
#[derive(Default, Debug)]
pub struct NewsClassifierBuilder {
    model_path: Option<String>,
    vectorizer_path: Option<String>,
    vectorizer: Option<TfidfVectorizer>,
    model: Option<ClassifierModel>,
    runtime_config: RuntimeConfig,
}

impl NewsClassifierBuilder {
    /// Creates a new empty builder with the default runtime configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration used when the classifier is an ONNX model.
    ///
    /// Must be called before [`with_model`](Self::with_model) to take effect.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads the fitted vectorizer from a JSON artifact.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The path is empty or a vectorizer was already set
    ///   - The file doesn't exist
    ///   - The file is not a valid vectorizer artifact
    pub fn with_vectorizer<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        Self::check_path(path, "Vectorizer", self.vectorizer.is_some())?;

        let vectorizer = TfidfVectorizer::from_file(path).map_err(|e| {
            error!("Failed to load vectorizer: {}", e);
            e
        })?;

        self.vectorizer_path = Some(path.to_string_lossy().to_string());
        self.vectorizer = Some(vectorizer);
        Ok(self)
    }

    /// Loads the classifier artifact (`.onnx` or linear `.json`).
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The path is empty or a model was already set
    ///   - The file doesn't exist
    ///   - The model failed to load or has an invalid structure
    pub fn with_model<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        Self::check_path(path, "Model", self.model.is_some())?;

        let model = ClassifierModel::load(path, &self.runtime_config).map_err(|e| {
            error!("Failed to load classifier model: {}", e);
            e
        })?;

        self.model_path = Some(path.to_string_lossy().to_string());
        self.model = Some(model);
        Ok(self)
    }

    /// Uses an already-constructed vectorizer.
    pub fn with_loaded_vectorizer(mut self, vectorizer: TfidfVectorizer) -> Self {
        self.vectorizer_path.get_or_insert_with(|| "<memory>".to_string());
        self.vectorizer = Some(vectorizer);
        self
    }

    /// Uses an already-constructed classifier model.
    pub fn with_loaded_model(mut self, model: ClassifierModel) -> Self {
        self.model_path.get_or_insert_with(|| "<memory>".to_string());
        self.model = Some(model);
        self
    }

    fn check_path(path: &Path, what: &str, already_set: bool) -> Result<(), ClassifierError> {
        if path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError(format!("{} path cannot be empty", what)));
        }
        if already_set {
            return Err(ClassifierError::BuildError(format!("{} already set", what)));
        }
        if !path.exists() {
            return Err(ClassifierError::BuildError(format!(
                "{} file not found: {}",
                what,
                path.display()
            )));
        }
        Ok(())
    }

    /// Builds the final NewsClassifier.
    ///
    /// # Returns
    /// * `Result<NewsClassifier, ClassifierError>` - The constructed classifier, or an error if:
    ///   - No vectorizer or no model has been set
    ///   - The model declares an input width different from the vectorizer's feature count
    pub fn build(self) -> Result<NewsClassifier, ClassifierError> {
        let vectorizer = self
            .vectorizer
            .ok_or_else(|| ClassifierError::BuildError("Vectorizer must be set".to_string()))?;
        let model = self.model.ok_or_else(|| {
            ClassifierError::BuildError("Classifier model must be set".to_string())
        })?;

        match model.expected_features() {
            Some(expected) if expected != vectorizer.num_features() => {
                return Err(ClassifierError::ModelError(format!(
                    "Vectorizer produces {} features but the model expects {}; \
                     the artifacts were not trained together",
                    vectorizer.num_features(),
                    expected
                )));
            }
            Some(_) => info!("Vectorizer and model feature widths match"),
            None => info!("Model does not declare its input width; skipping compatibility check"),
        }

        Ok(NewsClassifier {
            model_path: self.model_path.unwrap_or_default(),
            vectorizer_path: self.vectorizer_path.unwrap_or_default(),
            vectorizer: Arc::new(vectorizer),
            model: Arc::new(model),
        })
    }
}
