mod error;
mod model;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;
mod utils;
pub mod vectorizer;

pub use builder::NewsClassifierBuilder;
pub use classifier::NewsClassifier;
pub use error::ClassifierError;
pub use model::{ClassifierModel, LinearModel, OnnxModel};
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerParams};

/// Information about the artifacts backing a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the classifier artifact
    pub model_path: String,
    /// Path to the vectorizer artifact
    pub vectorizer_path: String,
    /// Which backend runs the model ("onnx" or "linear")
    pub backend: String,
    /// Width of the feature vectors
    pub num_features: usize,
    /// Number of terms in the fitted vocabulary
    pub vocabulary_size: usize,
}
