//! An interactive fake news detector built on a pre-trained TF-IDF text classifier.
//!
//! Two artifacts are loaded once at startup: a fitted vectorizer (JSON) and a classifier
//! (an ONNX export, or a linear weight file). Each submission is trimmed, vectorized,
//! classified, and mapped to a "Real News" / "Fake News" verdict.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use newscheck::{load_classifier, ArtifactConfig, NewsChecker};
//!
//! let classifier = load_classifier(&ArtifactConfig::new("artifacts"))?;
//! let checker = NewsChecker::new(classifier);
//!
//! let outcome = checker.check("The central bank raised interest rates by 0.25%");
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Predictors
//!
//! The front-end only depends on [`LabelPredictor`], so any engine can stand in:
//!
//! ```
//! use newscheck::{ClassifierError, Label, LabelPredictor, NewsChecker, Verdict};
//!
//! struct AlwaysReal;
//!
//! impl LabelPredictor for AlwaysReal {
//!     fn predict(&self, _text: &str) -> Result<Label, ClassifierError> {
//!         Ok(Label::REAL)
//!     }
//! }
//!
//! let checker = NewsChecker::new(AlwaysReal);
//! assert_eq!(checker.check("anything").verdict(), Some(Verdict::Real));
//! ```

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod frontend;
pub mod predictor;
mod runtime;

pub use artifacts::{load_classifier, ArtifactError};
pub use classifier::{
    ClassifierError, ClassifierInfo, ClassifierModel, LinearModel, NewsClassifier,
    NewsClassifierBuilder, TfidfVectorizer,
};
pub use config::ArtifactConfig;
pub use frontend::{NewsChecker, Outcome, Verdict};
pub use predictor::{Label, LabelPredictor};
pub use runtime::{create_session_builder, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
