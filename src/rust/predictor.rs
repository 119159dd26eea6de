use std::fmt;
use std::sync::Arc;

use crate::classifier::ClassifierError;

/// Raw class value produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub i64);

impl Label {
    /// The class the training process used for genuine articles.
    pub const REAL: Label = Label(1);
    pub const FAKE: Label = Label(0);

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that can turn one piece of text into one label.
///
/// This is the seam between the front-end and the inference engine: the loaded
/// [`NewsClassifier`](crate::NewsClassifier) implements it, and so can a mock or a
/// remote client.
pub trait LabelPredictor: Send + Sync {
    fn predict(&self, text: &str) -> Result<Label, ClassifierError>;
}

impl<P: LabelPredictor + ?Sized> LabelPredictor for &P {
    fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        (**self).predict(text)
    }
}

impl<P: LabelPredictor + ?Sized> LabelPredictor for Box<P> {
    fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        (**self).predict(text)
    }
}

impl<P: LabelPredictor + ?Sized> LabelPredictor for Arc<P> {
    fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        (**self).predict(text)
    }
}
