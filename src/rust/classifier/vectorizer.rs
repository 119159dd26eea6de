use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::{debug, info};
use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokenizers::normalizers::{Lowercase, NormalizerWrapper, Sequence, StripAccents, NFKD};
use tokenizers::{NormalizedString, Normalizer};

use super::error::ClassifierError;
use super::utils::{normalize_vector, sublinear_scale};

/// Token pattern used when the artifact does not declare one: words of two or more
/// word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after idf weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk layout of a fitted vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerParams {
    /// Term to feature column.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature column.
    pub idf: Vec<f32>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub strip_accents: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// A fitted TF-IDF transform turning free text into a fixed-width feature vector.
///
/// The vocabulary and idf weights come from an external training run; this type only
/// applies them. Terms outside the vocabulary are ignored, so an input made entirely of
/// unknown words produces an all-zero vector rather than an error.
///
/// ```
/// use newscheck::TfidfVectorizer;
///
/// let vectorizer = TfidfVectorizer::from_json(r#"{
///     "vocabulary": {"bank": 0, "rates": 1},
///     "idf": [1.0, 2.0]
/// }"#)?;
/// let features = vectorizer.transform("The bank raised rates")?;
/// assert_eq!(features.len(), 2);
/// # Ok::<(), newscheck::ClassifierError>(())
/// ```
#[derive(Clone)]
pub struct TfidfVectorizer {
    params: VectorizerParams,
    idf: Array1<f32>,
    pattern: Regex,
    normalizer: Option<Sequence>,
}

impl fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("num_features", &self.num_features())
            .field("vocabulary_size", &self.vocabulary_size())
            .field("ngram_range", &self.params.ngram_range)
            .field("norm", &self.params.norm)
            .finish()
    }
}

impl TfidfVectorizer {
    /// Builds a vectorizer from already-deserialized parameters.
    ///
    /// # Errors
    /// - `BuildError` if the vocabulary or idf table is empty
    /// - `BuildError` if a vocabulary column points past the idf table
    /// - `BuildError` if the n-gram range is not `1 <= min <= max`
    /// - `VectorizerError` if the token pattern is not a valid regex
    pub fn new(params: VectorizerParams) -> Result<Self, ClassifierError> {
        Self::validate(&params)?;

        let pattern = Regex::new(&params.token_pattern).map_err(|e| {
            ClassifierError::VectorizerError(format!(
                "Invalid token pattern '{}': {}",
                params.token_pattern, e
            ))
        })?;

        let mut steps: Vec<NormalizerWrapper> = Vec::new();
        if params.strip_accents {
            steps.push(NFKD.into());
            steps.push(StripAccents.into());
        }
        if params.lowercase {
            steps.push(Lowercase.into());
        }
        let normalizer = (!steps.is_empty()).then(|| Sequence::new(steps));

        let idf = Array1::from_vec(params.idf.clone());
        Ok(Self {
            params,
            idf,
            pattern,
            normalizer,
        })
    }

    /// Parses a vectorizer artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let params: VectorizerParams = serde_json::from_str(json)?;
        Self::new(params)
    }

    /// Loads a vectorizer artifact from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::BuildError(format!(
                "Failed to read vectorizer {}: {}",
                path.display(),
                e
            ))
        })?;
        let vectorizer = Self::from_json(&json)?;
        info!(
            "Vectorizer loaded from {:?} ({} features)",
            path,
            vectorizer.num_features()
        );
        Ok(vectorizer)
    }

    fn validate(params: &VectorizerParams) -> Result<(), ClassifierError> {
        if params.vocabulary.is_empty() {
            return Err(ClassifierError::BuildError("Vectorizer vocabulary is empty".into()));
        }
        if params.idf.is_empty() {
            return Err(ClassifierError::BuildError("Vectorizer idf table is empty".into()));
        }
        if let Some((term, &col)) = params
            .vocabulary
            .iter()
            .find(|(_, &col)| col >= params.idf.len())
        {
            return Err(ClassifierError::BuildError(format!(
                "Vocabulary term '{}' maps to column {} but only {} idf weights exist",
                term,
                col,
                params.idf.len()
            )));
        }
        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::BuildError(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        Ok(())
    }

    /// Width of the produced feature vectors.
    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.params.vocabulary.len()
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    fn normalize_text(&self, text: &str) -> Result<String, ClassifierError> {
        match &self.normalizer {
            Some(normalizer) => {
                let mut normalized = NormalizedString::from(text);
                normalizer
                    .normalize(&mut normalized)
                    .map_err(|e| ClassifierError::VectorizerError(e.to_string()))?;
                Ok(normalized.get().to_string())
            }
            None => Ok(text.to_string()),
        }
    }

    /// Splits text into the terms the vocabulary is keyed by: normalized tokens followed by
    /// space-joined word n-grams for every size in the configured range.
    pub fn analyze(&self, text: &str) -> Result<Vec<String>, ClassifierError> {
        let normalized = self.normalize_text(text)?;
        let tokens: Vec<&str> = self
            .pattern
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.params.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        Ok(terms)
    }

    /// Produces the TF-IDF feature vector for a single text.
    pub fn transform(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
        let terms = self.analyze(text)?;
        let mut counts = Array1::<f32>::zeros(self.num_features());
        let mut matched = 0usize;
        for term in &terms {
            if let Some(&col) = self.params.vocabulary.get(term) {
                counts[col] += 1.0;
                matched += 1;
            }
        }
        debug!(
            "Vectorized {} terms ({} in vocabulary)",
            terms.len(),
            matched
        );

        if self.params.sublinear_tf {
            sublinear_scale(&mut counts);
        }
        let weighted = counts * &self.idf;

        Ok(match self.params.norm {
            Some(Norm::L2) => normalize_vector(&weighted),
            Some(Norm::L1) => {
                let total: f32 = weighted.iter().map(|x| x.abs()).sum();
                if total > 1e-10 {
                    weighted / total
                } else {
                    weighted
                }
            }
            None => weighted,
        })
    }
}
