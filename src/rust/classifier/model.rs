use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use ndarray::{Array1, Axis};
use ort::session::Session;
use ort::value::{Tensor, ValueType};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use crate::predictor::Label;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Linear decision function exported from a trained binary classifier
/// (logistic regression, linear SVM, passive-aggressive).
///
/// The artifact is JSON:
/// ```json
/// { "coefficients": [0.4, -1.2, 0.7], "intercept": -0.1, "classes": [0, 1] }
/// ```
/// A positive decision selects `classes[1]`, otherwise `classes[0]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f32>,
    #[serde(default)]
    pub intercept: f32,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

impl LinearModel {
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: LinearModel = serde_json::from_str(json)?;
        if model.coefficients.is_empty() {
            return Err(ClassifierError::ModelError("Linear model has no coefficients".into()));
        }
        if model.classes.len() != 2 {
            return Err(ClassifierError::ModelError(format!(
                "Linear model must declare exactly 2 classes, found {}",
                model.classes.len()
            )));
        }
        Ok(model)
    }

    pub fn decision_function(&self, features: &Array1<f32>) -> Result<f32, ClassifierError> {
        if features.len() != self.coefficients.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Feature vector has {} entries, model expects {}",
                features.len(),
                self.coefficients.len()
            )));
        }
        let dot: f32 = features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum();
        Ok(dot + self.intercept)
    }

    pub fn predict(&self, features: &Array1<f32>) -> Result<Label, ClassifierError> {
        let decision = self.decision_function(features)?;
        let class = if decision > 0.0 { self.classes[1] } else { self.classes[0] };
        Ok(Label(class))
    }
}

/// A classifier exported to ONNX (e.g. with skl2onnx).
///
/// The model is expected to:
/// - Accept one float input of shape `[batch_size, num_features]`
/// - Emit the predicted `int64` labels as its first output, shape `[batch_size]`
#[derive(Debug, Clone)]
pub struct OnnxModel {
    session: Arc<Session>,
    input_name: String,
    expected_features: Option<usize>,
}

impl OnnxModel {
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        config: &RuntimeConfig,
    ) -> Result<Self, ClassifierError> {
        let session = create_session_builder(config)?.commit_from_file(path.as_ref())?;
        Self::validate_model(&session)?;
        info!("ONNX model structure validated successfully");

        let input = &session.inputs[0];
        let expected_features = match &input.input_type {
            ValueType::Tensor { dimensions, .. } => dimensions
                .last()
                .and_then(|&d| usize::try_from(d).ok())
                .filter(|&d| d > 0),
            _ => None,
        };
        let input_name = input.name.clone();

        Ok(Self {
            session: Arc::new(session),
            input_name,
            expected_features,
        })
    }

    /// Validates that the model has the expected input/output structure
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        if session.inputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 input for the feature vector".to_string(),
            ));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for the predicted label".to_string(),
            ));
        }
        Ok(())
    }

    pub fn predict(&self, features: &Array1<f32>) -> Result<Label, ClassifierError> {
        let batch = features.clone().insert_axis(Axis(0));
        let tensor = Tensor::from_array(batch).map_err(|e| {
            ClassifierError::PredictionError(format!("Failed to create input tensor: {}", e))
        })?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(self.input_name.as_str(), tensor);

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to run model: {}", e)))?;
        let labels = outputs[0].try_extract_tensor::<i64>().map_err(|e| {
            ClassifierError::PredictionError(format!("Failed to extract label tensor: {}", e))
        })?;

        if labels.len() != 1 {
            return Err(ClassifierError::PredictionError(format!(
                "Expected exactly one label, model returned {}",
                labels.len()
            )));
        }
        let label = labels.iter().next().copied().ok_or_else(|| {
            ClassifierError::PredictionError("Model returned no label".into())
        })?;
        debug!("ONNX model predicted label {}", label);
        Ok(Label(label))
    }
}

/// The loaded classifier artifact.
#[derive(Debug, Clone)]
pub enum ClassifierModel {
    Onnx(OnnxModel),
    Linear(LinearModel),
}

impl ClassifierModel {
    /// Loads a classifier artifact, choosing the backend from the file extension:
    /// `.onnx` for ONNX Runtime, `.json` for a linear weight file.
    pub fn load<P: AsRef<Path>>(path: P, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("onnx") => {
                let model = OnnxModel::from_file(path, config)?;
                info!("Loaded ONNX classifier from {:?}", path);
                Ok(Self::Onnx(model))
            }
            Some("json") => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    ClassifierError::BuildError(format!(
                        "Failed to read model {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let model = LinearModel::from_json(&json)?;
                info!(
                    "Loaded linear classifier from {:?} ({} coefficients)",
                    path,
                    model.coefficients.len()
                );
                Ok(Self::Linear(model))
            }
            _ => Err(ClassifierError::BuildError(format!(
                "Unsupported classifier format: {} (expected .onnx or .json)",
                path.display()
            ))),
        }
    }

    /// Number of features the model declares it consumes, when known.
    pub fn expected_features(&self) -> Option<usize> {
        match self {
            Self::Onnx(model) => model.expected_features,
            Self::Linear(model) => Some(model.coefficients.len()),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Onnx(_) => "onnx",
            Self::Linear(_) => "linear",
        }
    }

    pub fn predict(&self, features: &Array1<f32>) -> Result<Label, ClassifierError> {
        match self {
            Self::Onnx(model) => model.predict(features),
            Self::Linear(model) => model.predict(features),
        }
    }
}
