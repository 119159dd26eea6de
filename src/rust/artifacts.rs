use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::classifier::{ClassifierError, NewsClassifier};
use crate::config::ArtifactConfig;

/// Startup failures. `NotFound` is the artifact-not-found kind; every other variant is
/// an artifact-load-error.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("File not found: {file}. Please ensure the file exists.")]
    NotFound { file: String, path: PathBuf },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
    #[error("{0}")]
    LoadError(#[from] ClassifierError),
}

impl ArtifactError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fails with [`ArtifactError::NotFound`] naming the file when `path` does not exist.
pub fn ensure_exists(path: &Path) -> Result<(), ArtifactError> {
    log::info!("Checking artifact: {:?} (exists: {})", path, path.exists());
    if !path.is_file() {
        return Err(ArtifactError::NotFound {
            file: file_name(path),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

pub fn sha256_hex(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path)?;
    log::debug!("Read {} bytes from {:?}", bytes.len(), path);
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compares the file's SHA-256 against `expected` when one is configured.
pub fn verify_file(path: &Path, expected: Option<&str>) -> Result<(), ArtifactError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let actual = sha256_hex(path)?;
    log::info!("Calculated hash: {}", actual);
    log::info!("Expected hash:   {}", expected);
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        log::error!("{} hash mismatch: expected {}, got {}", file_name(path), expected, actual);
        return Err(ArtifactError::HashMismatch {
            file: file_name(path),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Resolves, verifies and loads both artifacts.
///
/// The classifier is checked before the vectorizer, so when both are missing the
/// classifier is the file named in the error.
pub fn load_classifier(config: &ArtifactConfig) -> Result<NewsClassifier, ArtifactError> {
    let model_path = config.model_path();
    let vectorizer_path = config.vectorizer_path();

    ensure_exists(&model_path)?;
    ensure_exists(&vectorizer_path)?;

    verify_file(&model_path, config.model_sha256.as_deref())?;
    verify_file(&vectorizer_path, config.vectorizer_sha256.as_deref())?;

    let classifier = NewsClassifier::builder()
        .with_runtime_config(config.runtime.clone())
        .with_model(&model_path)?
        .with_vectorizer(&vectorizer_path)?
        .build()?;

    log::info!("Classifier and vectorizer ready to use");
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_named() {
        let err = ensure_exists(Path::new("/nonexistent/dir/model.onnx")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "File not found: model.onnx. Please ensure the file exists."
        );
    }

    #[test]
    fn test_sha256_of_known_content() -> Result<(), ArtifactError> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"abc")?;
        assert_eq!(
            sha256_hex(file.path())?,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        Ok(())
    }

    #[test]
    fn test_verify_file() -> Result<(), ArtifactError> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"abc")?;

        verify_file(file.path(), None)?;
        verify_file(
            file.path(),
            Some("BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"),
        )?;

        let err = verify_file(file.path(), Some("00")).unwrap_err();
        assert!(matches!(err, ArtifactError::HashMismatch { .. }));
        assert!(!err.is_not_found());
        Ok(())
    }
}
