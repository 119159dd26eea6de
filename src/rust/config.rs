use std::env;
use std::path::{Path, PathBuf};

use crate::runtime::RuntimeConfig;

/// Environment variable naming the directory that holds the artifacts.
pub const ARTIFACT_DIR_ENV: &str = "NEWSCHECK_ARTIFACTS";
pub const DEFAULT_MODEL_FILE: &str = "model.onnx";
pub const DEFAULT_VECTORIZER_FILE: &str = "vectorizer.json";

/// Where the classifier and vectorizer artifacts live, and how to check and run them.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub artifact_dir: PathBuf,
    /// Classifier file; relative names resolve against `artifact_dir`
    pub model_file: PathBuf,
    /// Vectorizer file; relative names resolve against `artifact_dir`
    pub vectorizer_file: PathBuf,
    /// Expected SHA-256 of the classifier file, hex encoded
    pub model_sha256: Option<String>,
    /// Expected SHA-256 of the vectorizer file, hex encoded
    pub vectorizer_sha256: Option<String>,
    pub runtime: RuntimeConfig,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self::new(Self::default_artifact_dir())
    }
}

impl ArtifactConfig {
    pub fn new<P: AsRef<Path>>(artifact_dir: P) -> Self {
        Self {
            artifact_dir: artifact_dir.as_ref().to_path_buf(),
            model_file: PathBuf::from(DEFAULT_MODEL_FILE),
            vectorizer_file: PathBuf::from(DEFAULT_VECTORIZER_FILE),
            model_sha256: None,
            vectorizer_sha256: None,
            runtime: RuntimeConfig::default(),
        }
    }

    /// Returns the default artifact directory
    pub fn default_artifact_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(ARTIFACT_DIR_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        // 2. Working directory, if it already holds a classifier
        if let Ok(cwd) = env::current_dir() {
            if cwd.join(DEFAULT_MODEL_FILE).exists() {
                return cwd;
            }
        }

        // 3. Platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            let dir = data_dir.join("newscheck");
            if dir.exists() {
                return dir;
            }
        }

        // 4. Fall back to the working directory so missing files are reported there
        PathBuf::from(".")
    }

    pub fn with_model_file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.model_file = file.as_ref().to_path_buf();
        self
    }

    pub fn with_vectorizer_file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.vectorizer_file = file.as_ref().to_path_buf();
        self
    }

    pub fn with_checksums(mut self, model: Option<String>, vectorizer: Option<String>) -> Self {
        self.model_sha256 = model;
        self.vectorizer_sha256 = vectorizer;
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(&self.model_file)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.resolve(&self.vectorizer_file)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.artifact_dir.join(file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_files_resolve_against_dir() {
        let config = ArtifactConfig::new("/srv/models");
        assert_eq!(config.model_path(), PathBuf::from("/srv/models/model.onnx"));
        assert_eq!(config.vectorizer_path(), PathBuf::from("/srv/models/vectorizer.json"));
    }

    #[test]
    fn test_absolute_files_are_kept() {
        let config = ArtifactConfig::new("/srv/models").with_model_file("/opt/other/model.json");
        assert_eq!(config.model_path(), PathBuf::from("/opt/other/model.json"));
    }

    /// Restores the previous value of an environment variable when dropped.
    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var(key).ok();
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_default_artifact_dir_from_env() {
        let _guard = EnvGuard::set(ARTIFACT_DIR_ENV, "/tmp/newscheck-artifacts");
        let path = ArtifactConfig::default_artifact_dir();
        assert_eq!(path, PathBuf::from("/tmp/newscheck-artifacts"));
    }
}
