//! Model Artifacts - Loading & integrity check
//!
//! Dispatch on file extension, verify optional `.sha256` sidecar.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::inference::{OnnxRiskModel, RiskModel, SoftmaxRegressionModel};
use crate::logic::error::ModelUnavailableError;

/// Metadata about a loaded model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub format: String,
    /// Hex SHA-256 of the model bytes
    pub sha256: String,
    pub checksum_verified: bool,
    pub loaded_at: DateTime<Utc>,
}

/// Compute hex SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Path of the checksum sidecar for a model file
pub fn checksum_path(model_path: &Path) -> PathBuf {
    let mut name = model_path.as_os_str().to_owned();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Verify model bytes against the sidecar, if one exists.
///
/// Returns `Ok(true)` when verified, `Ok(false)` when there is no sidecar.
pub fn verify_checksum(model_path: &Path, digest: &str) -> Result<bool, ModelUnavailableError> {
    let sidecar = checksum_path(model_path);
    if !sidecar.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(&sidecar)
        .map_err(|e| ModelUnavailableError::new(model_path, format!("Failed to read checksum: {}", e)))?;

    // sha256sum format: "<digest>  <file name>"
    let expected = content
        .split_whitespace()
        .next()
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    if expected != digest {
        return Err(ModelUnavailableError::new(
            model_path,
            format!("Checksum mismatch: expected {}, got {}", expected, digest),
        ));
    }

    Ok(true)
}

/// Load a model artifact, choosing the backend by extension
pub fn load_model(model_path: &Path) -> Result<(Box<dyn RiskModel>, ArtifactInfo), ModelUnavailableError> {
    if !model_path.exists() {
        return Err(ModelUnavailableError::new(model_path, "Model not found"));
    }

    let bytes = std::fs::read(model_path)
        .map_err(|e| ModelUnavailableError::new(model_path, format!("Failed to read model: {}", e)))?;
    let digest = sha256_hex(&bytes);
    let checksum_verified = verify_checksum(model_path, &digest)?;

    let extension = model_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let model: Box<dyn RiskModel> = match extension.as_str() {
        "onnx" => Box::new(OnnxRiskModel::load(model_path)?),
        "json" => Box::new(SoftmaxRegressionModel::load(model_path)?),
        other => {
            return Err(ModelUnavailableError::new(
                model_path,
                format!("Unsupported model format: `{}`", other),
            ))
        }
    };

    let info = ArtifactInfo {
        path: model_path.to_path_buf(),
        format: model.format().to_string(),
        sha256: digest,
        checksum_verified,
        loaded_at: Utc::now(),
    };

    log::info!(
        "Model artifact ready: {} ({}, sha256 {}{})",
        info.path.display(),
        info.format,
        &info.sha256[..12],
        if checksum_verified { ", verified" } else { "" }
    );

    Ok((model, info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MODEL_JSON: &str = r#"{
        "weights": [[0,0,0,0,0,0,-1,0],[0,0,0,0,0,0,0,0],[0,0,0,0,0,0,1,0]],
        "bias": [0.5, 0.0, -0.5]
    }"#;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_checksum_path() {
        assert_eq!(
            checksum_path(Path::new("/models/risk_model.onnx")),
            PathBuf::from("/models/risk_model.onnx.sha256")
        );
    }

    #[test]
    fn test_load_json_model_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_model.json");
        fs::write(&path, MODEL_JSON).unwrap();

        let (model, info) = load_model(&path).unwrap();
        assert_eq!(model.format(), "softmax_regression");
        assert_eq!(info.format, "softmax_regression");
        assert_eq!(info.sha256, sha256_hex(MODEL_JSON.as_bytes()));
        assert!(!info.checksum_verified);
    }

    #[test]
    fn test_load_with_matching_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_model.json");
        fs::write(&path, MODEL_JSON).unwrap();
        let digest = sha256_hex(MODEL_JSON.as_bytes());
        fs::write(checksum_path(&path), format!("{}  risk_model.json\n", digest.to_uppercase())).unwrap();

        let (_, info) = load_model(&path).unwrap();
        assert!(info.checksum_verified);
    }

    #[test]
    fn test_reject_checksum_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_model.json");
        fs::write(&path, MODEL_JSON).unwrap();
        fs::write(checksum_path(&path), "deadbeef").unwrap();

        let err = load_model(&path).err().unwrap();
        assert!(err.reason.contains("Checksum mismatch"));
    }

    #[test]
    fn test_reject_missing_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("risk_model.onnx");
        assert!(load_model(&missing).is_err());

        let h5 = dir.path().join("risk_model.h5");
        fs::write(&h5, b"HDF").unwrap();
        let err = load_model(&h5).err().unwrap();
        assert!(err.reason.contains("Unsupported"));
    }

    #[test]
    fn test_reject_malformed_json_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_model.json");
        fs::write(&path, r#"{"weights": [[1.0]], "bias": [0.0]}"#).unwrap();
        assert!(load_model(&path).is_err());
    }
}
