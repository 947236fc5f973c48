//! Artifact loader: reads the exported model and its feature-column list.
//!
//! An artifact directory contains:
//!
//! - `model.json`: the exported classifier (see [`super::model`])
//! - `model_features.json`: JSON array with the ordered training columns
//! - `manifest.json` + `model.sig` (optional): SHA-256 digests of both
//!   artifacts, signed with Ed25519
//!
//! # Integrity
//!
//! Both artifacts are read into memory once, and the digests are computed
//! over exactly those bytes before they are parsed. When a manifest is
//! present every artifact must be listed in it and match. When a verifying
//! key is configured the manifest signature must verify. With
//! `require_signed` set, a missing manifest, signature or key is an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::model::ExportedClassifier;
use crate::ports::ModelError;

pub const MODEL_FILE: &str = "model.json";
pub const FEATURES_FILE: &str = "model_features.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const SIGNATURE_FILE: &str = "model.sig";

/// Files every manifest must bind.
pub const ARTIFACT_FILES: [&str; 2] = [MODEL_FILE, FEATURES_FILE];

/// Errors raised while loading artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {file}: {reason}")]
    Format { file: &'static str, reason: String },

    #[error("Integrity check failed: {0}")]
    Integrity(String),

    #[error("Signature verification failed: {0}")]
    Signature(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// How strictly artifacts are verified.
#[derive(Debug, Clone, Default)]
pub struct IntegrityPolicy {
    /// Refuse artifacts that are not covered by a verified signature.
    pub require_signed: bool,
    /// Key the manifest signature is checked against.
    pub verifying_key: Option<VerifyingKey>,
}

/// Outcome of integrity verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// No manifest present
    Unverified,
    /// Manifest digests matched, signature not checked
    DigestsOnly,
    /// Signature and digests verified
    Signed,
}

impl std::fmt::Display for Verification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unverified => write!(f, "unverified"),
            Self::DigestsOnly => write!(f, "digests verified"),
            Self::Signed => write!(f, "signature verified"),
        }
    }
}

/// Signed description of an artifact directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<i64>,
    /// File name → lowercase hex SHA-256.
    pub files: BTreeMap<String, String>,
}

/// Everything read from an artifact directory.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub classifier: ExportedClassifier,
    pub known_columns: Vec<String>,
    pub verification: Verification,
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a base64 Ed25519 verifying key.
///
/// # Errors
/// Returns `ArtifactError::Signature` if the key is malformed.
pub fn verifying_key_from_b64(b64: &str) -> Result<VerifyingKey, ArtifactError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|_| ArtifactError::Signature("invalid public key base64".into()))?;
    let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        ArtifactError::Signature("invalid public key length (expected 32 bytes)".into())
    })?;
    VerifyingKey::from_bytes(&key)
        .map_err(|_| ArtifactError::Signature("invalid verifying key".into()))
}

/// Parse the ordered training column list.
///
/// # Errors
/// Returns `ArtifactError::Format` if the list is empty, not a JSON string
/// array, or contains duplicates.
pub fn parse_feature_columns(content: &[u8]) -> Result<Vec<String>, ArtifactError> {
    let invalid = |reason: String| ArtifactError::Format {
        file: FEATURES_FILE,
        reason,
    };

    let columns: Vec<String> = serde_json::from_slice(content).map_err(|e| invalid(e.to_string()))?;
    if columns.is_empty() {
        return Err(invalid("column list is empty".into()));
    }
    for (i, c) in columns.iter().enumerate() {
        if columns[..i].contains(c) {
            return Err(invalid(format!("duplicate column {c:?}")));
        }
    }
    Ok(columns)
}

/// Check the manifest (and its signature) against the artifact bytes.
fn verify(
    dir: &Path,
    policy: &IntegrityPolicy,
    artifacts: &[(&str, &[u8])],
) -> Result<Verification, ArtifactError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        if policy.require_signed {
            return Err(ArtifactError::Integrity(format!(
                "signed artifacts required but {MANIFEST_FILE} is missing in {dir:?}"
            )));
        }
        tracing::warn!("No {} in {:?}; loading unverified artifacts", MANIFEST_FILE, dir);
        return Ok(Verification::Unverified);
    }

    let manifest_bytes = read(&manifest_path)?;

    let signed = match &policy.verifying_key {
        Some(key) => {
            let sig_path = dir.join(SIGNATURE_FILE);
            if !sig_path.exists() {
                return Err(ArtifactError::Signature(format!(
                    "{SIGNATURE_FILE} not found in {dir:?}"
                )));
            }
            let sig_bytes = read(&sig_path)?;
            let sig: [u8; 64] = sig_bytes.as_slice().try_into().map_err(|_| {
                ArtifactError::Signature("invalid signature length (expected 64 bytes)".into())
            })?;
            key.verify(&manifest_bytes, &Signature::from_bytes(&sig))
                .map_err(|_| ArtifactError::Signature("manifest signature is invalid".into()))?;
            true
        }
        None if policy.require_signed => {
            return Err(ArtifactError::Signature(
                "signed artifacts required but no verifying key is configured".into(),
            ));
        }
        None => {
            tracing::warn!("No verifying key configured; checking manifest digests only");
            false
        }
    };

    let manifest: ArtifactManifest =
        serde_json::from_slice(&manifest_bytes).map_err(|e| ArtifactError::Format {
            file: MANIFEST_FILE,
            reason: e.to_string(),
        })?;
    if manifest.version != 1 {
        return Err(ArtifactError::Format {
            file: MANIFEST_FILE,
            reason: format!("unsupported manifest version {}", manifest.version),
        });
    }

    for (name, bytes) in artifacts {
        let expected = manifest.files.get(*name).ok_or_else(|| {
            ArtifactError::Integrity(format!("{MANIFEST_FILE} does not bind {name}"))
        })?;
        if !constant_time_eq_str(&sha256_hex(bytes), &expected.to_ascii_lowercase()) {
            return Err(ArtifactError::Integrity(format!("digest mismatch for {name}")));
        }
    }

    Ok(if signed {
        Verification::Signed
    } else {
        Verification::DigestsOnly
    })
}

/// Load and verify the artifacts in `dir`.
///
/// # Errors
/// Returns an error if a file is missing or unreadable, fails integrity
/// verification, or does not parse into a valid model / column list.
pub fn load_artifacts(dir: &Path, policy: &IntegrityPolicy) -> Result<LoadedArtifacts, ArtifactError> {
    let model_path = dir.join(MODEL_FILE);
    let features_path = dir.join(FEATURES_FILE);

    let model_bytes = read(&model_path)?;
    let features_bytes = read(&features_path)?;

    let verification = verify(
        dir,
        policy,
        &[
            (MODEL_FILE, model_bytes.as_slice()),
            (FEATURES_FILE, features_bytes.as_slice()),
        ],
    )?;

    let model_json = std::str::from_utf8(&model_bytes).map_err(|e| ArtifactError::Format {
        file: MODEL_FILE,
        reason: e.to_string(),
    })?;
    let classifier = ExportedClassifier::from_json(model_json)?;
    let known_columns = parse_feature_columns(&features_bytes)?;

    tracing::info!(
        "Loaded {} model from {:?} ({} classes, {} features, {})",
        classifier.kind(),
        model_path,
        crate::ports::Classifier::classes(&classifier).len(),
        known_columns.len(),
        verification
    );

    Ok(LoadedArtifacts {
        classifier,
        known_columns,
        verification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use rand::RngCore;
    use tempfile::tempdir;

    const MODEL_JSON: &str = r#"{
        "kind": "logistic_regression",
        "classes": ["High", "Low", "Moderate"],
        "coef": [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
        "intercept": [0.0, 0.0, 0.0]
    }"#;
    const FEATURES_JSON: &str = r#"["Mother's age", "Maternal gene_Yes"]"#;

    fn write_artifacts(dir: &Path) {
        std::fs::write(dir.join(MODEL_FILE), MODEL_JSON).expect("write model");
        std::fs::write(dir.join(FEATURES_FILE), FEATURES_JSON).expect("write features");
    }

    fn signing_key() -> SigningKey {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        SigningKey::from_bytes(&seed)
    }

    fn write_manifest(dir: &Path, key: Option<&SigningKey>) {
        let mut files = BTreeMap::new();
        for name in ARTIFACT_FILES {
            let bytes = std::fs::read(dir.join(name)).expect("read artifact");
            files.insert(name.to_string(), sha256_hex(&bytes));
        }
        let manifest = ArtifactManifest {
            version: 1,
            created_at: Some(1_700_000_000),
            files,
        };
        let bytes = serde_json::to_vec_pretty(&manifest).expect("serialize manifest");
        std::fs::write(dir.join(MANIFEST_FILE), &bytes).expect("write manifest");

        if let Some(key) = key {
            let sig: Signature = key.sign(&bytes);
            std::fs::write(dir.join(SIGNATURE_FILE), sig.to_bytes()).expect("write signature");
        }
    }

    #[test]
    fn test_load_unsigned_artifacts() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let loaded =
            load_artifacts(temp.path(), &IntegrityPolicy::default()).expect("load artifacts");
        assert_eq!(loaded.verification, Verification::Unverified);
        assert_eq!(loaded.known_columns.len(), 2);
        assert_eq!(loaded.classifier.kind(), "logistic_regression");
    }

    #[test]
    fn test_require_signed_without_manifest_fails() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let policy = IntegrityPolicy {
            require_signed: true,
            verifying_key: None,
        };
        assert!(matches!(
            load_artifacts(temp.path(), &policy),
            Err(ArtifactError::Integrity(_))
        ));
    }

    #[test]
    fn test_signed_manifest_verifies() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        let key = signing_key();
        write_manifest(temp.path(), Some(&key));

        let policy = IntegrityPolicy {
            require_signed: true,
            verifying_key: Some(key.verifying_key()),
        };
        let loaded = load_artifacts(temp.path(), &policy).expect("load signed artifacts");
        assert_eq!(loaded.verification, Verification::Signed);
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        write_manifest(temp.path(), Some(&signing_key()));

        let policy = IntegrityPolicy {
            require_signed: false,
            verifying_key: Some(signing_key().verifying_key()),
        };
        assert!(matches!(
            load_artifacts(temp.path(), &policy),
            Err(ArtifactError::Signature(_))
        ));
    }

    #[test]
    fn test_tampered_artifact_is_rejected() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        write_manifest(temp.path(), None);

        let loaded =
            load_artifacts(temp.path(), &IntegrityPolicy::default()).expect("digests match");
        assert_eq!(loaded.verification, Verification::DigestsOnly);

        std::fs::write(
            temp.path().join(FEATURES_FILE),
            r#"["Father's age", "Maternal gene_Yes"]"#,
        )
        .expect("tamper features");
        assert!(matches!(
            load_artifacts(temp.path(), &IntegrityPolicy::default()),
            Err(ArtifactError::Integrity(_))
        ));
    }

    #[test]
    fn test_missing_model_is_io_error() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join(FEATURES_FILE), FEATURES_JSON).expect("write");

        assert!(matches!(
            load_artifacts(temp.path(), &IntegrityPolicy::default()),
            Err(ArtifactError::Io { .. })
        ));
    }

    #[test]
    fn test_feature_columns_validation() {
        assert!(parse_feature_columns(b"[]").is_err());
        assert!(parse_feature_columns(br#"["a", "b", "a"]"#).is_err());
        assert!(parse_feature_columns(br#"{"a": 1}"#).is_err());
        assert_eq!(
            parse_feature_columns(br#"["b", "a"]"#).expect("valid list"),
            vec!["b".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn test_verifying_key_from_b64() {
        let key = signing_key().verifying_key();
        let b64 = base64::engine::general_purpose::STANDARD.encode(key.to_bytes());
        assert_eq!(verifying_key_from_b64(&b64).expect("decode key"), key);
        assert!(verifying_key_from_b64("not base64!").is_err());
        assert!(verifying_key_from_b64("AAAA").is_err());
    }
}
