//! File-system artifact store: loads the four per-bracket artifacts.
//!
//! Layout of an artifact directory:
//!
//! ```text
//! artifacts/
//!   model_age_under_25.json
//!   model_age_above_25.json
//!   scaler_age_under_25.json
//!   scaler_age_above_25.json
//!   manifest.json            # {"version": 1, "files": {name: sha256-hex}}
//! ```
//!
//! # Integrity
//!
//! When `manifest.json` is present every artifact must be listed in it and
//! match its SHA-256 digest. A directory without a manifest is refused unless
//! the store was built with `allow_unsealed(true)`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::model::ModelArtifact;
use super::scaler::ScalerArtifact;
use crate::application::PredictionService;
use crate::domain::{AgeBracket, BracketPair};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_VERSION: u32 = 1;

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact {file} is inconsistent: {reason}")]
    Schema { file: String, reason: String },

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Integrity check failed for {0}")]
    Integrity(String),

    #[error("No {MANIFEST_FILE} in {0:?}; refusing to load unsealed artifacts")]
    Unsealed(PathBuf),
}

/// SHA-256 digests of the artifact files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

/// The four artifacts, ready to build a prediction service.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub models: BracketPair<ModelArtifact>,
    pub scalers: BracketPair<ScalerArtifact>,
}

impl LoadedArtifacts {
    #[must_use]
    pub fn into_service(self) -> PredictionService<ModelArtifact, ScalerArtifact> {
        PredictionService::new(self.models.map(Arc::new), self.scalers.map(Arc::new))
    }
}

#[must_use]
pub fn model_file_name(bracket: AgeBracket) -> String {
    format!("model_{}.json", bracket.artifact_suffix())
}

#[must_use]
pub fn scaler_file_name(bracket: AgeBracket) -> String {
    format!("scaler_{}.json", bracket.artifact_suffix())
}

/// Every file a complete artifact directory holds, manifest excluded.
#[must_use]
pub fn artifact_file_names() -> Vec<String> {
    AgeBracket::ALL
        .iter()
        .flat_map(|&b| [model_file_name(b), scaler_file_name(b)])
        .collect()
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Compare digests without short-circuiting on the first differing byte.
fn digests_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn read_file(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Hash every artifact in `dir` and write `manifest.json`.
///
/// # Errors
/// Returns `ArtifactError::Io` if an artifact is missing or the manifest
/// cannot be written.
pub fn seal(dir: &Path) -> Result<ArtifactManifest, ArtifactError> {
    let mut files = BTreeMap::new();
    for name in artifact_file_names() {
        let bytes = read_file(&dir.join(&name))?;
        files.insert(name, sha256_hex(&bytes));
    }
    let manifest = ArtifactManifest {
        version: MANIFEST_VERSION,
        files,
    };

    let path = dir.join(MANIFEST_FILE);
    let bytes = serde_json::to_vec_pretty(&manifest).map_err(|source| ArtifactError::Parse {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, bytes).map_err(|source| ArtifactError::Io { path, source })?;

    tracing::info!("Sealed {} artifacts in {:?}", manifest.files.len(), dir);
    Ok(manifest)
}

/// Loads artifacts from a directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
    allow_unsealed: bool,
}

impl FsArtifactStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            allow_unsealed: false,
        }
    }

    /// Permit loading a directory that has no manifest.
    #[must_use]
    pub fn allow_unsealed(mut self, allow: bool) -> Self {
        self.allow_unsealed = allow;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load, verify and validate all four artifacts.
    ///
    /// # Errors
    /// Returns `ArtifactError` if any file is missing, unreadable, fails its
    /// integrity check, or is inconsistent with the feature schema.
    pub fn load(&self) -> Result<LoadedArtifacts, ArtifactError> {
        let manifest = self.read_manifest()?;
        if manifest.is_none() {
            if !self.allow_unsealed {
                return Err(ArtifactError::Unsealed(self.dir.clone()));
            }
            tracing::warn!(
                "Loading UNSEALED artifacts from {:?}; integrity is not verified",
                self.dir
            );
        }
        self.load_verified(manifest.as_ref())
    }

    /// Parse and schema-check all four artifacts, ignoring any manifest.
    ///
    /// Used before (re)sealing a directory whose artifacts were replaced.
    ///
    /// # Errors
    /// Returns `ArtifactError` if any file is missing, unreadable, or
    /// inconsistent with the feature schema.
    pub fn load_unverified(&self) -> Result<LoadedArtifacts, ArtifactError> {
        self.load_verified(None)
    }

    fn load_verified(
        &self,
        manifest: Option<&ArtifactManifest>,
    ) -> Result<LoadedArtifacts, ArtifactError> {
        let models = BracketPair::try_from_fn(|bracket| -> Result<_, ArtifactError> {
            let name = model_file_name(bracket);
            let model: ModelArtifact = self.load_json(&name, manifest)?;
            model
                .validate()
                .map_err(|reason| ArtifactError::Schema { file: name, reason })?;
            Ok(model)
        })?;

        let scalers = BracketPair::try_from_fn(|bracket| -> Result<_, ArtifactError> {
            let name = scaler_file_name(bracket);
            let scaler: ScalerArtifact = self.load_json(&name, manifest)?;
            scaler
                .validate()
                .map_err(|reason| ArtifactError::Schema { file: name, reason })?;
            Ok(scaler)
        })?;

        tracing::info!(
            "Loaded artifacts from {:?} (sealed={})",
            self.dir,
            manifest.is_some()
        );

        Ok(LoadedArtifacts { models, scalers })
    }

    fn read_manifest(&self) -> Result<Option<ArtifactManifest>, ArtifactError> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = read_file(&path)?;
        let manifest: ArtifactManifest =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path, source })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::Manifest(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }
        Ok(Some(manifest))
    }

    fn load_json<T: DeserializeOwned>(
        &self,
        name: &str,
        manifest: Option<&ArtifactManifest>,
    ) -> Result<T, ArtifactError> {
        let path = self.dir.join(name);
        let bytes = read_file(&path)?;

        if let Some(manifest) = manifest {
            let expected = manifest
                .files
                .get(name)
                .ok_or_else(|| ArtifactError::Integrity(format!("{name} is not listed in the manifest")))?;
            if !digests_match(&sha256_hex(&bytes), &expected.to_ascii_lowercase()) {
                return Err(ArtifactError::Integrity(format!("{name} digest mismatch")));
            }
        }

        tracing::debug!("Read artifact {} ({} bytes)", name, bytes.len());
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path, source })
    }
}
