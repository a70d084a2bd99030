//! Persistence for trained volatility models.
//!
//! A model is stored as two files: the regressor's native serialization at
//! `<path>.bin` and a JSON sidecar at `<path>` holding the training time and
//! metrics. Writes are unconditional overwrites; callers running concurrent
//! trainers against one path must coordinate themselves.

use crate::application::ml::regressor::Regressor;
use crate::application::ml::volatility_predictor::VolatilityModel;
use crate::domain::errors::ModelStoreError;
use crate::domain::ml::training_metrics::ModelMetadata;
use chrono::Utc;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_MODEL_PATH: &str = "./saved-models/volatility-model.json";

/// Handles persistence of a volatility model to disk.
#[derive(Debug, Clone)]
pub struct ModelStore {
    metadata_path: PathBuf,
}

impl ModelStore {
    pub fn new(metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            metadata_path: metadata_path.into(),
        }
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// `<path>.bin`, appended to the full file name rather than replacing
    /// its extension.
    pub fn binary_path(&self) -> PathBuf {
        let mut name = OsString::from(self.metadata_path.as_os_str());
        name.push(".bin");
        PathBuf::from(name)
    }

    fn display_path(&self) -> String {
        self.metadata_path.display().to_string()
    }

    /// Writes the model binary and its metadata sidecar, stamping
    /// `trainedAt` with the save time.
    pub fn save<R: Regressor>(&self, model: &VolatilityModel<R>) -> Result<(), ModelStoreError> {
        let (regressor, metadata) = match model {
            VolatilityModel::Trained {
                regressor,
                metadata,
            } => (regressor, metadata),
            VolatilityModel::Untrained => return Err(ModelStoreError::NothingToSave),
        };

        if let Some(parent) = self.metadata_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ModelStoreError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        regressor.save(&self.binary_path())?;

        let metadata = ModelMetadata {
            trained_at: Utc::now(),
            ..metadata.clone()
        };
        let content =
            serde_json::to_string(&metadata).map_err(|source| ModelStoreError::Metadata {
                path: self.display_path(),
                source,
            })?;
        fs::write(&self.metadata_path, content).map_err(|source| ModelStoreError::Io {
            path: self.display_path(),
            source,
        })?;

        info!(
            "Model saved to {:?} (+ binary at {:?})",
            self.metadata_path,
            self.binary_path()
        );
        Ok(())
    }

    /// Reads only the metadata sidecar.
    pub fn read_metadata(&self) -> Result<ModelMetadata, ModelStoreError> {
        let content =
            fs::read_to_string(&self.metadata_path).map_err(|source| ModelStoreError::Io {
                path: self.display_path(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| ModelStoreError::Metadata {
            path: self.display_path(),
            source,
        })
    }

    /// Restores a trained model written by `save`.
    pub fn load<R: Regressor>(&self) -> Result<VolatilityModel<R>, ModelStoreError> {
        let binary_path = self.binary_path();
        if !binary_path.exists() {
            warn!("Model file not found at {:?}", binary_path);
            return Err(ModelStoreError::ModelFileNotFound {
                path: binary_path.display().to_string(),
            });
        }

        let regressor = R::load(&binary_path)?;
        let metadata = self.read_metadata()?;

        info!("Model loaded from {:?} ({})", self.metadata_path, regressor.name());
        Ok(VolatilityModel::Trained {
            regressor,
            metadata,
        })
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH)
    }
}
