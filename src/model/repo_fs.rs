//! Filesystem store for the scaler and estimator artefacts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::common::config::AppCfg;
use crate::common::error::{StoreError, StoreResult};

use super::domain::{EstimatorArtefact, FeatureScaler, ModelStore, PriceEstimator, ScalerArtefact};

/// Reads JSON artefacts from the paths configured in [`AppCfg`].
pub struct FsModelStore {
    model_path: PathBuf,
    scaler_path: PathBuf,
}

impl FsModelStore {
    pub fn new(cfg: &AppCfg) -> Self {
        Self {
            model_path: cfg.model_path.clone(),
            scaler_path: cfg.scaler_path.clone(),
        }
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: display,
            source,
        })
    }
}

impl ModelStore for FsModelStore {
    fn load_scaler(&self) -> StoreResult<Box<dyn FeatureScaler>> {
        Self::read_json::<ScalerArtefact>(&self.scaler_path)?.into_scaler()
    }

    fn load_estimator(&self) -> StoreResult<Box<dyn PriceEstimator>> {
        Self::read_json::<EstimatorArtefact>(&self.model_path)?.into_estimator()
    }
}
