use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use mttf_core::{PredictError, PredictResult};
use mttf_model::{EncoderSet, Predictor, RandomForestRegressor};

use crate::app_config::ArtifactsConfig;

/// Top-level layout of the exported model file. Keys other than `model`
/// (training metrics, timestamps) are ignored.
#[derive(Debug, Deserialize)]
pub struct ModelArtifact {
    pub model: RandomForestRegressor,
}

/// Where the running predictor came from.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub model_path: String,
    pub encoder_path: String,
    pub loaded_at: DateTime<Utc>,
}

pub struct LoadedArtifacts {
    pub predictor: Predictor,
    pub info: ArtifactInfo,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> PredictResult<T> {
    let load_error = |reason: String| PredictError::ArtifactLoad {
        path: path.display().to_string(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| load_error(e.to_string()))
}

pub fn load_model(path: &Path) -> PredictResult<RandomForestRegressor> {
    let artifact: ModelArtifact = read_json(path)?;
    tracing::info!("Loaded model from {} ({} trees)", path.display(), artifact.model.n_trees());
    Ok(artifact.model)
}

pub fn load_encoders(path: &Path) -> PredictResult<EncoderSet> {
    let encoders: EncoderSet = read_json(path)?;
    tracing::info!("Loaded {} encoders from {}", encoders.len(), path.display());
    Ok(encoders)
}

/// Reads both artifacts and checks them against the feature schema.
pub fn load_predictor(config: &ArtifactsConfig) -> PredictResult<LoadedArtifacts> {
    let model = load_model(&config.model_path)?;
    let encoders = load_encoders(&config.encoder_path)?;
    let predictor = Predictor::new(encoders, model)?;

    Ok(LoadedArtifacts {
        predictor,
        info: ArtifactInfo {
            model_path: config.model_path.display().to_string(),
            encoder_path: config.encoder_path.display().to_string(),
            loaded_at: Utc::now(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mttf_core::{ErrorKind, FeatureRecord, ProductType};
    use std::path::PathBuf;

    fn shipped() -> ArtifactsConfig {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../artifacts");
        ArtifactsConfig {
            model_path: root.join("random_forest_model.json"),
            encoder_path: root.join("label_encoders.json"),
        }
    }

    #[test]
    fn test_load_shipped_artifacts() {
        let loaded = load_predictor(&shipped()).expect("sample artifacts should load");
        assert_eq!(loaded.predictor.model().n_trees(), 3);
        assert!(loaded.info.model_path.ends_with("random_forest_model.json"));

        let record = FeatureRecord::new(ProductType::Pump, 45.0, 22.5, 3, 10).unwrap();
        let prediction = loaded.predictor.predict(&record).unwrap();
        assert_eq!(prediction.to_string(), "1266.67 Hours");
    }

    #[test]
    fn test_missing_file() {
        let config = ArtifactsConfig {
            model_path: PathBuf::from("/nonexistent/model.json"),
            encoder_path: shipped().encoder_path,
        };
        let err = load_predictor(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn test_missing_model_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{ "regressor": {} }"#).unwrap();

        let err = load_model(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);
        assert!(err.to_string().contains("model"));
    }

    #[test]
    fn test_extra_keys_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{
                "model": { "feature_names": ["a"], "trees": [{
                    "children_left": [-1], "children_right": [-1],
                    "feature": [-2], "threshold": [-2.0], "value": [7.0]
                }] },
                "metrics": { "r2": 0.81 },
                "trained_at": "2024-05-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        let model = load_model(&path).unwrap();
        assert_eq!(model.predict(&[0.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_malformed_encoders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encoders.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_encoders(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);
    }

    #[test]
    fn test_schema_mismatch_surfaces_from_loader() {
        let dir = tempfile::tempdir().unwrap();
        let encoder_path = dir.path().join("encoders.json");
        std::fs::write(&encoder_path, r#"{ "ProductType": { "classes": ["Pump"] } }"#).unwrap();

        let config = ArtifactsConfig {
            model_path: shipped().model_path,
            encoder_path,
        };
        let err = load_predictor(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    }
}
