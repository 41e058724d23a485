use std::sync::Arc;

use mttf_core::{PredictError, PredictResult};
use mttf_model::Predictor;
use mttf_store::app_config::ArtifactsConfig;
use mttf_store::{ArtifactInfo, LoadedArtifacts};

/// Built once at startup and cloned into every handler.
///
/// A failed artifact load does not stop the server: the error is kept and
/// returned from every prediction until the process is restarted.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Result<Arc<Predictor>, PredictError>,
    pub artifacts: Option<ArtifactInfo>,
}

impl AppState {
    pub fn load(config: &ArtifactsConfig) -> Self {
        let loaded = mttf_store::load_predictor(config);
        if let Err(e) = &loaded {
            tracing::error!("Artifacts failed to load, predictions disabled: {}", e);
        }
        Self::from_loaded(loaded)
    }

    pub fn from_loaded(loaded: PredictResult<LoadedArtifacts>) -> Self {
        match loaded {
            Ok(LoadedArtifacts { predictor, info }) => Self {
                predictor: Ok(Arc::new(predictor)),
                artifacts: Some(info),
            },
            Err(e) => Self {
                predictor: Err(e),
                artifacts: None,
            },
        }
    }

    pub fn predictor(&self) -> PredictResult<&Predictor> {
        self.predictor.as_deref().map_err(PredictError::clone)
    }
}
