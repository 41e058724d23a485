pub mod app_config;
pub mod artifacts;

pub use artifacts::{load_predictor, ArtifactInfo, LoadedArtifacts};
