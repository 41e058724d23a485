use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String { "0.0.0.0".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    /// JSON export of the fitted regressor, read through its "model" key
    pub model_path: PathBuf,
    /// JSON map of field name to fitted label encoder
    pub encoder_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"), config::Environment::with_prefix("MTTF").separator("__"))
    }

    pub fn load_from(dir: &Path, environment: config::Environment) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::from(dir.join("default")))
            // Optional per-environment overrides
            .add_source(config::File::from(dir.join(&run_mode)).required(false))
            // Developer overrides, not checked in
            .add_source(config::File::from(dir.join("local")).required(false))
            // Eg.. `MTTF__SERVER__PORT=9000` would set `server.port`
            .add_source(environment)
            .build()?;

        s.try_deserialize()
    }
}
