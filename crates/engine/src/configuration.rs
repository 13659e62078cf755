use config::ConfigError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage_dir: String,
    pub storage_key: String,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .set_default("storage_dir", ".missions")?
            .set_default("storage_key", "missions-save")? // => Default for local development
            .build()?;
        config.try_deserialize()
    }
}
