use config::ConfigError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub content_api_url: String,
    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .set_default("content_api_url", "http://localhost:3001")? // => Default for local development
            .set_default("request_timeout_seconds", 10)?
            .build()?;
        config.try_deserialize()
    }
}
