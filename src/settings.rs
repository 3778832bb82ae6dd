use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use tracing::info;

const DEFAULT_DB_PATH: &str = "data/hanja.sqlite";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Defaults, overridden by `HANJA_DB_PATH`, `HANJA_HOST`, `HANJA_PORT`.
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("HANJA"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
            .context("Invalid HANJA_* configuration")?;

        info!(db = %settings.db_path, host = %settings.host, port = settings.port, "Settings loaded");
        Ok(settings)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
