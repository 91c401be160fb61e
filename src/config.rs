use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
}

fn default_port() -> u16 { 8000 }

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        // Best-effort .env loading — ignore errors.
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("CHEATERSTATS").separator("__"))
            .build()?;
        Ok(config.try_deserialize().unwrap_or_else(|_| Self {
            port: default_port(),
            database_url: None,
            database_name: None,
        }))
    }
}
