use log::LevelFilter;

use crate::errors::{MealError, MealResult};
use crate::utils::random_utils::DEFAULT_RANDOM_ORG_URL;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    pub random_org_url: String,
    pub log_level: LevelFilter,
}

impl Settings {
    /// Reads the settings from the environment.
    ///
    /// Required: DATABASE_URL
    /// Optional: BIND_ADDRESS, PORT, RANDOM_ORG_URL, LOG_LEVEL
    pub fn from_env() -> MealResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> MealResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| MealError::Config("DATABASE_URL must be set".into()))?;
        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| MealError::Config(format!("Invalid PORT: {}", port)))?,
            None => DEFAULT_PORT,
        };
        let random_org_url =
            lookup("RANDOM_ORG_URL").unwrap_or_else(|| DEFAULT_RANDOM_ORG_URL.to_string());
        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| MealError::Config(format!("Invalid LOG_LEVEL: {}", level)))?,
            None => LevelFilter::Info,
        };

        Ok(Settings {
            database_url,
            bind_address,
            port,
            random_org_url,
            log_level,
        })
    }
}
