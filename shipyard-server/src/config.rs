//! Server configuration loaded from the environment.

use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// PostgreSQL connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Read settings from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SHIPYARD_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("SHIPYARD_PORT") {
            Some(raw) => u16::from_str(raw.trim())
                .map_err(|_| format!("SHIPYARD_PORT must be a u16 number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };
        let origins = lookup("SHIPYARD_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let allowed_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        Ok(Self {
            host,
            port,
            allowed_origins,
            database_url,
        })
    }
}
