//! Configuration management for the jukeboxd search proxy.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file under `<data_local_dir>/jukeboxd/`
//! 3. Defaults for everything except the client credentials

use std::{env, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from `.env` in the local data directory.
///
/// The directory is created when missing so the build-time template has a
/// home. A missing `.env` file is not an error; variables already present
/// in the process environment are never overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/jukeboxd/.env`
/// - macOS: `~/Library/Application Support/jukeboxd/.env`
/// - Windows: `%LOCALAPPDATA%/jukeboxd/.env`
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("jukeboxd/.env");
    path
}

/// Returns the address the proxy binds to and the `query` command talks to.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Everything the proxy needs to talk to the Spotify accounts service and
/// Web API.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub token_url: String,
    /// `None` keeps upstream requests without a timeout.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let request_timeout = match get("SPOTIFY_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        key: "SPOTIFY_HTTP_TIMEOUT_SECS",
                        message: e.to_string(),
                    }
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Config {
            server_address: get("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            api_url: get("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_TOKEN_URL.to_string()),
            request_timeout,
        })
    }
}
