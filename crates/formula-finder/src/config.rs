use std::net::SocketAddr;

use finder_common::search_api::SearchApiConfig;

use crate::error::AppError;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Application configuration loaded from environment variables.
///
/// Everything has a default, so an empty environment serves the page on
/// 127.0.0.1:8080 against a search API on localhost:8001.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the page is served on.
    pub bind: SocketAddr,
    /// Where searches are posted.
    pub search_api: SearchApiConfig,
}

impl Config {
    /// Optional:
    /// - `FINDER_BIND` (default: "127.0.0.1:8080")
    /// - `SEARCH_API_URL`, `SEARCH_API_TIMEOUT_SECS`, `SEARCH_API_MAX_ERROR_BODY_BYTES`
    pub fn from_env() -> Result<Self, AppError> {
        let raw_bind = std::env::var("FINDER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind = parse_bind(&raw_bind)?;

        Ok(Self {
            bind,
            search_api: SearchApiConfig::from_env(),
        })
    }
}

fn parse_bind(raw: &str) -> Result<SocketAddr, AppError> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("FINDER_BIND must be <ip>:<port>, got {raw:?}: {e}")))
}
