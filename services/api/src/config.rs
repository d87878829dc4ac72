//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// The API keys are optional at startup: a missing key surfaces as an error
/// at call time, not at boot.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub firebase_api_key: Option<String>,
    /// Cloud storage collaborator identifiers. Loaded for parity with the
    /// deployment environment; no handler reads them.
    pub gcp_project_id: Option<String>,
    pub gcs_bucket_name: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Keys (as optional) ---
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        let firebase_api_key = std::env::var("FIREBASE_API_KEY").ok();

        // --- Load Adapter-specific Settings ---
        let gemini_model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string());

        let gcp_project_id = std::env::var("GCP_PROJECT_ID").ok();
        let gcs_bucket_name = std::env::var("GCS_BUCKET_NAME").ok();

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            gemini_model,
            firebase_api_key,
            gcp_project_id,
            gcs_bucket_name,
        })
    }
}
