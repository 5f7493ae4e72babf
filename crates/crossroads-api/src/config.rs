//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crossroads_content::domain::bundle::BundleFormat;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Game-data bundle (`.json`, `.yaml` or `.yml`).
    pub content_path: PathBuf,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `CONTENT_PATH` is missing or has an
    /// unsupported extension, or if `PORT` is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let content_path = lookup("CONTENT_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Config("CONTENT_PATH environment variable must be set".into()))?;
        if BundleFormat::from_path(&content_path).is_none() {
            return Err(AppError::Config(format!(
                "CONTENT_PATH must point to a .json, .yaml or .yml file: {}",
                content_path.display()
            )));
        }
        let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.is_empty());

        Ok(Self {
            host,
            port,
            content_path,
            otlp_endpoint,
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
