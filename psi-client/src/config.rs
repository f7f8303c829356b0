//! # Client Configuration
//!
//! Purpose: Describe where the client connects and how strictly it checks
//! batches, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use psi_common::{Endpoint, PsiError, PsiResult};

/// Configuration for `PsiClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service address used by `connect_configured`, e.g. "127.0.0.1".
    pub address: String,
    /// Service port used by `connect_configured`.
    pub port: u16,
    /// Check `is_connected` before each query and fail with `NotConnected`
    /// instead of letting the engine report an opaque query failure.
    pub require_connection: bool,
    /// Largest batch accepted by `query`. `None` means the engine limit.
    pub max_batch_len: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            address: "127.0.0.1".to_string(),
            port: 1212,
            require_connection: false,
            max_batch_len: None,
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from JSON. Missing fields take default values.
    pub fn from_json_str(raw: &str) -> PsiResult<Self> {
        serde_json::from_str(raw).map_err(|err| PsiError::Config(err.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> PsiResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| PsiError::Config(format!("{}: {}", path.display(), err)))?;
        Self::from_json_str(&raw)
    }

    /// Validated endpoint for `connect_configured`.
    pub fn endpoint(&self) -> PsiResult<Endpoint> {
        Endpoint::new(self.address.clone(), self.port)
    }
}
