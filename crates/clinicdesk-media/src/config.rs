//! Client configuration
//!
//! Settings for the authenticated fetch client, loaded from an optional JSON
//! file and then overridden by command-line flags or environment variables.
//!
//! ```json
//! {
//!   "base_url": "https://api.clinic.example",
//!   "token": "eyJhbGciOi...",
//!   "tenant_id": "st-marys",
//!   "timeout_secs": 30
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on a single payload: 64 MB
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Header carrying the tenant on every request
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Settings for [`AuthenticatedClient`](crate::fetch::AuthenticatedClient)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin relative references are joined onto
    pub base_url: String,
    /// Bearer token, if the session has one
    pub token: Option<String>,
    /// Tenant (hospital/clinic) the session belongs to
    pub tenant_id: Option<String>,
    pub timeout_secs: u64,
    pub max_payload_bytes: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: None,
            tenant_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            user_agent: format!("clinicdesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MediaError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// `<config_dir>/clinicdesk/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clinicdesk")
            .join("config.json")
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_max_payload(mut self, bytes: u64) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    /// Layer flag or environment values over what the file said.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        token: Option<String>,
        tenant_id: Option<String>,
    ) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if token.is_some() {
            self.token = token;
        }
        if tenant_id.is_some() {
            self.tenant_id = tenant_id;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> MediaResult<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| MediaError::Config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(MediaError::Config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.max_payload_bytes == 0 {
            return Err(MediaError::Config("max_payload_bytes must be positive".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(MediaError::Config("timeout_secs must be positive".to_string()));
        }

        Ok(())
    }

    /// Copy safe to print: the token is replaced by a marker.
    pub fn redacted(&self) -> Self {
        Self {
            token: self.token.as_ref().map(|_| "<redacted>".to_string()),
            ..self.clone()
        }
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> MediaResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
