use serde::Deserialize;
use std::fmt;

/// Connection settings for the object store gateway.
#[derive(Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL the adapter talks to (e.g., `http://store.internal:9000`).
    #[serde(default)]
    pub endpoint: String,
    /// Base URL embedded in presigned links handed to browsers. Falls back
    /// to `endpoint` when empty.
    #[serde(default)]
    pub public_endpoint: String,
    /// Bearer token for authenticated requests.
    #[serde(default)]
    pub access_token: String,
    /// Shared secret for HMAC presigning.
    #[serde(default)]
    pub signing_secret: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9000".to_string(),
            public_endpoint: String::new(),
            access_token: String::new(),
            signing_secret: String::new(),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("public_endpoint", &self.public_endpoint)
            .field("access_token", &"[REDACTED]")
            .field("signing_secret", &"[REDACTED]")
            .finish()
    }
}

impl StoreConfig {
    /// Returns the browser-facing base URL. Falls back to the internal
    /// endpoint if no public endpoint is configured.
    pub fn public_base(&self) -> &str {
        if self.public_endpoint.is_empty() {
            &self.endpoint
        } else {
            &self.public_endpoint
        }
    }
}
