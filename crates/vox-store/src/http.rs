use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::ObjectStore;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Client for an S3-compatible HTTP object store gateway.
///
/// Objects live at `{endpoint}/{bucket}/{key}`; authentication is a bearer
/// token. Presigned URLs are computed client-side: an `expires` unix
/// timestamp plus an HMAC-SHA256 signature over the method, object path, and
/// expiry, so the gateway can verify reads without the bearer token.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl HttpObjectStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.config.endpoint, bucket, key)
    }

    /// Computes the presign signature for a GET of `bucket`/`key` valid
    /// until `expires` (unix seconds).
    fn sign_get(&self, bucket: &str, key: &str, expires: u64) -> Result<String, StoreError> {
        if self.config.signing_secret.is_empty() {
            return Err(StoreError::Config(
                "signing_secret is not set; cannot presign URLs".to_string(),
            ));
        }
        let mut mac = HmacSha256::new_from_slice(self.config.signing_secret.as_bytes())
            .map_err(|e| StoreError::Config(format!("invalid signing secret: {}", e)))?;
        mac.update(format!("GET\n{}/{}\n{}", bucket, key, expires).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut req = self
            .client
            .put(self.object_url(bucket, key))
            .bearer_auth(&self.config.access_token)
            .body(bytes);
        if let Some(ct) = content_type {
            req = req.header(reqwest::header::CONTENT_TYPE, ct);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(StoreError::Transport(format!(
                "put {}/{} failed: {}",
                bucket,
                key,
                resp.status()
            )));
        }
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let resp = self
            .client
            .get(self.object_url(bucket, key))
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            status if status.is_success() => Ok(resp.bytes().await?.to_vec()),
            status => Err(StoreError::Transport(format!(
                "get {}/{} failed: {}",
                bucket, key, status
            ))),
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let resp = self
            .client
            .delete(self.object_url(bucket, key))
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        // Deleting an already-absent object is not an error.
        if !resp.status().is_success() && resp.status() != StatusCode::NOT_FOUND {
            return Err(StoreError::Transport(format!(
                "delete {}/{} failed: {}",
                bucket,
                key,
                resp.status()
            )));
        }
        Ok(())
    }

    async fn presign(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, StoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StoreError::Config(format!("system clock before unix epoch: {}", e)))?;
        let expires = now.as_secs().saturating_add(ttl.as_secs());
        let signature = self.sign_get(bucket, key, expires)?;

        Ok(format!(
            "{}/{}/{}?expires={}&signature={}",
            self.config.public_base(),
            bucket,
            key,
            expires,
            signature
        ))
    }
}
