//! In-memory [`ObjectStore`] used by tests and local development.
//!
//! Keeps objects in a `Mutex<HashMap>` and records every presign call so
//! tests can assert on the exact ttl handed to the adapter.

use crate::error::StoreError;
use crate::ObjectStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<(String, String), Vec<u8>>,
    presigns: Vec<(String, String, Duration)>,
    fail_puts: bool,
    fail_deletes: bool,
}

/// In-memory object store double.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    inner: Mutex<Inner>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `put` fail with a transport error.
    pub fn fail_puts(&self) {
        self.inner.lock().unwrap().fail_puts = true;
    }

    /// Makes every subsequent `delete` fail with a transport error.
    pub fn fail_deletes(&self) {
        self.inner.lock().unwrap().fail_deletes = true;
    }

    /// Stores an object directly, bypassing the trait.
    pub fn insert(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.inner
            .lock()
            .unwrap()
            .objects
            .insert((bucket.to_string(), key.to_string()), bytes);
    }

    /// Whether an object currently exists.
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .objects
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Keys currently stored in `bucket`.
    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Every presign call recorded as (bucket, key, ttl).
    pub fn presign_calls(&self) -> Vec<(String, String, Duration)> {
        self.inner.lock().unwrap().presigns.clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_puts {
            return Err(StoreError::Transport("simulated put failure".to_string()));
        }
        inner
            .objects
            .insert((bucket.to_string(), key.to_string()), bytes);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_deletes {
            return Err(StoreError::Transport("simulated delete failure".to_string()));
        }
        inner
            .objects
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn presign(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner
            .objects
            .contains_key(&(bucket.to_string(), key.to_string()))
        {
            return Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        inner
            .presigns
            .push((bucket.to_string(), key.to_string(), ttl));
        Ok(format!(
            "https://store.test/{}/{}?expires={}",
            bucket,
            key,
            ttl.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = MemoryObjectStore::new();
        store
            .put("temp", "a.wav", b"audio".to_vec(), Some("audio/wav"))
            .await
            .unwrap();
        assert_eq!(store.get("temp", "a.wav").await.unwrap(), b"audio");

        store.delete("temp", "a.wav").await.unwrap();
        assert!(matches!(
            store.get("temp", "a.wav").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn presign_records_ttl_and_rejects_missing_objects() {
        let store = MemoryObjectStore::new();
        assert!(store
            .presign("out", "missing.mp3", Duration::from_secs(300))
            .await
            .is_err());

        store.insert("out", "a.mp3", vec![1]);
        store
            .presign("out", "a.mp3", Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(
            store.presign_calls(),
            vec![("out".to_string(), "a.mp3".to_string(), Duration::from_secs(300))]
        );
    }
}
