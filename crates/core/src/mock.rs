//! Mock object stores for tests
//!
//! [`NoopStore`] accepts every call and returns empty results.
//! [`MemoryStore`] keeps objects in process memory and behaves like a real
//! store, so round-trip behaviour can be tested without a network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::profile::MissingObject;
use crate::traits::{ListOptions, ObjectStore};

/// Store that does nothing and never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl ObjectStore for NoopStore {
    async fn upload(&self, _bucket: &str, _key: &str, _data: Vec<u8>) -> Result<()> {
        Ok(())
    }

    async fn download(&self, _bucket: &str, _key: &str) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn delete(&self, _bucket: &str, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn list_keys(&self, _bucket: &str, _options: ListOptions) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// In-memory store with S3-like semantics
///
/// Buckets are created on first upload and every other operation on a
/// bucket that was never written fails with `NotFound`. Keys list in byte
/// order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
    missing_object: MissingObject,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how `delete` treats keys that do not exist
    pub fn with_missing_object(mut self, missing_object: MissingObject) -> Self {
        self.missing_object = missing_object;
        self
    }

    /// Whether `bucket/key` currently exists
    pub async fn contains(&self, bucket: &str, key: &str) -> bool {
        self.buckets
            .read()
            .await
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key))
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data);
        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let buckets = self.buckets.read().await;
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| Error::NotFound(format!("Bucket not found: {bucket}")))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{bucket}/{key}")))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        let mut buckets = self.buckets.write().await;
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| Error::NotFound(format!("Bucket not found: {bucket}")))?;

        match (objects.remove(key), self.missing_object) {
            (None, MissingObject::Error) => Err(Error::NotFound(format!("{bucket}/{key}"))),
            _ => Ok(()),
        }
    }

    async fn list_keys(&self, bucket: &str, options: ListOptions) -> Result<Vec<String>> {
        let buckets = self.buckets.read().await;
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| Error::NotFound(format!("Bucket not found: {bucket}")))?;

        let prefix = options.prefix.as_deref().unwrap_or_default();
        let delimiter = options.delimiter.as_deref().filter(|d| !d.is_empty());
        let start_after = options.start_after.as_deref();

        let mut keys = Vec::new();
        let mut common_prefixes: Vec<String> = Vec::new();

        for key in objects.keys() {
            if !key.starts_with(prefix) || start_after.is_some_and(|after| key.as_str() <= after) {
                continue;
            }

            if let Some(delimiter) = delimiter {
                if let Some(pos) = key[prefix.len()..].find(delimiter) {
                    let common = &key[..prefix.len() + pos + delimiter.len()];
                    // Keys sharing a common prefix are adjacent in byte order
                    if common_prefixes.last().map(String::as_str) != Some(common) {
                        common_prefixes.push(common.to_string());
                    }
                    continue;
                }
            }

            keys.push(key.clone());
        }

        keys.extend(common_prefixes);
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(keys: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for key in keys {
            store
                .upload("bucket", key, key.as_bytes().to_vec())
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_noop_store_returns_empty_results() {
        let store = NoopStore;

        store.upload("b", "k", b"data".to_vec()).await.unwrap();
        assert!(store.download("b", "k").await.unwrap().is_empty());
        store.delete("b", "missing").await.unwrap();
        assert!(
            store
                .list_keys("b", ListOptions::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        let payload = vec![0u8, 1, 2, 255, 254];

        store.upload("bucket", "bin", payload.clone()).await.unwrap();
        assert_eq!(store.download("bucket", "bin").await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_upload_overwrites() {
        let store = MemoryStore::new();

        store.upload("bucket", "k", b"first".to_vec()).await.unwrap();
        store.upload("bucket", "k", b"second".to_vec()).await.unwrap();

        assert_eq!(store.download("bucket", "k").await.unwrap(), b"second");
        let keys = store
            .list_keys("bucket", ListOptions::default())
            .await
            .unwrap();
        assert_eq!(keys, vec!["k"]);
    }

    #[tokio::test]
    async fn test_download_after_delete_is_not_found() {
        let store = seeded(&["k"]).await;

        store.delete("bucket", "k").await.unwrap();

        let err = store.download("bucket", "k").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.contains("bucket", "k").await);
    }

    #[tokio::test]
    async fn test_download_missing_bucket() {
        let store = MemoryStore::new();
        let err = store.download("nope", "k").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_follows_policy() {
        let lenient = seeded(&["k"]).await;
        lenient.delete("bucket", "ghost").await.unwrap();

        let strict = MemoryStore::new().with_missing_object(MissingObject::Error);
        strict.upload("bucket", "k", Vec::new()).await.unwrap();
        let err = strict.delete("bucket", "ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(strict.contains("bucket", "k").await);
    }

    #[tokio::test]
    async fn test_delete_from_missing_bucket_fails_under_either_policy() {
        for policy in [MissingObject::Ignore, MissingObject::Error] {
            let store = MemoryStore::new().with_missing_object(policy);
            let err = store.delete("no-such-bucket", "k").await.unwrap_err();
            assert!(err.is_not_found(), "{policy:?}: {err}");
        }
    }

    #[tokio::test]
    async fn test_list_with_prefix() {
        let store = seeded(&["a", "a/b", "c"]).await;

        let keys = store
            .list_keys("bucket", ListOptions::with_prefix("a"))
            .await
            .unwrap();
        assert_eq!(keys, vec!["a", "a/b"]);
    }

    #[tokio::test]
    async fn test_list_with_delimiter_groups_prefixes() {
        let store = seeded(&["logs/2024/jan", "logs/2024/feb", "logs/readme", "top"]).await;

        let keys = store
            .list_keys("bucket", ListOptions::with_prefix("logs/").delimited("/"))
            .await
            .unwrap();
        assert_eq!(keys, vec!["logs/readme", "logs/2024/"]);

        let root = store
            .list_keys("bucket", ListOptions::default().delimited("/"))
            .await
            .unwrap();
        assert_eq!(root, vec!["top", "logs/"]);
    }

    #[tokio::test]
    async fn test_list_start_after() {
        let store = seeded(&["a", "b", "c"]).await;

        let keys = store
            .list_keys("bucket", ListOptions::default().starting_after("a"))
            .await
            .unwrap();
        assert_eq!(keys, vec!["b", "c"]);
    }
}
