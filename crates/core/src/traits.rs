//! ObjectStore trait definition
//!
//! This trait defines the interface for S3-compatible storage operations.
//! Callers depend only on it; the S3 adapter and the mocks implement it.

use async_trait::async_trait;

use crate::error::Result;

/// Content type used for every uploaded object
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// Options for key listing, passed through to the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Prefix to filter by
    pub prefix: Option<String>,

    /// Delimiter for grouping (usually "/"). `None` lists every key under
    /// the prefix.
    pub delimiter: Option<String>,

    /// Start listing after this key
    pub start_after: Option<String>,

    /// Maximum number of keys to return per request
    pub page_size: Option<i32>,
}

impl ListOptions {
    /// List every key starting with `prefix`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }

    /// Group keys by `delimiter` below the prefix
    pub fn delimited(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Skip every key up to and including `key`
    pub fn starting_after(mut self, key: impl Into<String>) -> Self {
        self.start_after = Some(key.into());
        self
    }
}

/// Trait for S3-compatible storage operations
///
/// Cancellation is dropping the returned future. A caller-side deadline is
/// `tokio::time::timeout` around the call.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `bucket/key`, replacing any existing object
    async fn upload(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()>;

    /// Read the full content of `bucket/key`
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Remove `bucket/key`
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    /// Collect every key matching `options`, in the order the store yields them
    async fn list_keys(&self, bucket: &str, options: ListOptions) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_default_is_flat() {
        let options = ListOptions::default();
        assert!(options.prefix.is_none());
        assert!(options.delimiter.is_none());
    }

    #[test]
    fn test_list_options_builders() {
        let options = ListOptions::with_prefix("logs/")
            .delimited("/")
            .starting_after("logs/2024");
        assert_eq!(options.prefix.as_deref(), Some("logs/"));
        assert_eq!(options.delimiter.as_deref(), Some("/"));
        assert_eq!(options.start_after.as_deref(), Some("logs/2024"));
        assert_eq!(options.page_size, None);
    }
}
