//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from objstore-core.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::operation::list_objects_v2::builders::ListObjectsV2FluentBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::timeout::TimeoutConfig;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use objstore_core::{
    CONTENT_TYPE, Error, ListOptions, MissingObject, ObjectStore, Result, StorageConfig,
};

use crate::error::{classify, is_missing_key};

/// S3 client wrapper
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    missing_object: MissingObject,
}

impl S3Client {
    /// Create a new S3 client from a storage configuration
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        let timeouts = config.timeout_config();

        let credentials = aws_credential_types::Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None, // session token
            None, // expiry
            "objstore-static-credentials",
        );

        let timeout_config = TimeoutConfig::builder()
            .connect_timeout(Duration::from_millis(timeouts.connect_ms))
            .operation_timeout(Duration::from_millis(timeouts.operation_ms))
            .build();

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&endpoint)
            .timeout_config(timeout_config)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.bucket_lookup.path_style())
            .build();

        tracing::debug!(
            endpoint = %endpoint,
            region = %config.region,
            path_style = config.bucket_lookup.path_style(),
            "created S3 client"
        );

        Ok(Self::from_client(
            aws_sdk_s3::Client::from_conf(s3_config),
            config.missing_object,
        ))
    }

    /// Wrap an already configured SDK client
    pub fn from_client(inner: aws_sdk_s3::Client, missing_object: MissingObject) -> Self {
        Self {
            inner,
            missing_object,
        }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    /// Lazily enumerate keys matching `options`
    ///
    /// Pages are requested as the stream is polled. Within a page, object
    /// keys come before common prefixes.
    pub fn key_stream(
        &self,
        bucket: &str,
        options: &ListOptions,
    ) -> BoxStream<'static, Result<String>> {
        let target = bucket.to_string();
        let pages = self.list_request(bucket, options).into_paginator().send();

        stream::unfold(pages, |mut pages| async move {
            pages.next().await.map(|page| (page, pages))
        })
        .map(move |page| page.map(page_keys).map_err(|e| classify(e, &target)))
        .map_ok(|keys| stream::iter(keys.into_iter().map(Ok::<String, Error>)))
        .try_flatten()
        .boxed()
    }

    fn list_request(&self, bucket: &str, options: &ListOptions) -> ListObjectsV2FluentBuilder {
        self.inner
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(options.prefix.clone())
            .set_delimiter(options.delimiter.clone())
            .set_start_after(options.start_after.clone())
            .set_max_keys(options.page_size)
    }

    async fn ensure_exists(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, &format!("{bucket}/{key}")))?;
        Ok(())
    }
}

/// Keys of one listing page: objects first, then common prefixes
fn page_keys(page: ListObjectsV2Output) -> Vec<String> {
    let objects = page.contents().iter().filter_map(|o| o.key());
    let prefixes = page.common_prefixes().iter().filter_map(|p| p.prefix());
    objects.chain(prefixes).map(str::to_string).collect()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn upload(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        tracing::debug!(bucket, key, size = data.len(), "uploading object");

        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(CONTENT_TYPE)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| classify(e, &format!("{bucket}/{key}")))?;

        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        tracing::debug!(bucket, key, "downloading object");

        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, &format!("{bucket}/{key}")))?;

        // Body read failures are local IO errors, not store errors
        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
            .into_bytes()
            .to_vec();

        tracing::debug!(bucket, key, size = data.len(), "downloaded object");
        Ok(data)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        tracing::debug!(bucket, key, "deleting object");

        // S3 reports success for missing keys, so strict mode has to look first
        if self.missing_object == MissingObject::Error {
            self.ensure_exists(bucket, key).await?;
        }

        let result = self
            .inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if self.missing_object == MissingObject::Ignore && is_missing_key(&e) => {
                tracing::debug!(bucket, key, "object already absent");
                Ok(())
            }
            Err(e) => Err(classify(e, &format!("{bucket}/{key}"))),
        }
    }

    async fn list_keys(&self, bucket: &str, options: ListOptions) -> Result<Vec<String>> {
        tracing::debug!(bucket, prefix = ?options.prefix, "listing keys");

        let keys: Vec<String> = self.key_stream(bucket, &options).try_collect().await?;

        tracing::debug!(bucket, count = keys.len(), "listed keys");
        Ok(keys)
    }
}
