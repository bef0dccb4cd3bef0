//! Remote path parsing
//!
//! Remote paths have the format `profile/bucket[/key]`.

use crate::error::{Error, Result};
use crate::profile::is_valid_profile_name;

/// A parsed remote path pointing to an object or prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Profile name
    pub profile: String,
    /// Bucket name
    pub bucket: String,
    /// Object key or prefix (empty for bucket root)
    pub key: String,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(
        profile: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            profile: profile.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Whether the path names a prefix rather than a single object
    pub fn is_dir(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// The same location with a different key
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            profile: self.profile.clone(),
            bucket: self.bucket.clone(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}/{}", self.profile, self.bucket)
        } else {
            write!(f, "{}/{}/{}", self.profile, self.bucket, self.key)
        }
    }
}

/// Parse a `profile/bucket[/key]` string
///
/// The key is kept verbatim, including any leading or trailing slashes
/// after the bucket separator.
pub fn parse_remote_path(path: &str) -> Result<RemotePath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let mut parts = path.splitn(3, '/');
    let profile = parts.next().unwrap_or_default();
    let bucket = parts.next().unwrap_or_default();
    let key = parts.next().unwrap_or_default();

    if !is_valid_profile_name(profile) {
        return Err(Error::InvalidPath(format!(
            "Invalid profile name in '{path}'. Use format: profile/bucket[/key]"
        )));
    }

    if bucket.is_empty() {
        return Err(Error::InvalidPath(format!(
            "Path '{path}' has no bucket. Use format: profile/bucket[/key]"
        )));
    }

    Ok(RemotePath::new(profile, bucket, key))
}

/// Parse a path that must name a single object
pub fn parse_object_path(path: &str) -> Result<RemotePath> {
    let remote = parse_remote_path(path)?;
    if remote.is_dir() {
        return Err(Error::InvalidPath(format!(
            "Path '{path}' does not name an object. Use format: profile/bucket/key"
        )));
    }
    Ok(remote)
}
