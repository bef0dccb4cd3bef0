//! Storage configuration and profile management
//!
//! A profile is a named [`StorageConfig`]: the endpoint, credentials and
//! connection options needed to construct a client.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Addressing style used for bucket requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketLookup {
    /// Path-style, which works against every S3-compatible server
    #[default]
    Auto,
    /// Always `endpoint/bucket/key`
    Path,
    /// Virtual-hosted style, `bucket.endpoint/key`
    Dns,
}

impl BucketLookup {
    /// Whether requests should use path-style addressing
    pub const fn path_style(self) -> bool {
        matches!(self, BucketLookup::Auto | BucketLookup::Path)
    }
}

/// What `delete` does when the object does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingObject {
    /// Succeed, as S3 itself reports
    #[default]
    Ignore,
    /// Fail with [`Error::NotFound`]
    Error,
}

/// Timeout configuration applied to every store call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Whole-operation timeout in milliseconds, including body transfer
    #[serde(default = "default_operation_timeout")]
    pub operation_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_operation_timeout() -> u64 {
    30000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            operation_ms: default_operation_timeout(),
        }
    }
}

/// Connection settings for an S3-compatible store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Endpoint, either a full URL or a bare `host[:port]`
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Signing region
    #[serde(default = "default_region")]
    pub region: String,

    /// Use TLS when the endpoint has no scheme
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Bucket addressing style
    #[serde(default)]
    pub bucket_lookup: BucketLookup,

    /// Delete behaviour for objects that do not exist
    #[serde(default)]
    pub missing_object: MissingObject,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

impl StorageConfig {
    /// Create a config with required fields; everything else takes its default
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: default_region(),
            secure: true,
            bucket_lookup: BucketLookup::default(),
            missing_object: MissingObject::default(),
            timeout: None,
        }
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }

    /// Resolve the endpoint into an absolute URL
    ///
    /// A bare `host[:port]` gets `https://` or `http://` depending on `secure`.
    /// The returned string never has a trailing slash.
    pub fn endpoint_url(&self) -> Result<String> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Config("Endpoint cannot be empty".into()));
        }

        let url = if endpoint.contains("://") {
            Url::parse(endpoint)?
        } else {
            let scheme = if self.secure { "https" } else { "http" };
            Url::parse(&format!("{scheme}://{endpoint}"))?
        };

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported endpoint scheme '{}', expected http or https",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::Config(format!("Endpoint has no host: {endpoint}")));
        }

        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

/// A named storage configuration persisted in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    #[serde(flatten)]
    pub storage: StorageConfig,
}

impl Profile {
    pub fn new(name: impl Into<String>, storage: StorageConfig) -> Self {
        Self {
            name: name.into(),
            storage,
        }
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add or replace a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        if !is_valid_profile_name(&profile.name) {
            return Err(Error::Config(format!(
                "Invalid profile name '{}': use letters, digits, '-' or '_'",
                profile.name
            )));
        }
        profile.storage.endpoint_url()?;

        let mut config = self.config_manager.load()?;
        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}

/// Check if a string is a valid profile name
pub(crate) fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_profile_manager() -> (ProfileManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        let profile_manager = ProfileManager::with_config_manager(config_manager);
        (profile_manager, temp_dir)
    }

    fn profile(name: &str, endpoint: &str) -> Profile {
        Profile::new(name, StorageConfig::new(endpoint, "access", "secret"))
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new("localhost:9000", "access", "secret");
        assert_eq!(config.region, "us-east-1");
        assert!(config.secure);
        assert_eq!(config.bucket_lookup, BucketLookup::Auto);
        assert_eq!(config.missing_object, MissingObject::Ignore);
        assert_eq!(config.timeout_config(), TimeoutConfig::default());
    }

    #[test]
    fn test_endpoint_url_adds_scheme() {
        let mut config = StorageConfig::new("s3.example.com", "a", "b");
        assert_eq!(config.endpoint_url().unwrap(), "https://s3.example.com");

        config.endpoint = "localhost:9000".into();
        config.secure = false;
        assert_eq!(config.endpoint_url().unwrap(), "http://localhost:9000");
    }

    #[test]
    fn test_endpoint_url_keeps_explicit_scheme() {
        let config = StorageConfig::new("http://127.0.0.1:9000/", "a", "b");
        assert_eq!(config.endpoint_url().unwrap(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_endpoint_url_rejects_bad_input() {
        assert!(StorageConfig::new("", "a", "b").endpoint_url().is_err());
        assert!(
            StorageConfig::new("ftp://files.example.com", "a", "b")
                .endpoint_url()
                .is_err()
        );
    }

    #[test]
    fn test_bucket_lookup_path_style() {
        assert!(BucketLookup::Auto.path_style());
        assert!(BucketLookup::Path.path_style());
        assert!(!BucketLookup::Dns.path_style());
    }

    #[test]
    fn test_profile_toml_defaults() {
        let profile: Profile = toml::from_str(
            r#"
            name = "local"
            endpoint = "localhost:9000"
            access_key = "a"
            secret_key = "b"
            missing_object = "error"
            "#,
        )
        .unwrap();

        assert_eq!(profile.name, "local");
        assert_eq!(profile.storage.region, "us-east-1");
        assert!(profile.storage.secure);
        assert_eq!(profile.storage.missing_object, MissingObject::Error);
        assert!(profile.storage.timeout.is_none());
    }

    #[test]
    fn test_profile_manager_set_and_get() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(profile("minio", "http://localhost:9000")).unwrap();

        let retrieved = manager.get("minio").unwrap();
        assert_eq!(retrieved.name, "minio");
        assert_eq!(retrieved.storage.endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_profile_manager_rejects_invalid() {
        let (manager, _temp_dir) = temp_profile_manager();

        assert!(manager.set(profile("bad name", "localhost:9000")).is_err());
        assert!(manager.set(profile("ok", "ftp://nope")).is_err());
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn test_profile_manager_remove() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(profile("test", "localhost:9000")).unwrap();
        assert!(manager.exists("test").unwrap());

        manager.remove("test").unwrap();
        assert!(!manager.exists("test").unwrap());

        let result = manager.remove("test");
        assert!(matches!(result.unwrap_err(), Error::ProfileNotFound(_)));
    }

    #[test]
    fn test_profile_manager_get_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.get("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::ProfileNotFound(_)));
    }

    #[test]
    fn test_profile_update_existing() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(profile("test", "http://old:9000")).unwrap();
        manager.set(profile("test", "http://new:9000")).unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].storage.endpoint, "http://new:9000");
    }
}
