//! objstore-core: Core library for the objstore object store interface
//!
//! This crate provides:
//! - The `ObjectStore` trait and listing options
//! - Storage configuration, profiles and the config file
//! - Remote path parsing
//! - Mock stores for tests
//!
//! It does not depend on any S3 SDK; the adapter lives in `objstore-s3`.

pub mod config;
pub mod error;
pub mod mock;
pub mod path;
pub mod profile;
pub mod traits;

pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use mock::{MemoryStore, NoopStore};
pub use path::{RemotePath, parse_object_path, parse_remote_path};
pub use profile::{
    BucketLookup, MissingObject, Profile, ProfileManager, StorageConfig, TimeoutConfig,
};
pub use traits::{CONTENT_TYPE, ListOptions, ObjectStore};
