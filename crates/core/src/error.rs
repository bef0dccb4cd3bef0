//! Error types for objstore-core
//!
//! A single error type shared by every adapter. Variants are split into
//! store errors (anything the remote service or transport reported) and
//! local errors (configuration, paths, local I/O).

use thiserror::Error;

/// Result type alias for objstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for objstore operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Local IO error, including failures while reading an object body
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Credentials rejected or access denied by the store
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Bucket or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Connect or operation timeout elapsed
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Any other error reported by the object store
    #[error("Object store error: {0}")]
    Store(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether this error originated from the remote store or its transport
    pub const fn is_store_error(&self) -> bool {
        matches!(
            self,
            Error::Auth(_)
                | Error::NotFound(_)
                | Error::Network(_)
                | Error::Timeout(_)
                | Error::Store(_)
        )
    }

    /// Whether this error means the bucket or object does not exist
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,                          // UsageError
            Error::Config(_) | Error::InvalidUrl(_) => 2,        // UsageError
            Error::Network(_) | Error::Timeout(_) => 3,          // NetworkError
            Error::Auth(_) => 4,                                 // AuthError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            _ => 1,                                              // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        let bad_url = url::Url::parse("http://[::1").unwrap_err();
        assert_eq!(Error::from(bad_url).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Timeout("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::ProfileNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Store("test".into()).exit_code(), 1);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_store_errors_are_tagged() {
        assert!(Error::Store("boom".into()).is_store_error());
        assert!(Error::NotFound("b/k".into()).is_store_error());
        assert!(Error::Timeout("put".into()).is_store_error());
        assert!(!Error::Config("bad".into()).is_store_error());

        let io = Error::from(std::io::Error::other("reset"));
        assert!(!io.is_store_error());
    }

    #[test]
    fn test_error_display() {
        let err = Error::ProfileNotFound("minio".into());
        assert_eq!(err.to_string(), "Profile not found: minio");

        let err = Error::Store("InternalError".into());
        assert_eq!(err.to_string(), "Object store error: InternalError");
    }
}
