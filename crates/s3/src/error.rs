//! Mapping of SDK errors onto `objstore_core::Error`
//!
//! Service errors are classified by their S3 error code, falling back to
//! the HTTP status for responses without a body (HEAD requests).

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use objstore_core::Error;

/// Convert an SDK error for the object or bucket named by `target`
pub(crate) fn classify<E>(err: SdkError<E, HttpResponse>, target: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = format!("{target}: {}", DisplayErrorContext(&err));

    match &err {
        SdkError::TimeoutError(_) => return Error::Timeout(message),
        SdkError::DispatchFailure(_) => return Error::Network(message),
        _ => {}
    }

    let status = err.raw_response().map(|r| r.status().as_u16());
    classify_code(err.code(), status, target, message)
}

/// Whether the store reported that the key, and only the key, is absent
///
/// A missing bucket (`NoSuchBucket`) is not a missing key.
pub(crate) fn is_missing_key<E>(err: &SdkError<E, HttpResponse>) -> bool
where
    E: ProvideErrorMetadata,
{
    matches!(err.code(), Some("NoSuchKey" | "NotFound"))
}

/// Classify a service error from its error code and HTTP status
pub(crate) fn classify_code(
    code: Option<&str>,
    status: Option<u16>,
    target: &str,
    message: String,
) -> Error {
    match code {
        Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => Error::NotFound(target.to_string()),
        Some(
            "AccessDenied"
            | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch"
            | "ExpiredToken"
            | "InvalidToken",
        ) => Error::Auth(message),
        Some("SlowDown" | "ServiceUnavailable" | "InternalError" | "RequestTimeout") => {
            Error::Network(message)
        }
        Some(_) => Error::Store(message),
        None => match status {
            Some(404) => Error::NotFound(target.to_string()),
            Some(401 | 403) => Error::Auth(message),
            Some(500..=599) => Error::Network(message),
            _ => Error::Store(message),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::operation::delete_object::DeleteObjectError;
    use aws_smithy_runtime_api::client::result::ConnectorError;

    type DeleteError = SdkError<DeleteObjectError, HttpResponse>;

    fn classify_for(code: Option<&str>, status: Option<u16>) -> Error {
        classify_code(code, status, "bucket/key", "boom".to_string())
    }

    #[test]
    fn test_not_found_codes() {
        for code in ["NoSuchKey", "NoSuchBucket", "NotFound"] {
            let err = classify_for(Some(code), Some(404));
            assert!(matches!(&err, Error::NotFound(t) if t == "bucket/key"));
        }
    }

    #[test]
    fn test_auth_codes() {
        assert!(matches!(
            classify_for(Some("AccessDenied"), Some(403)),
            Error::Auth(_)
        ));
        assert!(matches!(
            classify_for(Some("SignatureDoesNotMatch"), Some(403)),
            Error::Auth(_)
        ));
    }

    #[test]
    fn test_throttling_is_network() {
        assert!(matches!(
            classify_for(Some("SlowDown"), Some(503)),
            Error::Network(_)
        ));
    }

    #[test]
    fn test_unknown_code_is_store_error() {
        let err = classify_for(Some("InvalidBucketName"), Some(400));
        assert!(matches!(err, Error::Store(_)));
        assert!(err.is_store_error());
    }

    #[test]
    fn test_status_fallback_without_code() {
        assert!(matches!(classify_for(None, Some(404)), Error::NotFound(_)));
        assert!(matches!(classify_for(None, Some(403)), Error::Auth(_)));
        assert!(matches!(classify_for(None, Some(502)), Error::Network(_)));
        assert!(matches!(classify_for(None, None), Error::Store(_)));
    }

    #[test]
    fn test_timeout_error_is_timeout() {
        let err = DeleteError::timeout_error("operation timed out");
        assert!(matches!(classify(err, "bucket/key"), Error::Timeout(_)));
    }

    #[test]
    fn test_dispatch_failure_is_network() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DeleteError::dispatch_failure(ConnectorError::io(source.into()));
        let classified = classify(err, "bucket/key");
        assert!(matches!(&classified, Error::Network(m) if m.starts_with("bucket/key: ")));
    }

    #[test]
    fn test_timeout_is_not_a_missing_key() {
        assert!(!is_missing_key(&DeleteError::timeout_error("slow")));
    }
}
