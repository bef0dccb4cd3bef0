//! put command - Upload data to an object
//!
//! Reads a local file (or stdin) into memory and uploads it in one request.

use std::io::Read;
use std::path::Path;

use clap::Args;
use objstore_core::{ObjectStore, RemotePath, parse_remote_path};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a local file or stdin to an object
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload, or "-" for stdin
    pub source: String,

    /// Destination (profile/bucket/key); a trailing "/" appends the file name
    pub target: String,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    target: String,
    size_bytes: usize,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match resolve_target(&args.source, &args.target) {
        Ok(t) => t,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let data = match read_source(&args.source).await {
        Ok(d) => d,
        Err(e) => {
            formatter.error(&format!("Failed to read {}: {e}", args.source));
            return ExitCode::GeneralError;
        }
    };

    let client = match super::connect_or_report(&target.profile, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    upload(&client, &target, data, &formatter).await
}

/// Upload `data` to `target` and report the result
pub(crate) async fn upload(
    store: &dyn ObjectStore,
    target: &RemotePath,
    data: Vec<u8>,
    formatter: &Formatter,
) -> ExitCode {
    let size = data.len();

    match store.upload(&target.bucket, &target.key, data).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    status: "success",
                    target: target.to_string(),
                    size_bytes: size,
                });
            } else {
                formatter.success(&format!("Uploaded {target} ({size} bytes)"));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to upload {target}: {e}"));
            ExitCode::from(&e)
        }
    }
}

/// Parse the destination, appending the source file name to a prefix
fn resolve_target(source: &str, target: &str) -> Result<RemotePath, String> {
    let path = parse_remote_path(target).map_err(|e| e.to_string())?;
    if !path.is_dir() {
        return Ok(path);
    }

    if source == "-" {
        return Err(format!(
            "Destination '{target}' must name an object when reading from stdin"
        ));
    }

    let file_name = Path::new(source)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Cannot derive an object name from '{source}'"))?;

    let key = format!("{}{file_name}", path.key);
    Ok(path.with_key(key))
}

async fn read_source(source: &str) -> std::io::Result<Vec<u8>> {
    if source == "-" {
        tokio::task::spawn_blocking(|| {
            let mut data = Vec::new();
            std::io::stdin().read_to_end(&mut data)?;
            Ok::<_, std::io::Error>(data)
        })
        .await
        .map_err(std::io::Error::other)?
    } else {
        tokio::fs::read(source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{MockStore, quiet_formatter};
    use objstore_core::{Error, MemoryStore};

    #[test]
    fn test_resolve_target_object() {
        let target = resolve_target("local.txt", "p/bucket/dir/name.txt").unwrap();
        assert_eq!(target.key, "dir/name.txt");
    }

    #[test]
    fn test_resolve_target_appends_file_name() {
        let target = resolve_target("/tmp/report.csv", "p/bucket/reports/").unwrap();
        assert_eq!(target.key, "reports/report.csv");

        let target = resolve_target("report.csv", "p/bucket").unwrap();
        assert_eq!(target.key, "report.csv");
    }

    #[test]
    fn test_resolve_target_stdin_needs_key() {
        assert!(resolve_target("-", "p/bucket/dir/").is_err());
        assert!(resolve_target("-", "p/bucket/k").is_ok());
    }

    #[tokio::test]
    async fn test_read_source_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"payload").unwrap();

        let data = read_source(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(data, b"payload");
    }

    #[tokio::test]
    async fn test_upload_stores_object() {
        let store = MemoryStore::new();
        let target = RemotePath::new("p", "bucket", "k");

        let code = upload(&store, &target, b"hello".to_vec(), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::Success);
        assert_eq!(store.download("bucket", "k").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_upload_failure_maps_exit_code() {
        let mut store = MockStore::new();
        store
            .expect_upload()
            .times(1)
            .returning(|_, _, _| Err(Error::Auth("AccessDenied".into())));

        let target = RemotePath::new("p", "bucket", "k");
        let code = upload(&store, &target, Vec::new(), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::AuthError);
    }
}
