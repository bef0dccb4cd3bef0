//! rm command - Remove objects
//!
//! Removes one or more objects, or every object under a prefix.

use clap::Args;
use objstore_core::{ListOptions, ObjectStore, RemotePath, parse_remote_path};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove objects
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Object path(s) to remove (profile/bucket/key or profile/bucket/prefix/)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Remove every object under the given prefix
    #[arg(short, long)]
    pub recursive: bool,

    /// Ignore objects that do not exist
    #[arg(short, long)]
    pub force: bool,

    /// Only show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    deleted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<String>,
    total: usize,
}

/// Failure for one path: the exit code and the paths that were not removed
type RmFailure = (ExitCode, Vec<String>);

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let mut all_deleted = Vec::new();
    let mut all_failed = Vec::new();
    let mut exit_code = ExitCode::Success;

    for path_str in &args.paths {
        let path = match parse_remote_path(path_str) {
            Ok(p) => p,
            Err(e) => {
                formatter.error(&e.to_string());
                return ExitCode::UsageError;
            }
        };

        let client = match super::connect_or_report(&path.profile, &formatter).await {
            Ok(c) => c,
            Err(code) => return code,
        };

        match remove_path(&client, &path, &args, &formatter).await {
            Ok(deleted) => all_deleted.extend(deleted),
            Err((code, failed)) => {
                all_failed.extend(failed);
                // Credentials will not work for the remaining paths either
                if code == ExitCode::AuthError {
                    return code;
                }
                exit_code = code;
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&RmOutput {
            status: if all_failed.is_empty() {
                "success"
            } else {
                "partial"
            },
            total: all_deleted.len(),
            deleted: all_deleted,
            failed: all_failed,
        });
    } else if !args.dry_run && !all_deleted.is_empty() {
        formatter.success(&format!("Removed {} object(s).", all_deleted.len()));
    }

    exit_code
}

/// Remove one path, which is either a single object or a prefix
pub(crate) async fn remove_path(
    store: &dyn ObjectStore,
    path: &RemotePath,
    args: &RmArgs,
    formatter: &Formatter,
) -> Result<Vec<String>, RmFailure> {
    if args.recursive {
        remove_prefix(store, path, args, formatter).await
    } else if path.is_dir() {
        formatter.error(&format!(
            "{path} is a bucket or prefix. Use --recursive to remove every object under it"
        ));
        Err((ExitCode::UsageError, vec![path.to_string()]))
    } else {
        remove_single(store, path, args, formatter).await
    }
}

async fn remove_single(
    store: &dyn ObjectStore,
    path: &RemotePath,
    args: &RmArgs,
    formatter: &Formatter,
) -> Result<Vec<String>, RmFailure> {
    let full_path = path.to_string();

    if args.dry_run {
        formatter.println(&format!("Would remove: {full_path}"));
        return Ok(vec![full_path]);
    }

    match store.delete(&path.bucket, &path.key).await {
        Ok(()) => {
            if !formatter.is_json() {
                formatter.println(&format!("Removed: {full_path}"));
            }
            Ok(vec![full_path])
        }
        Err(e) if e.is_not_found() && args.force => {
            formatter.warning(&format!("Skipped missing object: {full_path}"));
            Ok(vec![])
        }
        Err(e) if e.is_not_found() => {
            formatter.error(&format!("Object not found: {full_path}"));
            Err((ExitCode::NotFound, vec![full_path]))
        }
        Err(e) => {
            formatter.error(&format!("Failed to remove {full_path}: {e}"));
            Err((ExitCode::from(&e), vec![full_path]))
        }
    }
}

async fn remove_prefix(
    store: &dyn ObjectStore,
    path: &RemotePath,
    args: &RmArgs,
    formatter: &Formatter,
) -> Result<Vec<String>, RmFailure> {
    let options = if path.key.is_empty() {
        ListOptions::default()
    } else {
        ListOptions::with_prefix(path.key.as_str())
    };

    let keys = match store.list_keys(&path.bucket, options).await {
        Ok(keys) => keys,
        Err(e) => {
            formatter.error(&format!("Failed to list {path}: {e}"));
            return Err((ExitCode::from(&e), vec![path.to_string()]));
        }
    };

    if keys.is_empty() && !args.force {
        formatter.error(&format!("No objects found under {path}"));
        return Err((ExitCode::NotFound, vec![]));
    }

    let mut deleted = Vec::new();
    let mut failed = Vec::new();
    let mut last_code = ExitCode::Success;

    for key in keys {
        match remove_single(store, &path.with_key(key), args, formatter).await {
            Ok(removed) => deleted.extend(removed),
            Err((code, paths)) => {
                failed.extend(paths);
                last_code = code;
            }
        }
    }

    if failed.is_empty() {
        Ok(deleted)
    } else {
        tracing::warn!(
            prefix = %path,
            deleted = deleted.len(),
            failed = failed.len(),
            "recursive removal incomplete"
        );
        Err((last_code, failed))
    }
}
