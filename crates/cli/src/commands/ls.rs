//! ls command - List object keys
//!
//! Lists keys under a bucket or prefix. Without --recursive, keys are
//! grouped at the next "/" and the groups shown as prefixes.

use clap::Args;
use objstore_core::{ListOptions, ObjectStore, RemotePath, parse_remote_path};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List object keys
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to list (profile/bucket[/prefix])
    pub path: String,

    /// List every key under the prefix instead of grouping by "/"
    #[arg(short, long)]
    pub recursive: bool,

    /// Start listing after this key
    #[arg(long)]
    pub start_after: Option<String>,
}

#[derive(Debug, Serialize)]
struct LsOutput {
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    keys: Vec<String>,
    total: usize,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_remote_path(&args.path) {
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

    list(&client, &path, &args, &formatter).await
}

/// Listing options for a path and the command flags
fn list_options(path: &RemotePath, args: &LsArgs) -> ListOptions {
    ListOptions {
        prefix: (!path.key.is_empty()).then(|| path.key.clone()),
        delimiter: (!args.recursive).then(|| "/".to_string()),
        start_after: args.start_after.clone(),
        page_size: None,
    }
}

pub(crate) async fn list(
    store: &dyn ObjectStore,
    path: &RemotePath,
    args: &LsArgs,
    formatter: &Formatter,
) -> ExitCode {
    let options = list_options(path, args);
    let prefix = options.prefix.clone();

    let keys = match store.list_keys(&path.bucket, options).await {
        Ok(keys) => keys,
        Err(e) => {
            formatter.error(&format!("Failed to list {path}: {e}"));
            return ExitCode::from(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&LsOutput {
            bucket: path.bucket.clone(),
            prefix,
            total: keys.len(),
            keys,
        });
    } else {
        for key in &keys {
            formatter.println(key);
        }
    }

    ExitCode::Success
}
