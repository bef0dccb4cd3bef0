//! get command - Download an object
//!
//! Writes the object content to a local file, or to stdout when no target
//! (or "-") is given.

use std::io::Write;

use clap::Args;
use objstore_core::{ObjectStore, RemotePath, parse_object_path};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download an object to a file or stdout
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object path (profile/bucket/key)
    pub source: String,

    /// Local file to write; stdout when omitted or "-"
    pub target: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: usize,
}

/// Where downloaded bytes go
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Destination {
    Stdout,
    File(String),
}

impl Destination {
    fn from_arg(target: Option<&str>) -> Self {
        match target {
            None | Some("-") => Self::Stdout,
            Some(path) => Self::File(path.to_string()),
        }
    }
}

/// Execute the get command
pub async fn execute(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let destination = Destination::from_arg(args.target.as_deref());
    let mut formatter = Formatter::new(output_config);
    if destination == Destination::Stdout {
        formatter = formatter.reserve_stdout();
    }

    let source = match parse_object_path(&args.source) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let client = match super::connect_or_report(&source.profile, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    download(&client, &source, &destination, &formatter).await
}

/// Download `source` into `destination` and report the result
pub(crate) async fn download(
    store: &dyn ObjectStore,
    source: &RemotePath,
    destination: &Destination,
    formatter: &Formatter,
) -> ExitCode {
    let data = match store.download(&source.bucket, &source.key).await {
        Ok(d) => d,
        Err(e) if e.is_not_found() => {
            formatter.error(&format!("Object not found: {source}"));
            return ExitCode::NotFound;
        }
        Err(e) => {
            formatter.error(&format!("Failed to download {source}: {e}"));
            return ExitCode::from(&e);
        }
    };

    let size = data.len();
    let written = match destination {
        Destination::Stdout => write_stdout(&data),
        Destination::File(path) => tokio::fs::write(path, &data).await,
    };

    let target = match destination {
        Destination::Stdout => "-".to_string(),
        Destination::File(path) => path.clone(),
    };

    if let Err(e) = written {
        formatter.error(&format!("Failed to write {target}: {e}"));
        return ExitCode::GeneralError;
    }

    if formatter.is_json() {
        formatter.json(&GetOutput {
            status: "success",
            source: source.to_string(),
            target,
            size_bytes: size,
        });
    } else if let Destination::File(path) = destination {
        formatter.success(&format!("Downloaded {source} -> {path} ({size} bytes)"));
    }

    ExitCode::Success
}

fn write_stdout(data: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(data)?;
    stdout.flush()
}
