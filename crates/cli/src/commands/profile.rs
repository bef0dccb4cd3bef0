//! Profile management commands
//!
//! Profiles are named storage configurations: endpoint, credentials and
//! connection options.

use clap::Subcommand;
use objstore_core::{
    BucketLookup, MissingObject, Profile, ProfileManager, StorageConfig, TimeoutConfig,
};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or replace a profile
    Set(SetArgs),

    /// List all configured profiles
    List,

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "local", "prod")
    pub name: String,

    /// Endpoint, a URL or bare host[:port] (e.g., "localhost:9000")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Signing region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Use plain HTTP for endpoints given without a scheme
    #[arg(long, default_value = "false")]
    pub insecure: bool,

    /// Bucket lookup style
    #[arg(long, default_value = "auto", value_parser = ["auto", "path", "dns"])]
    pub bucket_lookup: String,

    /// What rm does with objects that do not exist: ignore or error
    #[arg(long, default_value = "ignore", value_parser = ["ignore", "error"])]
    pub missing_object: String,

    /// Connection timeout in milliseconds
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Whole-operation timeout in milliseconds
    #[arg(long)]
    pub operation_timeout_ms: Option<u64>,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// Profile information for output (without secrets)
#[derive(Debug, Serialize)]
struct ProfileInfo {
    name: String,
    endpoint: String,
    region: String,
    bucket_lookup: BucketLookup,
    missing_object: MissingObject,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            endpoint: profile.storage.endpoint.clone(),
            region: profile.storage.region.clone(),
            bucket_lookup: profile.storage.bucket_lookup,
            missing_object: profile.storage.missing_object,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

#[derive(Debug, Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub async fn execute(cmd: ProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match ProfileManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to load profiles: {e}"));
            return ExitCode::from(&e);
        }
    };

    run(cmd, &manager, &formatter)
}

pub(crate) fn run(cmd: ProfileCommands, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match cmd {
        ProfileCommands::Set(args) => execute_set(args, manager, formatter),
        ProfileCommands::List => execute_list(manager, formatter),
        ProfileCommands::Remove(args) => execute_remove(args, manager, formatter),
    }
}

/// Build the stored profile from command arguments
fn profile_from_args(args: SetArgs) -> Profile {
    let mut storage = StorageConfig::new(args.endpoint, args.access_key, args.secret_key);
    storage.region = args.region;
    storage.secure = !args.insecure;
    storage.bucket_lookup = match args.bucket_lookup.as_str() {
        "path" => BucketLookup::Path,
        "dns" => BucketLookup::Dns,
        _ => BucketLookup::Auto,
    };
    storage.missing_object = match args.missing_object.as_str() {
        "error" => MissingObject::Error,
        _ => MissingObject::Ignore,
    };

    if args.connect_timeout_ms.is_some() || args.operation_timeout_ms.is_some() {
        let defaults = TimeoutConfig::default();
        storage.timeout = Some(TimeoutConfig {
            connect_ms: args.connect_timeout_ms.unwrap_or(defaults.connect_ms),
            operation_ms: args.operation_timeout_ms.unwrap_or(defaults.operation_ms),
        });
    }

    Profile::new(args.name, storage)
}

fn execute_set(args: SetArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profile = profile_from_args(args);
    let name = profile.name.clone();

    if let Err(e) = manager.set(profile) {
        formatter.error(&format!("Failed to save profile '{name}': {e}"));
        return ExitCode::from(&e);
    }

    if formatter.is_json() {
        formatter.json(&ProfileOperationOutput {
            success: true,
            profile: name.clone(),
            message: format!("Profile '{name}' configured successfully"),
        });
    } else {
        formatter.success(&format!("Profile '{name}' configured successfully."));
    }
    ExitCode::Success
}

fn execute_list(manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profiles = match manager.list() {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&format!("Failed to list profiles: {e}"));
            return ExitCode::from(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&ProfileListOutput {
            profiles: profiles.iter().map(ProfileInfo::from).collect(),
        });
    } else if profiles.is_empty() {
        formatter.println("No profiles configured.");
    } else {
        let width = profiles.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for profile in &profiles {
            formatter.println(&format!(
                "{:<width$}  {}  ({})",
                profile.name, profile.storage.endpoint, profile.storage.region
            ));
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    if let Err(e) = manager.remove(&args.name) {
        formatter.error(&format!("Failed to remove profile '{}': {e}", args.name));
        return ExitCode::from(&e);
    }

    if formatter.is_json() {
        formatter.json(&ProfileOperationOutput {
            success: true,
            profile: args.name.clone(),
            message: format!("Profile '{}' removed", args.name),
        });
    } else {
        formatter.success(&format!("Profile '{}' removed.", args.name));
    }
    ExitCode::Success
}
