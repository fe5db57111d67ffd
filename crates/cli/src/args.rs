use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

use buildfetch_core::{BuildType, Config, DownloadRequest, DownloadType};

#[derive(Debug, Parser)]
#[command(
    name = "buildfetch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Download the artifacts of a build",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file; missing files fall back to defaults and environment.
    #[arg(
        long,
        global = true,
        env = "BUILDFETCH_CONFIG",
        default_value = "buildfetch.toml"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(alias = "dl", name = "download", about = "Download build artifacts")]
    Download(DownloadArgs),
    #[command(
        alias = "cfg",
        name = "config",
        about = "Print the effective configuration with secrets redacted"
    )]
    Config(ServiceArgs),
}

/// Build service overrides shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ServiceArgs {
    /// Collection URL of the build service.
    #[arg(long, env = "SYSTEM_TEAMFOUNDATIONCOLLECTIONURI")]
    pub collection_url: Option<String>,

    /// Personal access token.
    #[arg(long, env = "SYSTEM_ACCESSTOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl ServiceArgs {
    /// Overrides the service section of `config` with any flag that was given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.collection_url {
            config.service.collection_url = url.clone();
        }
        if let Some(token) = &self.access_token {
            config.service.access_token = Some(token.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildTypeArg {
    Current,
    Specific,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DownloadTypeArg {
    Single,
    Specific,
}

#[derive(Debug, Clone, Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Download from the current build or a specific one.
    #[arg(long, value_enum, default_value_t = BuildTypeArg::Current)]
    pub build_type: BuildTypeArg,

    /// Project the build belongs to.
    #[arg(long, env = "SYSTEM_TEAMPROJECTID")]
    pub project: String,

    /// Definition the build must belong to (specific builds only).
    #[arg(long)]
    pub definition: Option<u32>,

    #[arg(long, env = "BUILD_BUILDID")]
    pub build_id: u32,

    /// Directory the artifacts are written to.
    #[arg(long = "path")]
    pub download_path: PathBuf,

    /// Download one named artifact or every artifact of the build.
    #[arg(long, value_enum, default_value_t = DownloadTypeArg::Single)]
    pub download_type: DownloadTypeArg,

    /// Artifact to download in single mode.
    #[arg(long)]
    pub artifact_name: Option<String>,

    /// Newline-separated item patterns for multi-artifact downloads.
    #[arg(long)]
    pub item_pattern: Option<String>,

    /// Simultaneous file transfers per artifact; 0 uses the engine default.
    #[arg(long, env = "RELEASE_ARTIFACT_DOWNLOAD_PARALLELLIMIT")]
    pub parallel_limit: Option<usize>,

    /// Log every transferred file. Any value other than a falsey one enables it.
    #[arg(
        short,
        long,
        env = "SYSTEM_DEBUG",
        value_parser = FalseyValueParser::new()
    )]
    pub verbose: bool,
}

impl DownloadArgs {
    pub fn to_request(&self) -> DownloadRequest {
        DownloadRequest {
            build_type: match self.build_type {
                BuildTypeArg::Current => BuildType::Current,
                BuildTypeArg::Specific => BuildType::Specific,
            },
            project_id: self.project.clone(),
            definition_id: self.definition,
            build_id: self.build_id,
            download_path: self.download_path.clone(),
            download_type: match self.download_type {
                DownloadTypeArg::Single => DownloadType::Single,
                DownloadTypeArg::Specific => DownloadType::Specific,
            },
            artifact_name: self.artifact_name.clone(),
            item_pattern: self.item_pattern.clone(),
            parallel_limit: self.parallel_limit.and_then(NonZeroUsize::new),
            verbose: self.verbose,
        }
    }
}
