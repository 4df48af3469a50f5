use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::OutputMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    None,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

/// Fetch GitHub clone traffic for a repository and print it or write a badge file.
///
/// The API token is read from GH_TOKEN, falling back to GITHUB_TOKEN.
#[derive(Debug, Parser)]
#[command(name = "clone-badge", version, about)]
pub struct Cli {
    /// Print the full payload or write a badge descriptor
    #[arg(long, value_enum)]
    pub mode: Option<OutputMode>,

    /// Repository owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long)]
    pub repo: Option<String>,

    /// Where to write the badge descriptor
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
