use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::badge::DEFAULT_BADGE_PATH;
use crate::cli::Cli;
use crate::github::API_BASE;

const DEFAULT_OWNER: &str = "aliakatas";
const DEFAULT_REPO: &str = "cxx-utilities";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Badge,
    Print,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub mode: Option<OutputMode>,
    pub output: Option<PathBuf>,
    pub api_base: Option<String>,
}

impl Config {
    /// Loads `explicit` if given, otherwise the default location. Only the
    /// default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = config_path();
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub owner: String,
    pub repo: String,
    pub mode: OutputMode,
    pub output: PathBuf,
    pub api_base: String,
}

impl Settings {
    /// Command-line values win over the config file, which wins over defaults.
    pub fn resolve(config: Config, cli: &Cli) -> Self {
        Self {
            owner: cli
                .owner
                .clone()
                .or(config.owner)
                .unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            repo: cli
                .repo
                .clone()
                .or(config.repo)
                .unwrap_or_else(|| DEFAULT_REPO.to_string()),
            mode: cli.mode.or(config.mode).unwrap_or_default(),
            output: cli
                .output
                .clone()
                .or(config.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BADGE_PATH)),
            api_base: cli
                .api_base
                .clone()
                .or(config.api_base)
                .unwrap_or_else(|| API_BASE.to_string()),
        }
    }
}

fn config_path() -> PathBuf {
    config_dir().join("clone-badge").join("config.toml")
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&dir).to_path_buf();
    }

    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config");
    }

    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
