mod auth;
mod badge;
mod cli;
mod config;
mod fetch;
mod github;

use std::env;
use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::auth::{Credential, CredentialSources, SystemEnv, resolve_credential};
use crate::cli::{Cli, LogLevel, parse_args};
use crate::config::{Config, Settings};
use crate::fetch::{FetchOutcome, fetch_and_emit};
use crate::github::GitHubClient;

fn main() -> Result<ExitCode> {
    let cli = match parse_args(env::args_os()) {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };
    init_logging(cli.log_level);

    let (credential, settings) = prepare(&SystemEnv::new(), &cli)?;
    log::info!("Using token from {}", credential.source);

    let client = GitHubClient::new(&credential.value, &settings.api_base)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let mut stdout = io::stdout().lock();
    let outcome = runtime.block_on(fetch_and_emit(&client, &settings, &mut stdout))?;

    if let FetchOutcome::BadgeWritten(path) = &outcome {
        log::info!("Badge for {}/{} at {}", settings.owner, settings.repo, path.display());
    }
    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Validates the credential before anything else, so a missing token is the
/// error an operator sees even when the config file is also broken.
fn prepare<S: CredentialSources>(sources: &S, cli: &Cli) -> Result<(Credential, Settings)> {
    let credential = resolve_credential(sources)?;
    let config = Config::load(cli.config.as_deref())?;
    Ok((credential, Settings::resolve(config, cli)))
}

fn init_logging(level: LogLevel) {
    let Some(filter) = log_filter(level) else {
        return;
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", filter);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

fn log_filter(level: LogLevel) -> Option<&'static str> {
    match level {
        LogLevel::None => None,
        LogLevel::Error => Some("error"),
        LogLevel::Warn => Some("warn"),
        LogLevel::Info => Some("info"),
        LogLevel::Debug => Some("debug"),
        LogLevel::Trace => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{log_filter, prepare};
    use crate::auth::CredentialSources;
    use crate::cli::{LogLevel, parse_args};

    struct NoEnv;

    impl CredentialSources for NoEnv {
        fn env_var(&self, _name: &str) -> Option<String> {
            None
        }
    }

    struct TokenEnv;

    impl CredentialSources for TokenEnv {
        fn env_var(&self, name: &str) -> Option<String> {
            (name == "GH_TOKEN").then(|| "abc123".to_string())
        }
    }

    #[test]
    fn prepare_reports_missing_token_before_broken_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "mode = [").expect("write config");
        let cli = parse_args(["clone-badge", "--config", path.to_str().expect("utf8 path")])
            .expect("parse succeeds");

        let error = prepare(&NoEnv, &cli).expect_err("missing token");
        assert!(error.to_string().contains("GH_TOKEN"));
    }

    #[test]
    fn prepare_loads_config_once_token_is_present() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "repo = \"widgets\"\n").expect("write config");
        let cli = parse_args(["clone-badge", "--config", path.to_str().expect("utf8 path")])
            .expect("parse succeeds");

        let (credential, settings) = prepare(&TokenEnv, &cli).expect("prepare succeeds");
        assert_eq!(credential.value, "abc123");
        assert_eq!(settings.repo, "widgets");
    }

    #[test]
    fn log_filter_disables_logging_for_none() {
        assert_eq!(log_filter(LogLevel::None), None);
    }

    #[test]
    fn log_filter_maps_levels_to_env_filters() {
        assert_eq!(log_filter(LogLevel::Warn), Some("warn"));
        assert_eq!(log_filter(LogLevel::Trace), Some("trace"));
    }
}
