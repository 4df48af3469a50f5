use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

use crate::badge::{BadgeDescriptor, write_badge};
use crate::config::{OutputMode, Settings};
use crate::github::{CloneTrafficResult, GitHubClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Printed,
    BadgeWritten(PathBuf),
    HttpFailed { status: StatusCode },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::HttpFailed { .. })
    }
}

#[async_trait]
pub trait TrafficApi {
    async fn get_clone_traffic(&self, owner: &str, repo: &str) -> Result<CloneTrafficResult>;
}

#[async_trait]
impl TrafficApi for GitHubClient {
    async fn get_clone_traffic(&self, owner: &str, repo: &str) -> Result<CloneTrafficResult> {
        self.get_clone_traffic(owner, repo).await
    }
}

/// Makes the single traffic request and emits the result according to
/// `settings.mode`. A non-200 response is reported on `out` and returned as
/// [`FetchOutcome::HttpFailed`]; only transport, decode and write failures
/// are errors.
pub async fn fetch_and_emit(
    api: &dyn TrafficApi,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<FetchOutcome> {
    let result = api
        .get_clone_traffic(&settings.owner, &settings.repo)
        .await?;

    let (traffic, payload) = match result {
        CloneTrafficResult::Success { traffic, payload } => (traffic, payload),
        CloneTrafficResult::Failed { status, body } => {
            log::error!(
                "Clone traffic request for {}/{} failed with {}",
                settings.owner,
                settings.repo,
                status
            );
            writeln!(out, "Error: {} - {}", status.as_u16(), body)
                .context("Failed to write diagnostic")?;
            return Ok(FetchOutcome::HttpFailed { status });
        }
    };
    log::debug!(
        "{} clones from {} unique cloners across {} days",
        traffic.count,
        traffic.uniques,
        traffic.clones.len()
    );
    for day in &traffic.clones {
        log::trace!("{}: {} clones, {} unique", day.timestamp, day.count, day.uniques);
    }

    match settings.mode {
        OutputMode::Print => {
            let rendered = serde_json::to_string_pretty(&payload)
                .context("Failed to render clone traffic payload")?;
            writeln!(out, "{}", rendered).context("Failed to write payload")?;
            Ok(FetchOutcome::Printed)
        }
        OutputMode::Badge => {
            let badge = BadgeDescriptor::from_traffic(&traffic);
            write_badge(&settings.output, &badge)?;
            Ok(FetchOutcome::BadgeWritten(settings.output.clone()))
        }
    }
}
