use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Deserializer};

pub const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

/// Clone traffic for a repository over the last fourteen days.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiCloneTraffic {
    pub count: u64,
    pub uniques: u64,
    #[serde(default, deserialize_with = "lenient_days")]
    pub clones: Vec<ApiCloneDay>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiCloneDay {
    pub timestamp: String,
    pub count: u64,
    pub uniques: u64,
}

// The per-day breakdown is informational; entries that do not decode are dropped.
fn lenient_days<'de, D>(deserializer: D) -> std::result::Result<Vec<ApiCloneDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let days = match value {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<ApiCloneDay>(entry).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(days)
}

#[derive(Debug, Clone)]
pub enum CloneTrafficResult {
    Success {
        traffic: ApiCloneTraffic,
        payload: serde_json::Value,
    },
    Failed {
        status: StatusCode,
        body: String,
    },
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl GitHubClient {
    pub fn new(token: &str, api_base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("clone-badge"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            token: token.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn clone_traffic_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/traffic/clones", self.api_base, owner, repo)
    }

    pub async fn get_clone_traffic(&self, owner: &str, repo: &str) -> Result<CloneTrafficResult> {
        let url = self.clone_traffic_url(owner, repo);
        log::info!("Requesting clone traffic from {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        log::debug!("Received {} ({} bytes)", status, body.len());

        if status != StatusCode::OK {
            return Ok(CloneTrafficResult::Failed { status, body });
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .with_context(|| format!("Failed to decode clone traffic JSON from {}", url))?;
        let traffic = serde_json::from_value::<ApiCloneTraffic>(payload.clone())
            .context("Clone traffic response has missing or non-integer `count`/`uniques`")?;
        Ok(CloneTrafficResult::Success { traffic, payload })
    }
}
