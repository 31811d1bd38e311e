//! GitHub integration -- count a user's commits for one day via the search API.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;

use crate::error::SourceError;
use crate::integrations::traits::CommitSource;
use crate::storage::database::DATE_FORMAT;
use crate::storage::GitHubConfig;

pub(crate) const USER_AGENT: &str = concat!("commitstreak/", env!("CARGO_PKG_VERSION"));
const SEARCH_ACCEPT: &str = "application/vnd.github.cloak-preview+json";

#[derive(Debug, Deserialize)]
struct SearchResult {
    total_count: u32,
}

pub struct GitHubCommitSource {
    client: Client,
    api_base: String,
    username: String,
    token: Option<String>,
}

impl GitHubCommitSource {
    /// Build a client from validated configuration.
    pub fn new(config: &GitHubConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(SourceError::Transport)?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            token: config.token.clone(),
        })
    }

    /// Search qualifier for commits authored by the user and committed on `date`.
    pub fn search_query(&self, date: NaiveDate) -> String {
        format!(
            "author:{} committer-date:{}",
            self.username,
            date.format(DATE_FORMAT)
        )
    }
}

impl CommitSource for GitHubCommitSource {
    fn name(&self) -> &str {
        "github"
    }

    async fn commit_count(&self, date: NaiveDate) -> Result<u32, SourceError> {
        let url = format!("{}/search/commits", self.api_base);

        let mut request = self
            .client
            .get(&url)
            .query(&[("q", self.search_query(date))])
            .header(ACCEPT, SEARCH_ACCEPT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(SourceError::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(SourceError::Transport)?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: SearchResult =
            serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))?;
        tracing::debug!(user = %self.username, %date, count = result.total_count, "github search ok");
        Ok(result.total_count)
    }
}
