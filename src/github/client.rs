use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::GithubConfig;

/// Narrow capability: fetch repositories for a username.
///
/// Handlers only see this trait, so the GitHub integration can be swapped for
/// a fake in tests without any network access.
#[async_trait]
pub trait GithubClient: Send + Sync {
    /// `Ok(None)` means the upstream answered non-success (unknown user,
    /// rate limited); the caller maps that to a domain-level not-found.
    async fn repos_for_user(&self, username: &str) -> anyhow::Result<Option<serde_json::Value>>;
}

pub struct HttpGithubClient {
    http: Client,
    api_base: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl HttpGithubClient {
    pub fn new(config: &GithubConfig) -> anyhow::Result<Self> {
        // GitHub rejects requests without a User-Agent.
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("devhub/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build github http client")?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    fn repos_url(&self, username: &str) -> String {
        format!("{}/users/{}/repos", self.api_base, username)
    }

    fn repos_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("per_page", "5".to_string()),
            ("sort", "created".to_string()),
        ];
        if let Some(id) = &self.client_id {
            query.push(("client_id", id.clone()));
        }
        if let Some(secret) = &self.client_secret {
            query.push(("client_secret", secret.clone()));
        }
        query
    }
}

#[async_trait]
impl GithubClient for HttpGithubClient {
    async fn repos_for_user(&self, username: &str) -> anyhow::Result<Option<serde_json::Value>> {
        let url = self.repos_url(username);
        debug!(%url, "fetching github repos");

        let response = self
            .http
            .get(&url)
            .query(&self.repos_query())
            .send()
            .await
            .context("github request failed")?;

        let status = response.status();
        if !status.is_success() {
            warn!(%username, status = %status, "github answered non-success");
            return Ok(None);
        }

        let repos = response
            .json::<serde_json::Value>()
            .await
            .context("parse github response")?;
        Ok(Some(repos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client(id: Option<&str>, secret: Option<&str>) -> HttpGithubClient {
        HttpGithubClient::new(&GithubConfig {
            api_base: "https://api.github.com/".into(),
            client_id: id.map(String::from),
            client_secret: secret.map(String::from),
        })
        .expect("build client")
    }

    #[test]
    fn repos_url_strips_trailing_slash() {
        let client = make_client(None, None);
        assert_eq!(
            client.repos_url("octocat"),
            "https://api.github.com/users/octocat/repos"
        );
    }

    #[test]
    fn query_has_pagination_and_sort() {
        let client = make_client(None, None);
        let query = client.repos_query();
        assert_eq!(query[0], ("per_page", "5".to_string()));
        assert_eq!(query[1], ("sort", "created".to_string()));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn query_forwards_credentials_when_configured() {
        let client = make_client(Some("abc"), Some("shhh"));
        let query = client.repos_query();
        assert!(query.contains(&("client_id", "abc".to_string())));
        assert!(query.contains(&("client_secret", "shhh".to_string())));
    }
}
