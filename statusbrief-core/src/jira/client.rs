//! HTTP client for the tracker search endpoint.
//!
//! One paginated query per run: issues in the project/component set updated
//! inside the trailing window, newest first, with the changelog expanded. A
//! single failed attempt aborts the run; there is no retry.

use std::time::Duration;

use chrono::Local;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::JiraConfig;
use crate::error::{Error, Result};

use super::{Issue, SearchResponse};

/// Fields requested per issue; a subset of these feeds the classifier
const SEARCH_FIELDS: &str =
    "key,summary,status,assignee,reporter,issuetype,created,updated,priority,description";

/// Blocking client for the tracker search API
pub struct JiraClient {
    config: JiraConfig,
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
}

impl JiraClient {
    /// Create a new tracker client from configuration.
    ///
    /// Returns an error if the bearer token cannot form a valid header.
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let base_url = config.server_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = format!("Bearer {}", config.bearer_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| Error::Config(format!("invalid bearer token: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Connectivity(format!("failed to build tokio runtime: {e}")))?;

        Ok(Self {
            config: config.clone(),
            http,
            runtime,
            base_url,
        })
    }

    /// Fetch issues updated within the trailing window, newest first.
    ///
    /// Non-2xx responses become [`Error::Fetch`] carrying status and body;
    /// transport failures become [`Error::Connectivity`].
    pub fn search_recent(
        &self,
        project: &str,
        components: &[String],
        window_days: i64,
    ) -> Result<Vec<Issue>> {
        let since = (Local::now() - chrono::Duration::days(window_days))
            .format("%Y-%m-%d")
            .to_string();
        let jql = build_jql(project, components, &since);
        let url = format!("{}/rest/api/2/search", self.base_url);

        tracing::info!(%url, %jql, "querying tracker");

        let max_results = self.config.max_results.to_string();
        let params: [(&str, &str); 4] = [
            ("jql", jql.as_str()),
            ("maxResults", max_results.as_str()),
            ("fields", SEARCH_FIELDS),
            ("expand", "changelog"),
        ];

        self.runtime.block_on(async {
            let response = self
                .http
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|e| Error::Connectivity(format!("request failed: {e}")))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| Error::Connectivity(format!("failed to read body: {e}")))?;

            if !status.is_success() {
                return Err(Error::Fetch {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: SearchResponse = serde_json::from_str(&body)?;
            tracing::info!(count = parsed.issues.len(), "tracker query complete");
            Ok(parsed.issues)
        })
    }
}

/// Build the JQL filter for one run.
///
/// Components are individually quoted; the window start date pins `updated`.
fn build_jql(project: &str, components: &[String], since: &str) -> String {
    let components_str = components
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "project = \"{project}\" AND component in ({components_str}) \
         AND updated >= \"{since}\" ORDER BY updated DESC"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_jql_quotes_components() {
        let components = vec!["Rosa".to_string(), "rosa-team".to_string()];
        let jql = build_jql("OCM", &components, "2024-01-08");
        assert_eq!(
            jql,
            "project = \"OCM\" AND component in (\"Rosa\", \"rosa-team\") \
             AND updated >= \"2024-01-08\" ORDER BY updated DESC"
        );
    }

    #[test]
    fn test_build_jql_single_component() {
        let components = vec!["Rosa".to_string()];
        let jql = build_jql("OCM", &components, "2024-01-08");
        assert!(jql.contains("component in (\"Rosa\")"));
    }

    #[test]
    fn test_client_rejects_unprintable_token() {
        let config = JiraConfig {
            server_url: "https://issues.example.com".to_string(),
            bearer_token: "bad\ntoken".to_string(),
            max_results: 200,
            timeout_secs: 30,
        };
        assert!(JiraClient::new(&config).is_err());
    }

    #[test]
    fn test_client_with_valid_config() {
        let config = JiraConfig {
            server_url: "https://issues.example.com/".to_string(),
            bearer_token: "token".to_string(),
            max_results: 200,
            timeout_secs: 30,
        };
        let client = JiraClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://issues.example.com");
    }
}
