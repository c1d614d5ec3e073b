//! Narrative report composition.
//!
//! Builds the fixed-section prompt from the classified buckets and sends it
//! to the generation backend. Backend failures degrade to a placeholder body
//! instead of erroring, so the run can still continue to delivery.

use std::time::Duration;

use chrono::Local;
use serde_json::json;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::transitions::TransitionBuckets;

/// Returned instead of calling the backend when the window held no issues
pub const NO_DATA_MESSAGE: &str = "No Jira data available to generate a report.";

/// Cap on the `all` bucket slice included as prompt context
const ALL_CONTEXT_LIMIT: usize = 20;

/// Text completion interface for report generation.
pub trait GenerationClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Create the default HTTP-backed generation client.
pub fn create_generation_client(config: &GeminiConfig) -> Result<Box<dyn GenerationClient>> {
    Ok(Box::new(HttpGenerationClient::new(config)?))
}

/// Compose the narrative report for one window.
///
/// Never fails: an empty window short-circuits to [`NO_DATA_MESSAGE`] without
/// touching the backend, and a backend error degrades to a placeholder body.
pub fn compose_report(
    buckets: &TransitionBuckets,
    window_days: i64,
    project: &str,
    components: &[String],
    client: &dyn GenerationClient,
) -> String {
    if buckets.all.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let prompt = build_prompt(buckets, window_days, project, components);
    tracing::info!(
        prompt_len = prompt.len(),
        "sending classification to generation backend"
    );

    match client.complete(&prompt) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "report generation failed");
            format!("Failed to generate report: {e}")
        }
    }
}

fn build_prompt(
    buckets: &TransitionBuckets,
    window_days: i64,
    project: &str,
    components: &[String],
) -> String {
    let started = pretty(&buckets.started);
    let completed = pretty(&buckets.completed());
    let review = pretty(&buckets.in_review);
    let blocked = pretty(&buckets.blocked);
    let all_context = pretty(&buckets.all[..buckets.all.len().min(ALL_CONTEXT_LIMIT)]);

    let period_end = Local::now();
    let period_start = period_end - chrono::Duration::days(window_days);
    let components_str = components.join(", ");

    format!(
        r#"You are a technical project manager creating a weekly status report for the {project} team.

Based on the issue-tracker data provided, create a weekly status report that follows this EXACT format:

**Started**
[List items that moved to "In Progress" this week. For each item, include the issue key, title, and a brief explanation of what was started and why. Use narrative style like "We moved this to In Progress, given..." or "Team is working on..."]

**Completed**
[List items that were completed/closed this week. Include issue key, title, and brief description of what was accomplished]

**Blocked / Off-track**
[List any items that are blocked or have blocker priority. Include issue key and explanation of the blocking issue]

**Risks**
[Identify potential risks based on the data - things like multiple blocked items, critical issues not progressing, etc.]

**Celebrations**
[Highlight significant accomplishments, particularly from completed items. Mention team members by name when possible]

Here is the issue-tracker data from the past {window_days} days:

STARTED ITEMS (moved to In Progress):
{started}

COMPLETED ITEMS:
{completed}

REVIEW ITEMS:
{review}

BLOCKED ITEMS:
{blocked}

ALL ISSUES (context):
{all_context}

Please write the report in a conversational, manager-friendly tone. Focus on business impact and progress. Use the exact section headers shown above (Started, Completed, Blocked / Off-track, Risks, Celebrations).
Report covers {project} project activity for the {components_str} components from {start} to {end}."#,
        start = period_start.format("%B %d, %Y"),
        end = period_end.format("%B %d, %Y"),
    )
}

fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

/// HTTP client for the Gemini generateContent API
struct HttpGenerationClient {
    endpoint: String,
    model: String,
    api_key: String,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpGenerationClient {
    fn new(config: &GeminiConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Generation(format!("failed to build tokio runtime: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| Error::Generation(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            runtime,
            http,
        })
    }
}

impl GenerationClient for HttpGenerationClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.runtime.block_on(async {
            let url = format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                self.endpoint, self.model, self.api_key
            );

            let resp = self
                .http
                .post(&url)
                .json(&json!({
                    "contents": [{ "parts": [{ "text": prompt }] }],
                }))
                .send()
                .await
                .map_err(|e| Error::Generation(format!("request failed: {e}")))?;

            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Generation(format!("failed to read body: {e}")))?;

            if !status.is_success() {
                return Err(Error::Generation(format!(
                    "backend returned {}: {}",
                    status.as_u16(),
                    body
                )));
            }

            let json: serde_json::Value = serde_json::from_str(&body)?;
            json.get("candidates")
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|v| v.get("content"))
                .and_then(|v| v.get("parts"))
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|v| v.get("text"))
                .and_then(|v| v.as_str())
                .map(ToString::to_string)
                .ok_or_else(|| {
                    Error::Generation(
                        "response missing candidates[0].content.parts[0].text".to_string(),
                    )
                })
        })
    }
}
