//! Status-transition classification over a trailing window.
//!
//! This is the heart of the report: walk each issue's change history, keep
//! the status changes that happened inside the window, and bucket them by
//! destination status. Classification is total - issues with no qualifying
//! history simply land only in the `all` bucket.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::jira::Issue;

/// A single status change observed inside the window.
///
/// Derived and ephemeral; one is produced per qualifying history item, so an
/// issue that bounced through several statuses contributes several records.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub key: String,
    pub summary: String,
    pub from_status: String,
    pub to_status: String,
    /// Entry timestamp formatted `%Y-%m-%d %H:%M`
    pub date: String,
    pub assignee: String,
    pub priority: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub description: String,
}

/// Lightweight per-issue summary used for the `all` and `blocked` buckets.
#[derive(Debug, Clone, Serialize)]
pub struct IssueSummary {
    pub key: String,
    pub summary: String,
    pub current_status: String,
    pub assignee: String,
    pub priority: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    /// Carried for the `all` bucket, omitted for `blocked`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Classified buckets for one reporting window.
#[derive(Debug, Default, Serialize)]
pub struct TransitionBuckets {
    /// Moved to an in-progress status
    pub started: Vec<Transition>,
    /// Moved to a review status
    pub in_review: Vec<Transition>,
    /// Moved to a closed status
    pub closed: Vec<Transition>,
    /// Moved to a done status
    pub done: Vec<Transition>,
    /// Moved to a resolved status
    pub resolved: Vec<Transition>,
    /// Currently blocked, independent of history
    pub blocked: Vec<IssueSummary>,
    /// Every fetched issue, for report context
    pub all: Vec<IssueSummary>,
}

impl TransitionBuckets {
    /// Completed work: closed, then done, then resolved.
    ///
    /// Bucket-major order, preserving each bucket's internal order rather
    /// than interleaving by time.
    pub fn completed(&self) -> Vec<&Transition> {
        self.closed
            .iter()
            .chain(self.done.iter())
            .chain(self.resolved.iter())
            .collect()
    }
}

/// Destination bucket for a status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Started,
    InReview,
    Closed,
    Done,
    Resolved,
}

/// Classify all issues against `cutoff = now - window_days` in naive local time.
pub fn classify(issues: &[Issue], window_days: i64) -> TransitionBuckets {
    let cutoff = Local::now().naive_local() - chrono::Duration::days(window_days);
    classify_at(issues, cutoff)
}

/// Classification against an explicit cutoff; tests drive this directly.
///
/// The cutoff is inclusive: an entry timestamped exactly at the cutoff is
/// counted.
pub fn classify_at(issues: &[Issue], cutoff: NaiveDateTime) -> TransitionBuckets {
    let mut buckets = TransitionBuckets::default();

    for issue in issues {
        let current_status = issue.fields.status.name.as_str();
        let assignee = issue.assignee_name();
        let priority = issue.priority_name();
        let issue_type = issue.fields.issuetype.name.as_str();
        let description = issue.description();

        buckets.all.push(IssueSummary {
            key: issue.key.clone(),
            summary: issue.fields.summary.clone(),
            current_status: current_status.to_string(),
            assignee: assignee.to_string(),
            priority: priority.to_string(),
            issue_type: issue_type.to_string(),
            description: Some(description.to_string()),
        });

        // Blocked membership is evaluated once per issue from its current
        // state, independent of the change history.
        if current_status.to_lowercase().contains("blocked") || priority == "Blocker" {
            buckets.blocked.push(IssueSummary {
                key: issue.key.clone(),
                summary: issue.fields.summary.clone(),
                current_status: current_status.to_string(),
                assignee: assignee.to_string(),
                priority: priority.to_string(),
                issue_type: issue_type.to_string(),
                description: None,
            });
        }

        for history in issue.histories() {
            let Some(created) = parse_history_timestamp(&history.created) else {
                tracing::warn!(
                    key = %issue.key,
                    raw = %history.created,
                    "unparseable history timestamp, skipping entry"
                );
                continue;
            };
            if created < cutoff {
                continue;
            }

            for item in &history.items {
                if item.field != "status" {
                    continue;
                }
                let to_status = item.to_string.clone().unwrap_or_default();
                let Some(target) = classify_target(&to_status) else {
                    // Destination outside the reported set
                    continue;
                };

                let transition = Transition {
                    key: issue.key.clone(),
                    summary: issue.fields.summary.clone(),
                    from_status: item.from_string.clone().unwrap_or_default(),
                    to_status,
                    date: created.format("%Y-%m-%d %H:%M").to_string(),
                    assignee: assignee.to_string(),
                    priority: priority.to_string(),
                    issue_type: issue_type.to_string(),
                    description: description.to_string(),
                };

                match target {
                    Target::Started => buckets.started.push(transition),
                    Target::InReview => buckets.in_review.push(transition),
                    Target::Closed => buckets.closed.push(transition),
                    Target::Done => buckets.done.push(transition),
                    Target::Resolved => buckets.resolved.push(transition),
                }
            }
        }
    }

    buckets
}

/// First-match-wins bucketing on the lower-cased destination status.
///
/// The precedence order is load-bearing: a status containing both "review"
/// and "done" lands in review because review is tested first. Downstream
/// report content depends on this exact order.
fn classify_target(to_status: &str) -> Option<Target> {
    let lower = to_status.to_lowercase();
    if lower.contains("in progress") || lower.contains("progress") {
        Some(Target::Started)
    } else if lower.contains("review") {
        Some(Target::InReview)
    } else if lower.contains("closed") {
        Some(Target::Closed)
    } else if lower.contains("done") {
        Some(Target::Done)
    } else if lower.contains("resolved") {
        Some(Target::Resolved)
    } else {
        None
    }
}

/// Parse a tracker history timestamp such as `2024-01-15T10:30:45.123+0000`.
///
/// Fractional seconds and any trailing `Z`/offset are stripped and the result
/// is naive. The cutoff this is compared against comes from the local clock,
/// so the effective window can shift by the local UTC offset; that skew is
/// inherited behavior, kept as-is.
fn parse_history_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let head = raw.split('.').next().unwrap_or(raw);
    // `%Y-%m-%dT%H:%M:%S` is exactly 19 bytes; anything after is an offset
    let head = head.get(..19).unwrap_or(head);
    NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S").ok()
}
