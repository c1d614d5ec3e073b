//! statusbrief - one-shot weekly status report job
//!
//! Fetches recently updated tracker issues, classifies their status-change
//! history over a trailing window, turns the classification into a narrative
//! via the generation backend, and emails the result.
//!
//! The run is strictly sequential. Only missing required configuration exits
//! non-zero; fetch and generation failures are logged and the process still
//! exits 0 after attempting (or skipping) the remaining steps.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/statusbrief/statusbrief.log

use anyhow::{Context, Result};
use clap::Parser;
use statusbrief_core::jira::JiraClient;
use statusbrief_core::report::{self, create_generation_client};
use statusbrief_core::{notify, transitions, Config};

#[derive(Parser)]
#[command(name = "statusbrief")]
#[command(about = "Generate and email a weekly issue-tracker status report")]
#[command(version)]
struct Args {
    /// Tracker project key
    #[arg(long, default_value = "OCM")]
    project: String,

    /// Component name to filter on (repeatable)
    #[arg(long = "component", default_values_t = default_components())]
    components: Vec<String>,

    /// Trailing window in days
    #[arg(long, default_value = "7")]
    days: i64,
}

fn default_components() -> Vec<String> {
    vec!["Rosa".to_string(), "rosa-team".to_string()]
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Required variables are checked before any network call; this is the
    // only path that exits non-zero.
    let config = Config::from_env().context(
        "missing required configuration (JIRA_SERVER_URL, JIRA_BEARER_TOKEN, GEMINI_API_KEY)",
    )?;

    let _log_guard = statusbrief_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    tracing::info!(
        project = %args.project,
        components = %args.components.join(","),
        days = args.days,
        "statusbrief starting"
    );

    println!("Starting weekly report generation...");
    println!(
        "Target: {} project, components: {}",
        args.project,
        args.components.join(", ")
    );
    println!("Window: last {} days", args.days);

    let client = JiraClient::new(&config.jira).context("failed to create tracker client")?;

    println!("Connecting to tracker at {}", config.jira.server_url);

    let issues = match client.search_recent(&args.project, &args.components, args.days) {
        Ok(issues) => issues,
        Err(e) => {
            tracing::error!(error = %e, "tracker fetch failed");
            println!("Could not fetch issues: {e}");
            println!("Report generation aborted.");
            return Ok(());
        }
    };

    println!(
        "Found {} issues updated in the last {} days.",
        issues.len(),
        args.days
    );

    let buckets = transitions::classify(&issues, args.days);
    tracing::info!(
        started = buckets.started.len(),
        in_review = buckets.in_review.len(),
        closed = buckets.closed.len(),
        done = buckets.done.len(),
        resolved = buckets.resolved.len(),
        blocked = buckets.blocked.len(),
        total = buckets.all.len(),
        "classified status transitions"
    );

    println!("\nSending data for report generation...");
    let report_text = match create_generation_client(&config.gemini) {
        Ok(generator) => report::compose_report(
            &buckets,
            args.days,
            &args.project,
            &args.components,
            generator.as_ref(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to create generation client");
            format!("Failed to generate report: {e}")
        }
    };

    let rule = "=".repeat(80);
    println!("\n{rule}");
    println!("WEEKLY STATUS REPORT");
    println!("{rule}");
    println!("{report_text}");
    println!("{rule}");

    match notify::send_report(
        config.email.as_ref(),
        &report_text,
        issues.len(),
        args.days,
        &args.project,
        &args.components,
    ) {
        Ok(true) => tracing::info!("report emailed"),
        Ok(false) => tracing::info!("report not emailed"),
        Err(e) => {
            tracing::error!(error = %e, "email delivery failed");
            println!("Failed to send email: {e}");
        }
    }

    tracing::info!("statusbrief complete");
    Ok(())
}
