//! CLI acceptance tests for exit behavior.

use assert_cmd::Command;

/// Missing required configuration is the only non-zero exit path, and the
/// diagnostic names what is missing.
#[test]
fn missing_required_config_exits_nonzero() {
    let mut cmd = Command::cargo_bin("statusbrief").unwrap();
    cmd.env_remove("JIRA_SERVER_URL")
        .env_remove("JIRA_BEARER_TOKEN")
        .env_remove("GEMINI_API_KEY");

    let assert = cmd.assert().failure();
    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("JIRA_SERVER_URL") || stderr.contains("configuration"),
        "diagnostic should mention the missing configuration: {stderr}"
    );
}

#[test]
fn help_lists_window_flags() {
    let mut cmd = Command::cargo_bin("statusbrief").unwrap();
    let assert = cmd.arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("--project"));
    assert!(stdout.contains("--component"));
    assert!(stdout.contains("--days"));
}
