use issueview_core::jira::{transform_issue, IssueOutput};
use serde::{Deserialize, Serialize};

use crate::jira::{create_jira_client, fetch_attachments, fetch_comments, fetch_issue, JiraConfig};
use crate::prelude::{println, *};

/// Options for getting a Jira issue
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct GetOptions {
    /// Issue key (e.g., "PROJ-123")
    #[clap(env = "JIRA_ISSUE_KEY")]
    pub issue_key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the rendered HTML description instead of the issue view
    #[arg(long)]
    pub html: bool,
}

/// Get detailed issue information from Jira
///
/// Fetches the issue, its comments, and its attachment metadata, then runs
/// the description and comment bodies through the document converter so the
/// output carries both plain-text and HTML renderings.
pub async fn get_issue_data(issue_key: String) -> Result<IssueOutput> {
    let config = JiraConfig::from_env()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let issue = fetch_issue(&client, base_url, &issue_key).await?;

    // Comments and attachments degrade to empty: conversion extras must
    // never block the primary fetch.
    let comments = fetch_comments(&client, base_url, &issue_key)
        .await
        .unwrap_or_default();
    let attachments = fetch_attachments(&client, base_url, &issue_key)
        .await
        .unwrap_or_default();

    Ok(transform_issue(issue, comments, attachments))
}

/// Handle the get command
pub async fn handler(options: GetOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Fetching issue {}...", options.issue_key);
    }

    let issue = get_issue_data(options.issue_key).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else if options.html {
        println!("{}", issue.description_html.unwrap_or_default());
    } else {
        super::display_issue(&issue);
    }

    Ok(())
}
