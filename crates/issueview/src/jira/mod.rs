pub mod attachments;
pub mod comments;
pub mod get;

use colored::Colorize;
use issueview_core::jira::{
    IssueOutput, JiraAttachmentResponse, JiraComment, JiraIssueResponse,
};
use serde::Deserialize;

use crate::prelude::*;

/// Jira configuration from environment variables
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl JiraConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: std::env::var("ATLASSIAN_BASE_URL")
                .map_err(|_| eyre!("ATLASSIAN_BASE_URL environment variable not set"))?,
            email: std::env::var("ATLASSIAN_EMAIL")
                .map_err(|_| eyre!("ATLASSIAN_EMAIL environment variable not set"))?,
            api_token: std::env::var("ATLASSIAN_API_TOKEN")
                .map_err(|_| eyre!("ATLASSIAN_API_TOKEN environment variable not set"))?,
        })
    }
}

/// Create an authenticated HTTP client with Basic Auth headers
pub fn create_jira_client(config: &JiraConfig) -> Result<reqwest::Client> {
    use base64::Engine;
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

    let auth_string = format!("{}:{}", config.email, config.api_token);
    let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {auth_encoded}"))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Check that an HTTP response was successful, returning a descriptive error otherwise.
async fn check_response(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(eyre!("{context} [{status}]: {body}"))
}

/// Fetch a raw issue (summary, status, description tree) from Jira.
pub async fn fetch_issue(
    client: &reqwest::Client,
    base_url: &str,
    issue_key: &str,
) -> Result<JiraIssueResponse> {
    let url = format!(
        "{base_url}/rest/api/3/issue/{}",
        urlencoding::encode(issue_key)
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send request to Jira: {e}"))?;

    let response = check_response(response, "Failed to fetch Jira issue").await?;

    response
        .json::<JiraIssueResponse>()
        .await
        .map_err(|e| eyre!("Failed to parse Jira issue response: {e}"))
}

/// Fetch the raw comments on an issue.
pub async fn fetch_comments(
    client: &reqwest::Client,
    base_url: &str,
    issue_key: &str,
) -> Result<Vec<JiraComment>> {
    let url = format!(
        "{base_url}/rest/api/3/issue/{}/comment",
        urlencoding::encode(issue_key)
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send request for Jira comments: {e}"))?;

    let response = check_response(response, "Failed to fetch Jira comments").await?;

    let comments_json = response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| eyre!("Failed to parse Jira comments: {e}"))?;

    Ok(comments_json
        .get("comments")
        .and_then(|comments| serde_json::from_value(comments.clone()).ok())
        .unwrap_or_default())
}

// --- Local deserialization structs for the issue-with-attachments response ---

#[derive(Debug, Deserialize)]
struct IssueWithAttachments {
    fields: AttachmentFields,
}

#[derive(Debug, Deserialize)]
struct AttachmentFields {
    #[serde(default)]
    attachment: Vec<JiraAttachmentResponse>,
}

/// Fetch all raw attachment metadata from a Jira issue.
pub async fn fetch_attachments(
    client: &reqwest::Client,
    base_url: &str,
    issue_key: &str,
) -> Result<Vec<JiraAttachmentResponse>> {
    let url = format!(
        "{base_url}/rest/api/3/issue/{}?fields=attachment",
        urlencoding::encode(issue_key)
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to fetch attachments: {e}"))?;

    let response = check_response(response, "Failed to fetch attachments").await?;

    let issue: IssueWithAttachments = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse attachment response: {e}"))?;

    Ok(issue.fields.attachment)
}

/// Display an issue's details as a formatted CLI view.
///
/// Renders the standard issue view used by the get handler: header line,
/// metadata table, converted description, labels, attachments, and comments.
fn display_issue(issue: &IssueOutput) {
    std::println!(
        "\n{} - {}\n",
        issue.key.bold().cyan(),
        issue.summary.bright_white()
    );

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Status".bold().cyan(),
        issue.status.green().to_string()
    ]);

    if let Some(priority) = &issue.priority {
        table.add_row(prettytable::row![
            "Priority".bold().cyan(),
            priority.bright_yellow().to_string()
        ]);
    }

    if let Some(issue_type) = &issue.issue_type {
        table.add_row(prettytable::row![
            "Type".bold().cyan(),
            issue_type.bright_blue().to_string()
        ]);
    }

    let assignee = issue.assignee.as_deref().unwrap_or("Unassigned");
    let assignee_colored = if assignee == "Unassigned" {
        assignee.bright_black().to_string()
    } else {
        assignee.bright_magenta().to_string()
    };
    table.add_row(prettytable::row![
        "Assignee".bold().cyan(),
        assignee_colored
    ]);

    if let Some(created) = &issue.created {
        table.add_row(prettytable::row![
            "Created".bold().cyan(),
            created.bright_black().to_string()
        ]);
    }

    if let Some(updated) = &issue.updated {
        table.add_row(prettytable::row![
            "Updated".bold().cyan(),
            updated.bright_black().to_string()
        ]);
    }

    table.printstd();

    if let Some(description) = &issue.description {
        std::println!("\n{}:", "Description".bold().cyan());
        std::println!("{}\n", description);
    }

    if !issue.labels.is_empty() {
        std::println!(
            "\n{}: {}",
            "Labels".bold().cyan(),
            issue.labels.join(", ").bright_green()
        );
    }

    if !issue.attachments.is_empty() {
        std::println!("\n{}:", "Attachments".bold().cyan());
        for att in &issue.attachments {
            std::println!(
                "  {} {} ({}, {})",
                att.id.bright_black(),
                att.filename.bright_white(),
                att.size_human,
                att.mime_type.bright_blue()
            );
        }
    }

    if !issue.comments.is_empty() {
        std::println!("\n{}", "Comments:".bold().cyan());
        for (index, comment) in issue.comments.iter().enumerate() {
            let index_str = format!("{}.", index + 1).green().to_string();
            let timestamp_str = format!("[{}]", comment.created_at).blue().to_string();
            let author_str = comment
                .author
                .clone()
                .unwrap_or_else(|| "Unknown".to_string())
                .magenta()
                .to_string();

            std::println!("{} {} {}", index_str, timestamp_str, author_str);

            // Comment bodies arrive pre-converted; highlight mentions only.
            let colored_body = comment
                .body
                .split_whitespace()
                .map(|word| {
                    if word.starts_with('@') {
                        word.to_owned().yellow().to_string()
                    } else {
                        word.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            std::println!("{}\n", colored_body);
        }
    }

    std::println!();
}
