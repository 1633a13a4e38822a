use colored::Colorize;
use issueview_core::jira::{attachment_refs, transform_comments, CommentOutput};
use serde::{Deserialize, Serialize};

use crate::jira::{create_jira_client, fetch_attachments, fetch_comments, JiraConfig};
use crate::prelude::{println, *};

/// Options for listing comments on a Jira issue
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct CommentsOptions {
    /// Issue key (e.g., "PROJ-123")
    #[clap(env = "JIRA_ISSUE_KEY")]
    pub issue_key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print rendered HTML bodies instead of plain text
    #[arg(long)]
    pub html: bool,
}

/// Fetch and convert all comments on an issue
pub async fn comments_data(issue_key: String) -> Result<Vec<CommentOutput>> {
    let config = JiraConfig::from_env()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let comments = fetch_comments(&client, base_url, &issue_key).await?;

    // Attachment metadata is only needed to resolve media embedded in
    // comment bodies; degrade to an empty list if the fetch fails.
    let attachments = fetch_attachments(&client, base_url, &issue_key)
        .await
        .unwrap_or_default();
    let refs = attachment_refs(&attachments);

    Ok(transform_comments(comments, &refs, &issue_key))
}

/// Handle the comments command
pub async fn handler(options: CommentsOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Fetching comments for {}...", options.issue_key);
    }

    let comments = comments_data(options.issue_key).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&comments)?);
        return Ok(());
    }

    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }

    for (index, comment) in comments.iter().enumerate() {
        let index_str = format!("{}.", index + 1).green().to_string();
        let timestamp_str = format!("[{}]", comment.created_at).blue().to_string();
        let author_str = comment
            .author
            .clone()
            .unwrap_or_else(|| "Unknown".to_string())
            .magenta()
            .to_string();

        std::println!("{} {} {}", index_str, timestamp_str, author_str);

        if options.html {
            std::println!("{}\n", comment.body_html);
        } else {
            std::println!("{}\n", comment.body);
        }
    }

    Ok(())
}
