use colored::Colorize;
use issueview_core::jira::{transform_attachment_response, AttachmentOutput};
use serde::{Deserialize, Serialize};

use crate::jira::{create_jira_client, fetch_attachments, JiraConfig};
use crate::prelude::{println, *};

/// Options for listing attachments on a Jira issue
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct AttachmentsOptions {
    /// Issue key (e.g., "PROJ-123")
    #[clap(env = "JIRA_ISSUE_KEY")]
    pub issue_key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// List all attachments on a Jira issue
pub async fn attachments_data(issue_key: String) -> Result<Vec<AttachmentOutput>> {
    let config = JiraConfig::from_env()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let raw = fetch_attachments(&client, base_url, &issue_key).await?;
    Ok(transform_attachment_response(raw))
}

/// Handle the attachments command
pub async fn handler(options: AttachmentsOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Fetching attachments for {}...", options.issue_key);
    }

    let attachments = attachments_data(options.issue_key).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&attachments)?);
    } else if attachments.is_empty() {
        println!("No attachments found.");
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row![
            "ID".bold().cyan(),
            "Filename".bold().cyan(),
            "Size".bold().cyan(),
            "Type".bold().cyan(),
            "Created".bold().cyan()
        ]);
        for att in &attachments {
            table.add_row(prettytable::row![
                att.id.green().to_string(),
                att.filename.bright_white().to_string(),
                att.size_human.bright_yellow().to_string(),
                att.mime_type.bright_blue().to_string(),
                att.created.bright_black().to_string()
            ]);
        }
        table.printstd();
    }

    Ok(())
}
