//! Transformation functions for Jira API responses
//!
//! Raw issue, comment, and attachment payloads become clean output models
//! here. Descriptions and comment bodies arrive as ADF trees (or legacy
//! strings) and are converted to both plain text and HTML through the
//! [`crate::adf`] converter, with the issue's attachment list supplied so
//! embedded media resolves to proxy URLs.

use serde::{Deserialize, Serialize};

use crate::adf::{self, AttachmentRef};

/// Jira issue response from API
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueResponse {
    pub key: String,
    pub fields: JiraIssueFields,
}

/// Fields from Jira issue
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueFields {
    pub summary: String,
    #[serde(default)]
    pub description: Option<serde_json::Value>, // Plain string or ADF tree
    pub status: JiraStatus,
    #[serde(default)]
    pub assignee: Option<JiraUser>,
    #[serde(default)]
    pub priority: Option<JiraPriority>,
    #[serde(default)]
    pub issuetype: Option<JiraIssueType>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Jira status field
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraStatus {
    pub name: String,
}

/// Jira user field (assignee, comment author)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraUser {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
}

/// Jira priority field
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraPriority {
    #[serde(default)]
    pub name: String,
}

/// Jira issue type field
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueType {
    pub name: String,
}

/// Comment on a Jira issue, as returned by the comment endpoint
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraComment {
    #[serde(rename = "id")]
    pub comment_id: String,
    pub body: serde_json::Value, // Plain string or ADF tree
    #[serde(rename = "created")]
    pub created_at: String,
    #[serde(default)]
    pub author: Option<JiraUser>,
}

/// Attachment metadata from the issue's attachment field
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraAttachmentResponse {
    pub id: String,
    pub filename: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub content: Option<String>, // Download URL
}

/// Output structure for a single attachment
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttachmentOutput {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub size_human: String,
    pub created: String,
}

/// Output structure for a converted comment
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CommentOutput {
    pub id: String,
    pub author: Option<String>,
    pub created_at: String,
    pub body: String,
    pub body_html: String,
}

/// Output structure for detailed issue information
#[derive(Debug, Serialize, Clone)]
pub struct IssueOutput {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub description_html: Option<String>,
    pub status: String,
    pub priority: Option<String>,
    pub issue_type: Option<String>,
    pub assignee: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub labels: Vec<String>,
    pub attachments: Vec<AttachmentOutput>,
    pub comments: Vec<CommentOutput>,
}

/// Build the converter's attachment join input from raw attachment metadata.
pub fn attachment_refs(attachments: &[JiraAttachmentResponse]) -> Vec<AttachmentRef> {
    attachments
        .iter()
        .map(|a| AttachmentRef {
            id: a.id.clone(),
            filename: a.filename.clone(),
            content_url: a.content.clone(),
        })
        .collect()
}

/// Convert Jira issue response + comments + attachments to the issue output
///
/// The one place both converter functions run: the description and every
/// comment body are converted to plain text and HTML against the issue's
/// attachment list, with the issue key as the proxy URL context.
///
/// # Arguments
/// * `issue` - The raw issue response from Jira API
/// * `comments` - The parsed comments array
/// * `attachments` - The issue's raw attachment metadata
///
/// # Returns
/// * `IssueOutput` - Cleaned and transformed issue with converted bodies
pub fn transform_issue(
    issue: JiraIssueResponse,
    comments: Vec<JiraComment>,
    attachments: Vec<JiraAttachmentResponse>,
) -> IssueOutput {
    let refs = attachment_refs(&attachments);
    let key = issue.key;

    let description = adf::extract_description(issue.fields.description.as_ref());
    let description_html = issue
        .fields
        .description
        .as_ref()
        .map(|value| adf::render_html(value, &refs, Some(&key)))
        .filter(|html| !html.is_empty());

    let comments = transform_comments(comments, &refs, &key);

    IssueOutput {
        summary: issue.fields.summary,
        description,
        description_html,
        status: issue.fields.status.name,
        priority: issue
            .fields
            .priority
            .as_ref()
            .map(|p| p.name.clone())
            .filter(|name| !name.is_empty()),
        issue_type: issue.fields.issuetype.as_ref().map(|it| it.name.clone()),
        assignee: issue
            .fields
            .assignee
            .and_then(|a| a.display_name.or(a.email_address)),
        created: issue.fields.created,
        updated: issue.fields.updated,
        labels: issue.fields.labels,
        attachments: transform_attachment_response(attachments),
        comments,
        key,
    }
}

/// Convert raw comments to output comments with converted bodies
///
/// Comment bodies run through both converter functions against the issue's
/// attachment list, so media embedded in comments resolves the same way as
/// in descriptions.
pub fn transform_comments(
    comments: Vec<JiraComment>,
    refs: &[AttachmentRef],
    issue_key: &str,
) -> Vec<CommentOutput> {
    comments
        .into_iter()
        .map(|comment| CommentOutput {
            id: comment.comment_id,
            author: comment
                .author
                .and_then(|a| a.display_name.or(a.email_address)),
            created_at: comment.created_at,
            body: adf::extract_plain_text(&comment.body),
            body_html: adf::render_html(&comment.body, refs, Some(issue_key)),
        })
        .collect()
}

/// Convert raw attachment metadata to the attachment listing output
pub fn transform_attachment_response(
    attachments: Vec<JiraAttachmentResponse>,
) -> Vec<AttachmentOutput> {
    attachments
        .into_iter()
        .map(|a| AttachmentOutput {
            id: a.id,
            filename: a.filename,
            mime_type: a
                .mime_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size_human: format_size(a.size),
            created: a.created.map(format_timestamp).unwrap_or_default(),
        })
        .collect()
}

/// Humanize a byte count (1.5 KB, 3.2 MB, ...)
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.1} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Shorten a Jira timestamp (`2024-01-02T10:30:00.000+0000`) to a readable
/// date and time; unparseable values pass through unchanged.
fn format_timestamp(raw: String) -> String {
    chrono::DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(&raw))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or(raw)
}
