//! ADF (Atlassian Document Format) conversion
//!
//! Jira descriptions and comment bodies arrive as ADF: a JSON tree of typed
//! nodes (paragraphs, headings, lists, tables, media references, mentions)
//! whose text leaves carry formatting marks. This module converts such a tree
//! into two alternative representations:
//!
//! - [`extract_plain_text`]: flattened plain text for search and list views
//! - [`render_html`]: a sanitized HTML fragment for rich display, with media
//!   references resolved against the issue's attachment list
//!
//! Both conversions are pure functions over the input tree. They hold no
//! state across calls and never block the caller: a tree that cannot be
//! converted degrades to a fixed fallback string (plain text) or an empty
//! fragment (HTML) instead of surfacing an error.

mod html;
mod text;

use serde::{Deserialize, Serialize};

/// Hard cap on tree nesting during traversal.
///
/// Real documents nest a handful of levels; a tree deeper than this is
/// malformed or hostile, and bailing out keeps the recursion off the
/// stack limit.
const MAX_DEPTH: usize = 128;

/// Substituted for the plain-text output when conversion fails.
const EXTRACT_FALLBACK: &str = "Unable to parse description";

/// Why a document could not be converted.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("unrecognized document shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("document nesting exceeds the traversal cap")]
    TooDeep,
}

/// Attachment metadata used to resolve `media` nodes to servable URLs.
///
/// Supplied by the caller from the issue's attachment list; the converter
/// does not own or fetch this data.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AttachmentRef {
    pub id: String,
    pub filename: String,
    #[serde(default, rename = "contentUrl")]
    pub content_url: Option<String>,
}

/// Root shapes accepted from the upstream API.
///
/// Descriptions are usually a full `doc` tree, but the API also emits bare
/// node arrays and, for legacy issues, plain strings. All three parse here.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Document {
    Plain(String),
    Nodes(Vec<Node>),
    Node(Node),
}

impl Document {
    /// Parse a raw JSON value into one of the accepted root shapes.
    pub fn parse(value: &serde_json::Value) -> Result<Self, ConvertError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

/// One node of the document tree.
///
/// Leaf nodes (`type: "text"`) carry `text` and optionally `marks`;
/// container nodes carry `content`. The `type` string is kept as received
/// so unknown future node types survive the round through [`NodeKind`].
#[derive(Debug, Deserialize, Clone)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub content: Option<Vec<Node>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub marks: Option<Vec<Mark>>,
    #[serde(default)]
    pub attrs: Option<NodeAttrs>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }

    pub(crate) fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or_default()
    }

    pub(crate) fn attr(&self) -> NodeAttrs {
        self.attrs.clone().unwrap_or_default()
    }
}

/// The closed set of node types the converter knows how to render.
///
/// Anything else maps to [`NodeKind::Unknown`], which still recurses into
/// its children so documents using newer node types degrade to their text
/// content instead of disappearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    Text,
    HardBreak,
    BulletList,
    OrderedList,
    ListItem,
    Blockquote,
    CodeBlock,
    Table,
    TableRow,
    TableHeader,
    TableHeaderCell,
    TableCell,
    MediaSingle,
    MediaGroup,
    Media,
    Image,
    Mention,
    Unknown,
}

impl NodeKind {
    fn from_type(node_type: &str) -> Self {
        match node_type {
            "doc" => Self::Doc,
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "text" => Self::Text,
            "hardBreak" => Self::HardBreak,
            "bulletList" => Self::BulletList,
            "orderedList" => Self::OrderedList,
            "listItem" => Self::ListItem,
            "blockquote" => Self::Blockquote,
            "codeBlock" => Self::CodeBlock,
            "table" => Self::Table,
            "tableRow" => Self::TableRow,
            "tableHeader" => Self::TableHeader,
            "tableHeaderCell" => Self::TableHeaderCell,
            "tableCell" => Self::TableCell,
            "mediaSingle" => Self::MediaSingle,
            "mediaGroup" => Self::MediaGroup,
            "media" => Self::Media,
            "image" => Self::Image,
            "mention" => Self::Mention,
            _ => Self::Unknown,
        }
    }
}

/// Node attributes, typed over the fields the converter reads.
///
/// Attributes are type-specific (heading level, media id, legacy image src,
/// mention display text, table cell spans); everything else is ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct NodeAttrs {
    #[serde(default)]
    pub level: Option<u64>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "mediaId")]
    pub media_id: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub colspan: Option<u64>,
    #[serde(default)]
    pub rowspan: Option<u64>,
}

/// A formatting mark on a text leaf.
#[derive(Debug, Deserialize, Clone)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default)]
    pub attrs: Option<MarkAttrs>,
}

impl Mark {
    pub fn kind(&self) -> MarkKind {
        MarkKind::from_type(&self.mark_type)
    }

    pub(crate) fn href(&self) -> Option<&str> {
        self.attrs.as_ref().and_then(|a| a.href.as_deref())
    }
}

/// Mark attributes (only `link` carries one the converter reads).
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MarkAttrs {
    #[serde(default)]
    pub href: Option<String>,
}

/// The closed set of marks, with unknown marks ignored at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Link,
    Code,
    Strong,
    Em,
    Underline,
    Strike,
    Unknown,
}

impl MarkKind {
    fn from_type(mark_type: &str) -> Self {
        match mark_type {
            "link" => Self::Link,
            "code" => Self::Code,
            "strong" => Self::Strong,
            "em" => Self::Em,
            "underline" => Self::Underline,
            "strike" => Self::Strike,
            _ => Self::Unknown,
        }
    }

    /// Fixed nesting order: lower numbers wrap outermost, so a link always
    /// wraps every other mark. Nesting is deterministic regardless of the
    /// order marks appear in the input.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Self::Link => 1,
            Self::Code => 2,
            Self::Strong => 3,
            Self::Em => 4,
            Self::Underline => 5,
            Self::Strike => 6,
            Self::Unknown => u8::MAX,
        }
    }
}

/// Flatten a document to plain text.
///
/// Accepts any of the three root shapes (doc tree, bare node array, plain
/// string). Paragraph boundaries become blank lines, list items become
/// bullet-prefixed lines, table rows become tab-separated lines.
///
/// This is best-effort display logic: a tree that fails to convert yields
/// the fixed string `"Unable to parse description"` rather than an error,
/// and a `null` value yields an empty string.
pub fn extract_plain_text(value: &serde_json::Value) -> String {
    if value.is_null() {
        return String::new();
    }

    match Document::parse(value).and_then(|doc| text::extract_document(&doc)) {
        Ok(extracted) => extracted,
        Err(err) => {
            log::warn!("plain-text extraction failed: {err}");
            EXTRACT_FALLBACK.to_string()
        }
    }
}

/// Render a document to a sanitized HTML fragment.
///
/// Every text leaf is escaped for `&`, `<`, `>` before any tag wrapping, so
/// raw user text never reaches the output. `media` nodes are resolved
/// against `attachments` and rewritten to proxy URLs; when `issue_key` is
/// supplied those URLs are scoped under the issue's attachment route.
///
/// A tree that fails to convert yields an empty string (the UI shows no
/// rich content instead of an error), as does a `null` value.
pub fn render_html(
    value: &serde_json::Value,
    attachments: &[AttachmentRef],
    issue_key: Option<&str>,
) -> String {
    if value.is_null() {
        return String::new();
    }

    let renderer = html::HtmlRenderer::new(attachments, issue_key);
    match Document::parse(value).and_then(|doc| renderer.render_document(&doc)) {
        Ok(rendered) => rendered,
        Err(err) => {
            log::warn!("HTML rendering failed: {err}");
            String::new()
        }
    }
}

/// Convert a Jira description field (plain string or ADF tree) to text.
///
/// Convenience wrapper over [`extract_plain_text`] for optional fields:
/// missing or empty descriptions come back as `None`.
pub fn extract_description(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .map(extract_plain_text)
        .filter(|text| !text.is_empty())
}
