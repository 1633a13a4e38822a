//! HTML rendering of document trees
//!
//! Produces a sanitized HTML fragment for direct injection into a page.
//! Text leaves are escaped before any tag wrapping; marks nest in a fixed
//! precedence order so output is deterministic regardless of input order;
//! `media` nodes are joined against the caller-supplied attachment list and
//! rewritten to proxy URLs.

use super::{AttachmentRef, ConvertError, Document, Mark, MarkKind, Node, NodeKind, MAX_DEPTH};

/// Escape a text leaf for `&`, `<`, `>` before it is wrapped in any tag.
fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Node types that may not legally nest inside `<p>`.
fn is_block(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Table
            | NodeKind::BulletList
            | NodeKind::OrderedList
            | NodeKind::Heading
            | NodeKind::CodeBlock
            | NodeKind::Blockquote
            | NodeKind::MediaSingle
            | NodeKind::MediaGroup
    )
}

/// Renders one document against one attachment list. Holds only borrowed,
/// call-scoped inputs, so concurrent renders need no coordination.
pub(super) struct HtmlRenderer<'a> {
    attachments: &'a [AttachmentRef],
    issue_key: Option<&'a str>,
}

impl<'a> HtmlRenderer<'a> {
    pub(super) fn new(attachments: &'a [AttachmentRef], issue_key: Option<&'a str>) -> Self {
        Self {
            attachments,
            issue_key,
        }
    }

    pub(super) fn render_document(&self, doc: &Document) -> Result<String, ConvertError> {
        match doc {
            Document::Plain(text) => Ok(render_plain_string(text)),
            Document::Nodes(nodes) => self.render_children(nodes, 0),
            Document::Node(node) => self.render_node(node, 0),
        }
    }

    fn render_children(&self, nodes: &[Node], depth: usize) -> Result<String, ConvertError> {
        let mut out = String::new();
        for node in nodes {
            out.push_str(&self.render_node(node, depth)?);
        }
        Ok(out)
    }

    fn render_node(&self, node: &Node, depth: usize) -> Result<String, ConvertError> {
        if depth > MAX_DEPTH {
            return Err(ConvertError::TooDeep);
        }

        let rendered = match node.kind() {
            NodeKind::Doc => self.render_children(node.children(), depth + 1)?,

            NodeKind::Text => render_marked_text(
                node.text.as_deref().unwrap_or_default(),
                node.marks.as_deref().unwrap_or_default(),
            ),

            NodeKind::HardBreak => "<br />".to_string(),

            NodeKind::Paragraph => {
                let children = node.children();
                if children.is_empty() {
                    "<p><br /></p>".to_string()
                } else if children.iter().any(|child| is_block(child.kind())) {
                    // A block child inside <p> is invalid HTML; render the
                    // children unwrapped instead.
                    self.render_children(children, depth + 1)?
                } else {
                    format!("<p>{}</p>", self.render_children(children, depth + 1)?)
                }
            }

            NodeKind::Heading => {
                let level = node.attr().level.unwrap_or(1).clamp(1, 6);
                format!(
                    "<h{level}>{}</h{level}>",
                    self.render_children(node.children(), depth + 1)?
                )
            }

            NodeKind::BulletList => {
                format!("<ul>{}</ul>", self.render_children(node.children(), depth + 1)?)
            }
            NodeKind::OrderedList => {
                format!("<ol>{}</ol>", self.render_children(node.children(), depth + 1)?)
            }
            NodeKind::ListItem => {
                format!("<li>{}</li>", self.render_children(node.children(), depth + 1)?)
            }

            NodeKind::Blockquote => format!(
                "<blockquote>{}</blockquote>",
                self.render_children(node.children(), depth + 1)?
            ),

            NodeKind::CodeBlock => format!(
                "<pre><code>{}</code></pre>",
                self.render_children(node.children(), depth + 1)?
            ),

            NodeKind::Table => format!(
                "<table class=\"adf-table\" style=\"width:100%\">{}</table>",
                self.render_children(node.children(), depth + 1)?
            ),

            NodeKind::TableRow => {
                format!("<tr>{}</tr>", self.render_children(node.children(), depth + 1)?)
            }

            NodeKind::TableHeader | NodeKind::TableHeaderCell => format!(
                "<th class=\"adf-th\"{}>{}</th>",
                span_attrs(node),
                self.render_children(node.children(), depth + 1)?
            ),

            NodeKind::TableCell => format!(
                "<td class=\"adf-td\"{}>{}</td>",
                span_attrs(node),
                self.render_children(node.children(), depth + 1)?
            ),

            NodeKind::MediaSingle => format!(
                "<div class=\"adf-media adf-media-single\">{}</div>",
                self.render_children(node.children(), depth + 1)?
            ),

            NodeKind::MediaGroup => format!(
                "<div class=\"adf-media-group\" style=\"display:flex;gap:8px\">{}</div>",
                self.render_children(node.children(), depth + 1)?
            ),

            NodeKind::Media => self.render_media(node),

            NodeKind::Image => self.render_image(node),

            NodeKind::Mention => {
                let display = node.attr().text.unwrap_or_else(|| "@user".to_string());
                format!("<span class=\"jira-mention\">{}</span>", escape(&display))
            }

            // Forward compatibility: unknown containers render their
            // children, unknown leaves render nothing.
            NodeKind::Unknown => match &node.content {
                Some(content) => self.render_children(content, depth + 1)?,
                None => String::new(),
            },
        };

        Ok(rendered)
    }

    /// Resolve a `media` node to an `<img>` tag.
    ///
    /// Joins the node against the attachment list in two stages: exact
    /// filename match on the alt text first, then a loose "content URL
    /// contains the node's media id" check. The stage order matters — the
    /// substring check can false-positive on numeric prefixes, so it only
    /// runs when the filename match fails. An unmatched node with its own
    /// id is trusted as-is; a node with nothing resolvable becomes a
    /// neutral placeholder.
    fn render_media(&self, node: &Node) -> String {
        let attrs = node.attr();
        let name = attrs.alt.as_deref().or(attrs.title.as_deref());
        let media_id = attrs.id.as_deref().or(attrs.media_id.as_deref());

        let matched = name
            .and_then(|n| self.attachments.iter().find(|a| a.filename == n))
            .or_else(|| {
                media_id.and_then(|id| {
                    self.attachments.iter().find(|a| {
                        a.content_url
                            .as_deref()
                            .is_some_and(|url| url.contains(id))
                    })
                })
            });

        if let Some(attachment) = matched {
            return img_tag(&self.proxy_url(&attachment.id), name);
        }

        if let Some(id) = media_id {
            return img_tag(&self.proxy_url(id), name);
        }

        "<span class=\"adf-media-placeholder\">[media]</span>".to_string()
    }

    /// Resolve a legacy `image` node.
    ///
    /// Old documents reference attachments through `/secure/attachment/{id}/`
    /// URLs in the `src` attribute; when that pattern is present the numeric
    /// id feeds the same proxy URL as `media` nodes. Any other `src` passes
    /// through unchanged.
    fn render_image(&self, node: &Node) -> String {
        let attrs = node.attr();
        let name = attrs.alt.as_deref().or(attrs.title.as_deref());

        if let Some(attachment) = name.and_then(|n| self.attachments.iter().find(|a| a.filename == n))
        {
            return img_tag(&self.proxy_url(&attachment.id), name);
        }

        let Some(src) = attrs.src.as_deref() else {
            return "<span class=\"adf-media-placeholder\">[media]</span>".to_string();
        };

        // Built fresh per call: matching keeps no state across invocations.
        let attachment_url = regex::Regex::new(r"/secure/attachment/(\d+)/").unwrap();
        if let Some(caps) = attachment_url.captures(src) {
            return img_tag(&self.proxy_url(&caps[1]), name);
        }

        img_tag(src, name)
    }

    fn proxy_url(&self, attachment_id: &str) -> String {
        match self.issue_key {
            Some(key) => format!("/issues/{key}/attachments/{attachment_id}?disposition=inline"),
            None => format!("/attachments/{attachment_id}?disposition=inline"),
        }
    }
}

fn img_tag(src: &str, alt: Option<&str>) -> String {
    format!(
        "<img class=\"adf-media-img\" src=\"{}\" alt=\"{}\" />",
        src,
        escape(alt.unwrap_or_default())
    )
}

/// Pass `colspan`/`rowspan` through on table cells when present.
fn span_attrs(node: &Node) -> String {
    let attrs = node.attr();
    let mut out = String::new();
    if let Some(colspan) = attrs.colspan {
        out.push_str(&format!(" colspan=\"{colspan}\""));
    }
    if let Some(rowspan) = attrs.rowspan {
        out.push_str(&format!(" rowspan=\"{rowspan}\""));
    }
    out
}

/// Escape a text leaf, then wrap it in its mark tags.
///
/// Marks apply in the fixed precedence order (link, code, strong, em,
/// underline, strike — outermost to innermost), so `[em, strong]` and
/// `[strong, em]` render identically. Unrecognized marks are skipped.
fn render_marked_text(text: &str, marks: &[Mark]) -> String {
    let mut out = escape(text);

    let mut ordered: Vec<&Mark> = marks
        .iter()
        .filter(|mark| mark.kind() != MarkKind::Unknown)
        .collect();
    ordered.sort_by_key(|mark| mark.kind().precedence());

    // Innermost tags wrap first, so walk from strike back toward link.
    for mark in ordered.iter().rev() {
        out = match mark.kind() {
            // href is emitted verbatim, matching upstream behavior.
            MarkKind::Link => format!(
                "<a href=\"{}\">{}</a>",
                mark.href().unwrap_or_default(),
                out
            ),
            MarkKind::Code => format!("<code>{out}</code>"),
            MarkKind::Strong => format!("<strong>{out}</strong>"),
            MarkKind::Em => format!("<em>{out}</em>"),
            MarkKind::Underline => format!("<u>{out}</u>"),
            MarkKind::Strike => format!("<s>{out}</s>"),
            MarkKind::Unknown => out,
        };
    }

    out
}

/// Render a legacy plain-string description: blank lines split paragraphs,
/// single newlines become `<br />`.
fn render_plain_string(text: &str) -> String {
    let escaped = escape(text);

    escaped
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| format!("<p>{}</p>", block.trim().replace('\n', "<br />")))
        .collect()
}
