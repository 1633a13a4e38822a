//! Plain-text extraction from document trees
//!
//! Depth-first, pre-order walk producing flattened text: paragraphs and
//! headings separated by blank lines, list items as bullet lines, table
//! rows as tab-separated lines. Marks are ignored — plain text carries no
//! formatting.

use super::{ConvertError, Document, Node, NodeKind, MAX_DEPTH};

/// Extract plain text from a parsed document root.
pub(super) fn extract_document(doc: &Document) -> Result<String, ConvertError> {
    let extracted = match doc {
        // Legacy plain-string descriptions pass through verbatim.
        Document::Plain(text) => return Ok(text.clone()),
        Document::Nodes(nodes) => extract_children(nodes, 0)?,
        Document::Node(node) => match &node.content {
            Some(content) => extract_children(content, 0)?,
            None => extract_node(node, 0)?,
        },
    };

    Ok(extracted.trim().to_string())
}

fn extract_children(nodes: &[Node], depth: usize) -> Result<String, ConvertError> {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&extract_node(node, depth)?);
    }
    Ok(out)
}

fn extract_node(node: &Node, depth: usize) -> Result<String, ConvertError> {
    if depth > MAX_DEPTH {
        return Err(ConvertError::TooDeep);
    }

    let extracted = match node.kind() {
        NodeKind::Text => node.text.clone().unwrap_or_default(),

        NodeKind::HardBreak => "\n".to_string(),

        // Block-level nodes end with a blank line so consecutive blocks
        // stay visually separated.
        NodeKind::Paragraph | NodeKind::Heading => {
            format!("{}\n\n", extract_children(node.children(), depth + 1)?)
        }

        NodeKind::BulletList | NodeKind::OrderedList => {
            let mut lines = Vec::new();
            for item in node.children() {
                let item_text = extract_node(item, depth + 1)?;
                // Item paragraphs carry their own blank-line suffix; trim it
                // so every item stays on a single bullet line.
                lines.push(format!("• {}", item_text.trim()));
            }
            format!("{}\n\n", lines.join("\n"))
        }

        NodeKind::ListItem => extract_children(node.children(), depth + 1)?,

        NodeKind::CodeBlock => {
            let code = extract_children(node.children(), depth + 1)?;
            format!("```\n{}\n```\n\n", code.trim_end())
        }

        NodeKind::Blockquote => {
            let quoted = extract_children(node.children(), depth + 1)?;
            format!("> {}\n\n", quoted.trim())
        }

        NodeKind::Mention => node
            .attr()
            .text
            .unwrap_or_else(|| "@user".to_string()),

        NodeKind::Table => {
            let mut rows = Vec::new();
            for row in node.children() {
                rows.push(extract_node(row, depth + 1)?);
            }
            format!("{}\n\n", rows.join("\n"))
        }

        NodeKind::TableRow => {
            let mut cells = Vec::new();
            for cell in node.children() {
                // Cell paragraphs end with blank lines; trim per cell so the
                // tab separators stay adjacent.
                cells.push(extract_node(cell, depth + 1)?.trim().to_string());
            }
            cells.join("\t")
        }

        NodeKind::TableHeader | NodeKind::TableHeaderCell | NodeKind::TableCell => {
            extract_children(node.children(), depth + 1)?
        }

        NodeKind::Doc => extract_children(node.children(), depth + 1)?,

        // Unknown or media nodes: recurse into content when present so
        // future node types still surface their text; leaves yield nothing.
        _ => match &node.content {
            Some(content) => extract_children(content, depth + 1)?,
            None => String::new(),
        },
    };

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use crate::adf::extract_plain_text;
    use serde_json::json;

    #[test]
    fn test_paragraphs_separated_by_blank_lines() {
        // Arrange: two paragraphs
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "First" }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "Second" }] }
            ]
        });

        // Act
        let result = extract_plain_text(&doc);

        // Assert: blank line between paragraphs, outer whitespace trimmed
        assert_eq!(result, "First\n\nSecond");
    }

    #[test]
    fn test_hard_break_inside_paragraph() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [
                    { "type": "text", "text": "first" },
                    { "type": "hardBreak" },
                    { "type": "text", "text": "second" }
                ]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "first\nsecond");
    }

    #[test]
    fn test_marks_are_ignored() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [{
                    "type": "text",
                    "text": "bold text",
                    "marks": [{ "type": "strong" }]
                }]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "bold text");
    }

    #[test]
    fn test_bullet_list_items_one_per_line() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "bulletList",
                "content": [
                    {
                        "type": "listItem",
                        "content": [{
                            "type": "paragraph",
                            "content": [{ "type": "text", "text": "First item" }]
                        }]
                    },
                    {
                        "type": "listItem",
                        "content": [{
                            "type": "paragraph",
                            "content": [{ "type": "text", "text": "Second item" }]
                        }]
                    }
                ]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "• First item\n• Second item");
    }

    #[test]
    fn test_code_block_is_fenced() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "codeBlock",
                "content": [{ "type": "text", "text": "let x = 1;" }]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "```\nlet x = 1;\n```");
    }

    #[test]
    fn test_blockquote_is_prefixed() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "blockquote",
                "content": [{
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "quoted words" }]
                }]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "> quoted words");
    }

    #[test]
    fn test_mention_uses_display_text() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [
                    { "type": "text", "text": "ping " },
                    { "type": "mention", "attrs": { "id": "abc", "text": "@Jane Doe" } }
                ]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "ping @Jane Doe");
    }

    #[test]
    fn test_mention_without_display_text_defaults() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [{ "type": "mention", "attrs": { "id": "abc" } }]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "@user");
    }

    #[test]
    fn test_table_flattens_to_tabs_and_newlines() {
        // Arrange: two rows of two cells each
        let cell = |text: &str| {
            json!({
                "type": "tableCell",
                "content": [{
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": text }]
                }]
            })
        };
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "table",
                "content": [
                    { "type": "tableRow", "content": [cell("A"), cell("B")] },
                    { "type": "tableRow", "content": [cell("C"), cell("D")] }
                ]
            }]
        });

        // Act
        let result = extract_plain_text(&doc);

        // Assert: cells tab-joined, rows newline-joined, trailing blank trimmed
        assert_eq!(result, "A\tB\nC\tD");
    }

    #[test]
    fn test_unknown_container_recurses_into_content() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "panel",
                "attrs": { "panelType": "info" },
                "content": [{
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "inside a panel" }]
                }]
            }]
        });

        assert_eq!(extract_plain_text(&doc), "inside a panel");
    }

    #[test]
    fn test_unknown_leaf_yields_nothing() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "rule" },
                { "type": "paragraph", "content": [{ "type": "text", "text": "after rule" }] }
            ]
        });

        assert_eq!(extract_plain_text(&doc), "after rule");
    }

    #[test]
    fn test_string_root_verbatim() {
        let value = json!("already plain text");
        assert_eq!(extract_plain_text(&value), "already plain text");
    }

    #[test]
    fn test_array_root() {
        let value = json!([
            { "type": "paragraph", "content": [{ "type": "text", "text": "one" }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "two" }] }
        ]);

        assert_eq!(extract_plain_text(&value), "one\n\ntwo");
    }

    #[test]
    fn test_heading_followed_by_paragraph() {
        let doc = json!({
            "type": "doc",
            "content": [
                {
                    "type": "heading",
                    "attrs": { "level": 2 },
                    "content": [{ "type": "text", "text": "Title" }]
                },
                { "type": "paragraph", "content": [{ "type": "text", "text": "Body" }] }
            ]
        });

        assert_eq!(extract_plain_text(&doc), "Title\n\nBody");
    }
}
