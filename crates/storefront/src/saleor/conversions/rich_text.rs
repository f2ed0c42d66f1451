//! Rendering of Saleor rich-text fields.
//!
//! Saleor stores product descriptions and page content as Editor.js documents
//! serialized to JSON strings.

use serde::Deserialize;
use serde_json::Value;

/// A rich-text field rendered for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedText {
    pub text: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Render an Editor.js document.
///
/// Input that is not an Editor.js document is treated as plain text.
#[must_use]
pub fn render(source: &str) -> RenderedText {
    let source = source.trim();
    if source.is_empty() {
        return RenderedText::default();
    }

    let Ok(document) = serde_json::from_str::<Document>(source) else {
        return RenderedText {
            text: source.to_string(),
            html: format!("<p>{}</p>", escape_html(source)),
        };
    };

    let mut text = Vec::new();
    let mut html = String::new();

    for block in document.blocks {
        match block.kind.as_str() {
            "paragraph" => {
                let inline = string_field(&block.data, "text");
                text.push(strip_tags(inline));
                html.push_str(&format!("<p>{inline}</p>"));
            }
            "header" => {
                let inline = string_field(&block.data, "text");
                let level = block
                    .data
                    .get("level")
                    .and_then(Value::as_u64)
                    .filter(|level| (1..=6).contains(level))
                    .unwrap_or(2);
                text.push(strip_tags(inline));
                html.push_str(&format!("<h{level}>{inline}</h{level}>"));
            }
            "list" => {
                let tag = if string_field(&block.data, "style") == "ordered" {
                    "ol"
                } else {
                    "ul"
                };
                let items: Vec<&str> = block
                    .data
                    .get("items")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().filter_map(list_item_content).collect())
                    .unwrap_or_default();

                html.push_str(&format!("<{tag}>"));
                for item in items {
                    text.push(strip_tags(item));
                    html.push_str(&format!("<li>{item}</li>"));
                }
                html.push_str(&format!("</{tag}>"));
            }
            _ => {}
        }
    }

    RenderedText {
        text: text.join("\n"),
        html,
    }
}

fn string_field<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// List items are plain strings, or `{content, items}` objects in nested lists.
fn list_item_content(item: &Value) -> Option<&str> {
    item.as_str()
        .or_else(|| item.get("content").and_then(Value::as_str))
}

/// Drop inline markup and decode the entities Editor.js emits.
fn strip_tags(inline: &str) -> String {
    let mut out = String::with_capacity(inline.len());
    let mut in_tag = false;

    for c in inline.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
